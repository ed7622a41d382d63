/// Returns `prefix` followed by `count` copies of `tuple` joined by `", "`.
///
/// For example `with_tuples("insert into t(x, y) values ", "(?, ?)", 3)`
/// yields `insert into t(x, y) values (?, ?), (?, ?), (?, ?)`.
///
/// # Panics
/// - When `count` is zero. Callers skip empty collections before building.
pub fn with_tuples(prefix: &str, tuple: &str, count: usize) -> String {
    assert!(
        count >= 1,
        "with_tuples requires at least one tuple, but {count} were specified"
    );

    let mut sql = String::with_capacity(prefix.len() + count * (tuple.len() + 2));
    sql.push_str(prefix);
    sql.push_str(tuple);
    for _ in 1..count {
        sql.push_str(", ");
        sql.push_str(tuple);
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::with_tuples;

    #[test]
    fn single_tuple_has_no_separator() {
        assert_eq!(with_tuples("VALUES ", "(?)", 1), "VALUES (?)");
    }

    #[test]
    fn repeats_tuple_with_comma_separator() {
        assert_eq!(
            with_tuples("insert into t(x, y) values ", "(?, ?)", 3),
            "insert into t(x, y) values (?, ?), (?, ?), (?, ?)"
        );
    }

    #[test]
    #[should_panic(expected = "at least one tuple")]
    fn zero_tuples_is_a_contract_violation() {
        with_tuples("VALUES ", "(?)", 0);
    }
}
