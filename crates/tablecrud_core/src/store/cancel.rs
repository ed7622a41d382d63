use super::{StatementError, StatementResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation signal shared between a caller and a running operation.
///
/// Clones observe the same flag. A deadline, when set, expires the token
/// without an explicit `cancel`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Token that is never cancelled unless `cancel` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(deadline),
        }
    }

    /// Token that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fails when the token was cancelled or its deadline has passed.
    pub fn check(&self) -> StatementResult<()> {
        if self.is_cancelled() {
            return Err(StatementError::Cancelled);
        }
        if matches!(self.deadline, Some(deadline) if Instant::now() >= deadline) {
            return Err(StatementError::DeadlineExceeded);
        }
        Ok(())
    }
}
