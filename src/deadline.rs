//! Deadline and cancellation hook for long-running searches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{CutError, Result};

#[derive(Debug, Clone, Default)]
pub struct Deadline {
    at: Option<Instant>,
    limit: Duration,
    cancel: Option<Arc<AtomicBool>>,
}

impl Deadline {
    /// Never expires.
    pub fn none() -> Self {
        Self::default()
    }

    /// Expires `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self {
            at: Some(Instant::now() + limit),
            limit,
            cancel: None,
        }
    }

    /// Also fail once `flag` is set to `true` by another thread.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn check(&self) -> Result<()> {
        if let Some(flag) = &self.cancel
            && flag.load(Ordering::Relaxed)
        {
            return Err(CutError::Cancelled);
        }
        if let Some(at) = self.at
            && Instant::now() >= at
        {
            return Err(CutError::DeadlineExceeded {
                limit_ms: self.limit.as_millis() as u64,
            });
        }
        Ok(())
    }
}
