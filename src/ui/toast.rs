//! Transient notifications
//!
//! One toast is visible at a time. Each `show` supersedes the previous toast
//! and its pending expiry: an expiry only clears the toast it was issued for.

use std::future::Future;
use std::time::Duration;

pub const FEEDBACK_OK: &str = "Feedback recorded 👍";
pub const FEEDBACK_FAILED: &str = "Feedback failed (is the backend running?)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub duration: Duration,
}

impl Toast {
    /// Resolves with this toast's id once its duration has elapsed.
    ///
    /// The timer starts on first poll.
    pub fn expiry(&self) -> impl Future<Output = ToastId> + Send + 'static {
        let (id, duration) = (self.id, self.duration);
        async move {
            tokio::time::sleep(duration).await;
            id
        }
    }
}

#[derive(Debug, Default)]
pub struct Toaster {
    current: Option<Toast>,
    next_id: u64,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message`, replacing any visible toast.
    ///
    /// The caller feeds the id from [`Toast::expiry`] back into `expire`.
    pub fn show(&mut self, message: impl Into<String>, duration: Duration) -> &Toast {
        self.next_id += 1;
        self.current.insert(Toast {
            id: ToastId(self.next_id),
            message: message.into(),
            duration,
        })
    }

    /// Clear the toast if `id` is still the visible one
    pub fn expire(&mut self, id: ToastId) -> bool {
        match &self.current {
            Some(toast) if toast.id == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.message.as_str())
    }
}

/// Wording for a finished feedback submission
pub fn feedback_message(ok: bool) -> &'static str {
    if ok {
        FEEDBACK_OK
    } else {
        FEEDBACK_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1800);

    #[test]
    fn test_show_then_expire() {
        let mut toaster = Toaster::new();
        let id = toaster.show(FEEDBACK_OK, DELAY).id;

        assert_eq!(toaster.message(), Some(FEEDBACK_OK));
        assert_eq!(toaster.current().map(|t| t.duration), Some(DELAY));
        assert!(toaster.expire(id));
        assert!(toaster.message().is_none());
    }

    #[test]
    fn test_newer_toast_survives_older_expiry() {
        let mut toaster = Toaster::new();
        let first = toaster.show(FEEDBACK_FAILED, DELAY).id;
        let second = toaster.show(FEEDBACK_OK, DELAY).id;

        assert!(!toaster.expire(first));
        assert_eq!(toaster.message(), Some(FEEDBACK_OK));
        assert!(toaster.expire(second));
        assert!(toaster.message().is_none());
    }

    #[test]
    fn test_double_expire_is_noop() {
        let mut toaster = Toaster::new();
        let id = toaster.show("hi", DELAY).id;
        assert!(toaster.expire(id));
        assert!(!toaster.expire(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_waits_for_own_duration() {
        let mut toaster = Toaster::new();
        let expiry = toaster.show(FEEDBACK_OK, DELAY).expiry();

        let started = tokio::time::Instant::now();
        let id = expiry.await;
        assert!(started.elapsed() >= DELAY);
        assert!(toaster.expire(id));
    }

    #[test]
    fn test_expiry_is_lazy_outside_runtime() {
        let mut toaster = Toaster::new();
        let expiry = toaster.show(FEEDBACK_OK, DELAY).expiry();
        drop(expiry);
        assert_eq!(toaster.message(), Some(FEEDBACK_OK));
    }

    #[test]
    fn test_feedback_wording_differs() {
        assert_ne!(feedback_message(true), feedback_message(false));
    }
}
