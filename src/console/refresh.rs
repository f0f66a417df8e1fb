//! Post-capture refresh policy.
//!
//! After a capture the list panel shows a transient notification, then the
//! transaction list is fetched again once a fixed delay has passed. The list
//! is the authority; the notification is not.

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::presentation::{MessageKind, ViewState};

pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_FAILURE_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub success_delay: Duration,
    pub failure_delay: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            success_delay: DEFAULT_SUCCESS_DELAY,
            failure_delay: DEFAULT_FAILURE_DELAY,
        }
    }
}

impl RefreshPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            success_delay: config.capture_success_refresh,
            failure_delay: config.capture_failure_refresh,
        }
    }

    pub fn delay_for(&self, kind: MessageKind) -> Duration {
        match kind {
            MessageKind::Success => self.success_delay,
            MessageKind::Error => self.failure_delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Showing { message: String, kind: MessageKind },
}

/// What a fired timer does before re-fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RefreshPlan {
    pub delay: Duration,
    /// Panel text to put back first. Only set after a successful capture.
    pub restore: Option<ViewState>,
}

impl RefreshPlan {
    pub fn after_success(policy: &RefreshPolicy, previous: ViewState) -> Self {
        Self {
            delay: policy.delay_for(MessageKind::Success),
            restore: Some(previous),
        }
    }

    pub fn after_failure(policy: &RefreshPolicy) -> Self {
        Self {
            delay: policy.delay_for(MessageKind::Error),
            restore: None,
        }
    }
}

/// Holds at most one pending refresh timer.
#[derive(Debug)]
pub(crate) struct RefreshSlot {
    pub state: RefreshState,
    pending: Option<JoinHandle<()>>,
}

impl RefreshSlot {
    pub fn new() -> Self {
        Self {
            state: RefreshState::Idle,
            pending: None,
        }
    }

    /// Installs a new timer, cancelling the one it supersedes.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.pending.replace(handle) {
            if !previous.is_finished() {
                tracing::debug!("Cancelling superseded refresh timer");
                previous.abort();
            }
        }
    }

    pub fn take(&mut self) -> Option<JoinHandle<()>> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.state = RefreshState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays() {
        let policy = RefreshPolicy::default();
        assert_eq!(policy.delay_for(MessageKind::Success), Duration::from_secs(2));
        assert_eq!(policy.delay_for(MessageKind::Error), Duration::from_secs(3));
    }

    #[test]
    fn test_success_plan_restores_previous_text() {
        let policy = RefreshPolicy::default();
        let previous = ViewState::Success("Found 1 transactions for account: A1".into());
        let plan = RefreshPlan::after_success(&policy, previous.clone());

        assert_eq!(plan.delay, policy.success_delay);
        assert_eq!(plan.restore, Some(previous));
    }

    #[test]
    fn test_failure_plan_only_refetches() {
        let plan = RefreshPlan::after_failure(&RefreshPolicy::default());
        assert_eq!(plan.delay, Duration::from_secs(3));
        assert_eq!(plan.restore, None);
    }

    #[tokio::test]
    async fn test_replacing_cancels_pending_timer() {
        let mut slot = RefreshSlot::new();
        let first = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        slot.replace(first);
        assert!(slot.is_pending());

        slot.replace(tokio::spawn(async {}));
        let second = slot.take().unwrap();
        second.await.unwrap();
        assert!(!slot.is_pending());
    }

    #[tokio::test]
    async fn test_cancel_resets_state() {
        let mut slot = RefreshSlot::new();
        slot.state = RefreshState::Showing {
            message: "x".into(),
            kind: MessageKind::Error,
        };
        slot.replace(tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }));

        slot.cancel();
        assert_eq!(slot.state, RefreshState::Idle);
        assert!(!slot.is_pending());
    }
}
