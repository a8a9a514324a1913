//! Poller lifecycle types

use std::fmt;

/// Why a poller stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A terminal status was observed
    Terminal,
    /// The maximum duration elapsed first
    Timeout,
    /// Too many consecutive status checks failed
    ErrorBudget,
    /// The owner cancelled the poller
    Cancelled,
}

/// Lifecycle of a poller: `Idle -> Polling -> Stopped(_)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
    Stopped(StopReason),
}

impl PollerState {
    pub fn is_stopped(self) -> bool {
        matches!(self, PollerState::Stopped(_))
    }
}

impl fmt::Display for PollerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollerState::Idle => f.write_str("idle"),
            PollerState::Polling => f.write_str("polling"),
            PollerState::Stopped(StopReason::Terminal) => f.write_str("stopped_terminal"),
            PollerState::Stopped(StopReason::Timeout) => f.write_str("stopped_timeout"),
            PollerState::Stopped(StopReason::ErrorBudget) => f.write_str("stopped_error_budget"),
            PollerState::Stopped(StopReason::Cancelled) => f.write_str("stopped_cancelled"),
        }
    }
}

/// Final result of a poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<S, E> {
    /// The job reached this terminal status
    Terminal(S),
    /// The deadline passed; carries the last successfully fetched status
    TimedOut { last_status: Option<S> },
    /// The error budget was exhausted; carries the last failure
    ErrorBudgetExhausted(E),
    Cancelled,
}

impl<S, E> PollOutcome<S, E> {
    pub fn stop_reason(&self) -> StopReason {
        match self {
            PollOutcome::Terminal(_) => StopReason::Terminal,
            PollOutcome::TimedOut { .. } => StopReason::Timeout,
            PollOutcome::ErrorBudgetExhausted(_) => StopReason::ErrorBudget,
            PollOutcome::Cancelled => StopReason::Cancelled,
        }
    }
}
