use std::fmt;

use thiserror::Error;

/// Where a wrapper instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    Mounted,
    Updating,
    Unmounted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Constructed => "constructed",
            Phase::Mounted => "mounted",
            Phase::Updating => "updating",
            Phase::Unmounted => "unmounted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MixoutError {
    #[error("{component} has no imperative method named `{name}`")]
    UnknownMethod { component: String, name: String },
    #[error("failed to call `{method}`: the target component is not mounted")]
    TargetUnavailable { method: String },
    #[error("the target component has no member named `{member}`")]
    MissingMember { member: String },
    #[error("cannot {operation} while {phase}")]
    Lifecycle {
        phase: Phase,
        operation: &'static str,
    },
    #[error("no component is mounted")]
    NotMounted,
    #[error("{0}")]
    Failed(String),
}

impl MixoutError {
    pub fn failed(message: impl Into<String>) -> Self {
        MixoutError::Failed(message.into())
    }

    pub fn target_unavailable(method: impl Into<String>) -> Self {
        MixoutError::TargetUnavailable {
            method: method.into(),
        }
    }

    pub fn missing_member(member: impl Into<String>) -> Self {
        MixoutError::MissingMember {
            member: member.into(),
        }
    }
}

/// Outcome of a fragment hook or contribution.
pub type HookResult = Result<(), MixoutError>;

/// Lets fragment closures return either `()` or a [`HookResult`].
pub trait IntoHookResult {
    fn into_hook_result(self) -> HookResult;
}

impl IntoHookResult for () {
    fn into_hook_result(self) -> HookResult {
        Ok(())
    }
}

impl IntoHookResult for HookResult {
    fn into_hook_result(self) -> HookResult {
        self
    }
}
