//! Platform abstraction for scheduling wrapper updates.
//!
//! The engine never re-renders on its own. When a fragment asks for a forced
//! update the runtime queues it and tells the host platform, through this
//! trait, that a new update pass should run.

/// Receives "an update is pending" notifications.
///
/// Implementations must be safe to use from multiple threads; the pass
/// itself always runs on the thread that drives the host.
pub trait UpdateScheduler: Send + Sync {
    /// Request that the host run [`crate::Host::process_updates`] soon.
    fn schedule_frame(&self);
}
