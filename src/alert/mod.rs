//! Alert module for blogmon.
//!
//! Deduplicated silence and goal alerts.

pub mod message;
pub mod policy;
pub mod state;

pub use message::{format_hours, goal_message, silence_message};
pub use policy::{AlertDecision, GoalPolicy, SilencePolicy};
pub use state::{AlertStateStore, MemoryAlertState};
