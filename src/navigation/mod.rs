pub mod cooldown;
pub mod navigator;
pub mod state;

pub use cooldown::Cooldown;
pub use navigator::{NavOutcome, NavigationRefusal, TimelineNavigator, Transition};
pub use state::{NavigationState, TimelinePhase, TimelineRuntimeState};
