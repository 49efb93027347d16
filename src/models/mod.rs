pub mod activity;
pub mod catalog;
pub mod interval;

pub use activity::{ActivityColor, ActivityDescriptor};
pub use catalog::{Activity, Category, ChildItem, SelectionMode, SurveyConfig, TimelineDefinition};
pub use interval::Interval;
