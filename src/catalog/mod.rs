pub mod source;
pub mod validation;

pub use source::{ensure_key, parse_config, FileSource, StaticSource, TimelineSource};
