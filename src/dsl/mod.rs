pub mod display;
pub mod parsing;
pub mod query;
pub mod range;
pub mod types;
