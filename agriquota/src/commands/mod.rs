// agriquota/src/commands/mod.rs

pub mod check;
pub mod progress;
pub mod select;
pub mod validate;
