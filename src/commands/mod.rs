pub mod common;
pub mod dep;
pub mod discovery;
pub mod prioritize;
pub mod repair;
pub mod transition;
pub mod unit;
