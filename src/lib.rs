pub mod config;
pub mod error;
pub mod level;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{Result, UntangleError};
