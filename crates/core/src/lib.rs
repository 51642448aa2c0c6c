#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod sampling;
pub mod time;

pub use time::Clock;
