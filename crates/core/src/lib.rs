#![forbid(unsafe_code)]

//! Domain model for course content, enrollment and lesson progress.

pub mod model;
pub mod progress;
pub mod seed;
pub mod time;

pub use time::Clock;
