#![forbid(unsafe_code)]

//! Core: receding-stack appearance, animation primitives, and pan-gesture math.
//!
//! Nothing in this crate touches a view hierarchy. Everything is pure math
//! over `f64` channels so the controller crate can drive any host.

pub mod animation;
pub mod appearance;
pub mod gesture;
pub mod view;
