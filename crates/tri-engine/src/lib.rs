//! Tri engine crate.
//!
//! Platform + GPU runtime for the spinning-triangle viewer, plus the transform
//! math it feeds to the shader.

pub mod core;
pub mod device;
pub mod logging;
pub mod math;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
