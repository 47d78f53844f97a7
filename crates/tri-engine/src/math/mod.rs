//! Transform math.
//!
//! Matrices are column-major so they can be uploaded to WGSL `mat4x4<f32>`
//! uniforms byte-for-byte.

mod mat4;

pub use mat4::Mat4;
