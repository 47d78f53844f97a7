//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and creates them
//! lazily on first use. WGSL sources are checked with naga before they reach
//! the device, so compile/link problems surface as [`ShaderError`] values.

mod ctx;
pub mod shader;
pub mod triangle;

pub use ctx::{RenderCtx, RenderTarget};
pub use shader::ShaderError;
pub use triangle::{TriangleRenderer, Transforms};
