//! Spinning triangle viewer.
//!
//! Opens a window and draws one red triangle turning about the Y axis behind a
//! fixed perspective camera. `RUST_LOG` controls log output.

mod config;
mod scene;

use anyhow::Result;
use tri_engine::device::GpuInit;
use tri_engine::logging::{init_logging, LoggingConfig};
use tri_engine::window::{Runtime, RuntimeConfig};

use crate::config::ViewerConfig;
use crate::scene::Scene;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ViewerConfig::default();
    log::info!("starting {}", config.title);

    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: config.window_size,
    };

    // Colors are given as display values, so skip the sRGB encode.
    let gpu_init = GpuInit {
        prefer_srgb: false,
        present_mode: wgpu::PresentMode::AutoVsync,
        ..Default::default()
    };

    Runtime::run(runtime, gpu_init, Scene::new(&config))
}
