use tri_engine::paint::Color;
use winit::dpi::LogicalSize;

/// Fixed projection parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveParams {
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for PerspectiveParams {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Everything the viewer needs to know up front. Nothing here changes after startup.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub window_size: LogicalSize<f64>,

    pub perspective: PerspectiveParams,
    /// Offset applied by the view matrix.
    pub eye_offset: [f64; 3],
    /// Radians added to the rotation angle every frame.
    pub rotation_step: f64,

    pub clear_color: Color,
    pub fill_color: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "tri".to_string(),
            window_size: LogicalSize::new(800.0, 600.0),
            perspective: PerspectiveParams::default(),
            eye_offset: [0.0, 0.0, -3.0],
            rotation_step: 0.01,
            clear_color: Color::rgb(0.0, 0.7, 1.0),
            fill_color: Color::RED,
        }
    }
}
