use anyhow::Result;

use tri_engine::core::{App, AppControl, FrameCtx};
use tri_engine::math::Mat4;
use tri_engine::paint::Color;
use tri_engine::render::{Transforms, TriangleRenderer};

use crate::config::ViewerConfig;

/// Rotation angle accumulator.
///
/// The angle grows by `step` on every `advance` with no wrap-around; the trig
/// in `Mat4::rotation_y` handles any magnitude.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spinner {
    angle: f64,
    step: f64,
}

impl Spinner {
    pub fn new(step: f64) -> Self {
        Self { angle: 0.0, step }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Adds one step and returns the new angle.
    pub fn advance(&mut self) -> f64 {
        self.angle += self.step;
        self.angle
    }
}

/// Frame driver state: one triangle, a fixed camera, and the spin.
pub struct Scene {
    renderer: TriangleRenderer,

    /// Built once from the perspective params.
    proj: Mat4,
    /// Built once from the eye offset.
    view: Mat4,

    spinner: Spinner,
    clear_color: Color,
    frames: u64,
}

impl Scene {
    pub fn new(config: &ViewerConfig) -> Self {
        let p = config.perspective;
        let [x, y, z] = config.eye_offset;

        log::debug!(
            "projection: fov {}°, near {}, far {}; eye offset ({x}, {y}, {z})",
            p.fov_degrees,
            p.near,
            p.far
        );

        Self {
            renderer: TriangleRenderer::new(config.fill_color),
            proj: Mat4::perspective(p.fov_degrees, p.near, p.far),
            view: Mat4::translation(x, y, z),
            spinner: Spinner::new(config.rotation_step),
            clear_color: config.clear_color,
            frames: 0,
        }
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    /// Advances the spin and returns this frame's matrices.
    pub fn next_transforms(&mut self) -> Transforms {
        let angle = self.spinner.advance();

        Transforms {
            proj: self.proj,
            view: self.view,
            model: Mat4::rotation_y(angle),
        }
    }
}

impl App for Scene {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let transforms = self.next_transforms();
        let renderer = &mut self.renderer;

        let control = ctx.render(self.clear_color, |rctx, target| {
            renderer.render(rctx, target, &transforms)?;
            Ok(())
        })?;

        self.frames += 1;
        Ok(control)
    }

    fn on_exit(&mut self) {
        log::info!(
            "drew {} frames; final angle {:.3} rad",
            self.frames,
            self.spinner().angle()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::PerspectiveParams;

    // ── spinner ───────────────────────────────────────────────────────────

    #[test]
    fn spinner_starts_at_zero() {
        assert_eq!(Spinner::new(0.01).angle(), 0.0);
    }

    #[test]
    fn spinner_adds_exactly_one_step_per_call() {
        let step = 0.01;
        let mut spinner = Spinner::new(step);
        let mut expected = 0.0_f64;

        for _ in 0..10_000 {
            expected += step;
            assert_eq!(spinner.advance().to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn spinner_does_not_wrap() {
        let mut spinner = Spinner::new(1.0);
        for _ in 0..100 {
            spinner.advance();
        }
        assert_eq!(spinner.angle(), 100.0);
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn projection_and_view_are_built_from_config() {
        let config = ViewerConfig::default();
        let mut scene = Scene::new(&config);
        let t = scene.next_transforms();

        assert_eq!(t.proj, Mat4::perspective(45.0, 0.1, 100.0));
        assert_eq!(t.view, Mat4::translation(0.0, 0.0, -3.0));
    }

    #[test]
    fn first_frame_is_already_rotated_by_one_step() {
        let mut scene = Scene::new(&ViewerConfig::default());
        let t = scene.next_transforms();
        assert_eq!(t.model, Mat4::rotation_y(0.01));
    }

    #[test]
    fn only_the_model_matrix_changes_between_frames() {
        let mut scene = Scene::new(&ViewerConfig::default());
        let a = scene.next_transforms();
        let b = scene.next_transforms();

        assert_eq!(a.proj, b.proj);
        assert_eq!(a.view, b.view);
        assert_ne!(a.model, b.model);
        assert_eq!(b.model, Mat4::rotation_y(0.01 + 0.01));
        assert_eq!(scene.spinner().angle(), 0.01 + 0.01);
    }

    #[test]
    fn custom_perspective_is_respected() {
        let config = ViewerConfig {
            perspective: PerspectiveParams {
                fov_degrees: 90.0,
                near: 1.0,
                far: 10.0,
            },
            ..Default::default()
        };
        let mut scene = Scene::new(&config);
        let t = scene.next_transforms();
        assert!((t.proj[0] - 1.0).abs() < 1e-6);
    }
}
