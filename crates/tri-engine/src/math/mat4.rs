use core::ops::Index;

use bytemuck::{Pod, Zeroable};

/// 4×4 matrix stored as 16 `f32` in column-major order.
///
/// Element `i` of the flat array is row `i % 4` of column `i / 4`.
///
/// Builders take `f64` arguments and evaluate in `f64`; each element is narrowed
/// to `f32` once, when the matrix is assembled.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    cols: [f32; 16],
}

impl Mat4 {
    pub const IDENTITY: Self = Self::from_cols_array([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    #[inline]
    pub const fn from_cols_array(cols: [f32; 16]) -> Self {
        Self { cols }
    }

    #[inline]
    pub const fn to_cols_array(self) -> [f32; 16] {
        self.cols
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.cols
    }

    /// Returns column `i` (0..4).
    #[inline]
    pub fn col(&self, i: usize) -> [f32; 4] {
        let base = i * 4;
        [
            self.cols[base],
            self.cols[base + 1],
            self.cols[base + 2],
            self.cols[base + 3],
        ]
    }

    /// Perspective projection with a single scale term for both axes.
    ///
    /// ```text
    /// s = 1 / tan(fov/2 in radians)
    ///
    /// | s  0   0                  0                       |
    /// | 0  s   0                  0                       |
    /// | 0  0  -far/(far-near)    -(far*near)/(far-near)   |
    /// | 0  0  -1                  1                       |
    /// ```
    ///
    /// There is no aspect-ratio term, and `w` picks up `+1` from the last
    /// column. Arguments outside `0 < fov < 180`, `0 < near < far` are not
    /// rejected; the result carries whatever NaN/Inf the arithmetic produces.
    pub fn perspective(fov_degrees: f64, near: f64, far: f64) -> Self {
        let s = 1.0 / ((fov_degrees / 2.0) * (core::f64::consts::PI / 180.0)).tan();
        let depth = far - near;

        Self::from_f64([
            s, 0.0, 0.0, 0.0, //
            0.0, s, 0.0, 0.0, //
            0.0, 0.0, -far / depth, -1.0, //
            0.0, 0.0, -(far * near) / depth, 1.0,
        ])
    }

    /// Rotation of `angle` radians about the Y axis.
    pub fn rotation_y(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();

        Self::from_f64([
            cos, 0.0, -sin, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            sin, 0.0, cos, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Translation by `(x, y, z)`.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_f64([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        ])
    }

    #[inline]
    fn from_f64(cols: [f64; 16]) -> Self {
        Self::from_cols_array(cols.map(|v| v as f32))
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Mat4 {
    type Output = f32;

    #[inline]
    fn index(&self, index: usize) -> &f32 {
        &self.cols[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::f64::consts::FRAC_PI_2;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // ── perspective ───────────────────────────────────────────────────────

    #[test]
    fn perspective_fixed_elements() {
        for (fov, near, far) in [(45.0, 0.1, 100.0), (90.0, 1.0, 10.0), (10.0, 0.5, 2.0)] {
            let m = Mat4::perspective(fov, near, far);
            assert_eq!(m.as_slice().len(), 16);
            assert_eq!(m[3], 0.0);
            assert_eq!(m[7], 0.0);
            assert_eq!(m[11], -1.0);
            assert_eq!(m[15], 1.0);
        }
    }

    #[test]
    fn perspective_default_camera() {
        let m = Mat4::perspective(45.0, 0.1, 100.0);
        assert!(approx(m[0], 2.4142), "m[0] = {}", m[0]);
        assert!(approx(m[5], 2.4142), "m[5] = {}", m[5]);
        assert!(approx(m[10], -1.0010), "m[10] = {}", m[10]);
        assert_eq!(m[11], -1.0);
        assert!(approx(m[14], -0.1001), "m[14] = {}", m[14]);
        assert_eq!(m[15], 1.0);
    }

    #[test]
    fn perspective_off_diagonal_is_zero() {
        let m = Mat4::perspective(45.0, 0.1, 100.0);
        for i in [1, 2, 3, 4, 6, 7, 8, 9, 12, 13] {
            assert_eq!(m[i], 0.0, "element {i}");
        }
    }

    #[test]
    fn perspective_is_bit_identical_across_calls() {
        let a = Mat4::perspective(45.0, 0.1, 100.0).to_cols_array();
        let b = Mat4::perspective(45.0, 0.1, 100.0).to_cols_array();
        assert_eq!(a.map(f32::to_bits), b.map(f32::to_bits));
    }

    #[test]
    fn perspective_degenerate_inputs_pass_through() {
        // Zero fov: tan(0) == 0, scale becomes infinite.
        let m = Mat4::perspective(0.0, 0.1, 100.0);
        assert!(m[0].is_infinite());
        assert!(m[5].is_infinite());

        // Collapsed depth range divides by zero.
        let m = Mat4::perspective(45.0, 1.0, 1.0);
        assert!(m[10].is_infinite());
        assert!(m[14].is_infinite());

        let m = Mat4::perspective(f64::NAN, 0.1, 100.0);
        assert!(m[0].is_nan());
    }

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn rotation_zero_is_identity() {
        assert_eq!(
            Mat4::rotation_y(0.0).to_cols_array(),
            [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn rotation_quarter_turn_sign_layout() {
        let m = Mat4::rotation_y(FRAC_PI_2);
        assert!(approx(m[0], 0.0));
        assert!(approx(m[2], -1.0));
        assert!(approx(m[8], 1.0));
        assert!(approx(m[10], 0.0));
        assert_eq!(m.col(1), [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(m.col(3), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rotation_accepts_large_angles() {
        let a = Mat4::rotation_y(0.25);
        let b = Mat4::rotation_y(0.25 + 2000.0 * core::f64::consts::PI);
        for i in 0..16 {
            assert!(approx(a[i], b[i]), "element {i}: {} vs {}", a[i], b[i]);
        }
    }

    // ── translation ───────────────────────────────────────────────────────

    #[test]
    fn translation_fills_last_column() {
        assert_eq!(
            Mat4::translation(1.0, 2.0, 3.0).to_cols_array(),
            [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 2.0, 3.0, 1.0]
        );
    }

    #[test]
    fn translation_origin_is_identity() {
        assert_eq!(Mat4::translation(0.0, 0.0, 0.0), Mat4::IDENTITY);
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn bytes_are_column_major_f32() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&m));
        assert_eq!(core::mem::size_of::<Mat4>(), 64);
        assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
    }
}
