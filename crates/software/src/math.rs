use crate::simd::f32x4;

// Quads are laid out row-major over a 2x2 pixel block:
// | lane 0  lane 1 |
// | lane 2  lane 3 |
// The derivative helpers below depend on this exact lane-to-pixel mapping;
// mip selection in the sampler breaks if it changes.

/// Partial derivative with respect to x of a value spread over the quad.
/// | 0 1 | -> | 1-0 1-0 |
/// | 2 3 | -> | 3-2 3-2 |
#[inline(always)]
pub fn ddx(v: f32x4) -> f32x4 {
    let v = v.0;
    f32x4([v[1] - v[0], v[1] - v[0], v[3] - v[2], v[3] - v[2]])
}

/// Partial derivative with respect to y of a value spread over the quad.
/// | 0 1 | -> | 2-0 3-1 |
/// | 2 3 | -> | 2-0 3-1 |
#[inline(always)]
pub fn ddy(v: f32x4) -> f32x4 {
    let v = v.0;
    f32x4([v[2] - v[0], v[3] - v[1], v[2] - v[0], v[3] - v[1]])
}

/// Linear interpolation of two RGBA texels.
#[inline(always)]
pub fn lerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let mut out = [0.0; 4];
    for i in 0..4 {
        out[i] = a[i] + (b[i] - a[i]) * t;
    }
    out
}

/// Bilinear blend of the four texels neighboring a sample position:
/// `lerp(lerp(t00, t10, fx), lerp(t01, t11, fx), fy)`.
#[inline(always)]
pub fn bilerp(t00: [f32; 4], t10: [f32; 4], t01: [f32; 4], t11: [f32; 4], fx: f32, fy: f32) -> [f32; 4] {
    lerp(lerp(t00, t10, fx), lerp(t01, t11, fx), fy)
}
