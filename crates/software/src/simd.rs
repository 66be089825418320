use std::ops::{Add, BitAnd, BitOr, Div, Mul, Neg, Not, Sub};

/// A quad of f32 values, one per fragment lane.
///
/// Lanes map to a 2x2 pixel block in row-major order: lane 0 is the top left
/// fragment, 1 top right, 2 bottom left, 3 bottom right. Derivative
/// computation in [`crate::math`] relies on this layout.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct f32x4(pub [f32; 4]);

/// A quad of i32 values, used as a per-lane mask (nonzero = lane active).
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct i32x4(pub [i32; 4]);

impl f32x4 {
    pub const ZERO: Self = Self([0.0; 4]);
    pub const ONE: Self = Self([1.0; 4]);

    #[inline(always)]
    pub fn splat(value: f32) -> Self {
        Self([value; 4])
    }

    #[inline(always)]
    pub fn to_bits(self) -> i32x4 {
        i32x4(self.0.map(|x| x.to_bits() as i32))
    }

    #[inline(always)]
    pub fn from_bits(bits: i32x4) -> Self {
        Self(bits.0.map(|x| f32::from_bits(x as u32)))
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self(self.0.map(f32::sqrt))
    }

    #[inline(always)]
    fn cmp(self, other: Self, f: impl Fn(f32, f32) -> bool) -> i32x4 {
        let mut out = [0; 4];
        for i in 0..4 {
            out[i] = if f(self.0[i], other.0[i]) { -1 } else { 0 };
        }
        i32x4(out)
    }

    #[inline(always)]
    pub fn cmp_lt(self, other: Self) -> i32x4 {
        self.cmp(other, |a, b| a < b)
    }

    #[inline(always)]
    pub fn cmp_gt(self, other: Self) -> i32x4 {
        self.cmp(other, |a, b| a > b)
    }

    #[inline(always)]
    pub fn cmp_lte(self, other: Self) -> i32x4 {
        self.cmp(other, |a, b| a <= b)
    }

    #[inline(always)]
    pub fn cmp_gte(self, other: Self) -> i32x4 {
        self.cmp(other, |a, b| a >= b)
    }

    #[inline(always)]
    pub fn cmp_eq(self, other: Self) -> i32x4 {
        self.cmp(other, |a, b| a == b)
    }

    #[inline(always)]
    pub fn cmp_neq(self, other: Self) -> i32x4 {
        self.cmp(other, |a, b| a != b)
    }
}

macro_rules! lanewise_f32 {
    ($trait:ident, $func:ident, $op:tt) => {
        impl $trait for f32x4 {
            type Output = Self;

            #[inline(always)]
            fn $func(self, other: Self) -> Self {
                let mut out = [0.0; 4];
                for i in 0..4 {
                    out[i] = self.0[i] $op other.0[i];
                }
                Self(out)
            }
        }
    };
}

lanewise_f32!(Add, add, +);
lanewise_f32!(Sub, sub, -);
lanewise_f32!(Mul, mul, *);
lanewise_f32!(Div, div, /);

impl Neg for f32x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.map(|x| -x))
    }
}

impl i32x4 {
    pub const ZERO: Self = Self([0; 4]);
    pub const ALL: Self = Self([-1; 4]);

    #[inline(always)]
    pub fn splat(value: i32) -> Self {
        Self([value; 4])
    }

    #[inline(always)]
    pub fn any(self) -> bool {
        self.0.iter().any(|&x| x != 0)
    }

    #[inline(always)]
    pub fn none(self) -> bool {
        !self.any()
    }

    /// Normalize to a lane mask: nonzero lanes become all-ones, zero lanes
    /// stay zero. Keeps complement-based mask algebra exact when a condition
    /// arrives as a raw float bit pattern instead of a comparison result.
    #[inline(always)]
    pub fn truthy(self) -> Self {
        Self(self.0.map(|x| if x != 0 { -1 } else { 0 }))
    }

    /// Lanewise select: where the mask lane is set take `a`, otherwise keep `b`.
    #[inline(always)]
    pub fn blend(self, a: f32x4, b: f32x4) -> f32x4 {
        let mut out = [0.0; 4];
        for i in 0..4 {
            out[i] = if self.0[i] != 0 { a.0[i] } else { b.0[i] };
        }
        f32x4(out)
    }
}

impl BitAnd for i32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, other: Self) -> Self {
        let mut out = [0; 4];
        for i in 0..4 {
            out[i] = self.0[i] & other.0[i];
        }
        Self(out)
    }
}

impl BitOr for i32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, other: Self) -> Self {
        let mut out = [0; 4];
        for i in 0..4 {
            out[i] = self.0[i] | other.0[i];
        }
        Self(out)
    }
}

impl Not for i32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(self.0.map(|x| !x))
    }
}

/// A two component vector with one value per quad lane.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vec2 {
    pub x: f32x4,
    pub y: f32x4,
}

impl Vec2 {
    pub const fn new(x: f32x4, y: f32x4) -> Self {
        Self { x, y }
    }

    /// Broadcast the same (x, y) pair to every lane.
    pub fn splat(x: f32, y: f32) -> Self {
        Self {
            x: f32x4::splat(x),
            y: f32x4::splat(y),
        }
    }
}

/// A four component vector with one value per quad lane.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vec4 {
    pub x: f32x4,
    pub y: f32x4,
    pub z: f32x4,
    pub w: f32x4,
}

impl Vec4 {
    pub const fn new(x: f32x4, y: f32x4, z: f32x4, w: f32x4) -> Self {
        Self { x, y, z, w }
    }

    /// Broadcast the same (x, y, z, w) tuple to every lane.
    pub fn splat(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self {
            x: f32x4::splat(x),
            y: f32x4::splat(y),
            z: f32x4::splat(z),
            w: f32x4::splat(w),
        }
    }
}

/// Runs `f` inside a function compiled for the best SIMD feature set the
/// host CPU supports, so the lanewise loops above vectorize accordingly.
#[cfg(target_arch = "x86_64")]
pub fn dispatch_simd<F: FnOnce()>(f: F) {
    if is_x86_feature_detected!("avx2") {
        unsafe { dispatch_avx2(f) }
    } else if is_x86_feature_detected!("avx") {
        unsafe { dispatch_avx1(f) }
    } else if is_x86_feature_detected!("sse4.2") {
        unsafe { dispatch_sse42(f) }
    } else {
        f()
    }

    #[target_feature(enable = "avx2")]
    unsafe fn dispatch_avx2<F: FnOnce()>(f: F) {
        f()
    }

    #[target_feature(enable = "avx")]
    unsafe fn dispatch_avx1<F: FnOnce()>(f: F) {
        f()
    }

    #[target_feature(enable = "sse4.2")]
    unsafe fn dispatch_sse42<F: FnOnce()>(f: F) {
        f()
    }
}

#[cfg(target_arch = "aarch64")]
pub fn dispatch_simd<F: FnOnce()>(f: F) {
    if std::arch::is_aarch64_feature_detected!("neon") {
        unsafe { dispatch_neon(f) }
    } else {
        f()
    }

    #[target_feature(enable = "neon")]
    unsafe fn dispatch_neon<F: FnOnce()>(f: F) {
        f()
    }
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub fn dispatch_simd<F: FnOnce()>(f: F) {
    f()
}
