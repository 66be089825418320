use crate::{
    math::{bilerp, ddx, ddy},
    simd::{Vec2, Vec4, f32x4},
    texture::{Mip, Texture2D},
};
use softshade_core::LANE_COUNT;
use std::sync::Arc;

/// Texel filtering mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// How texture coordinates outside [0, 1] are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SamplerConfig {
    pub texture_filter: TextureFilter,
    pub address_mode: AddressMode,
}

/// Fallback color for unbound or empty textures.
const BLACK: Vec4 = Vec4::new(f32x4::ZERO, f32x4::ZERO, f32x4::ZERO, f32x4::ONE);

/// Converts normalized UV coordinates plus screen-space derivatives into a
/// filtered color, one RGBA value per quad lane, by consulting the bound
/// texture. Sampling an unbound slot yields opaque black rather than an
/// error.
#[derive(Clone, Default)]
pub struct Sampler {
    texture: Option<Arc<Texture2D>>,
    config: SamplerConfig,
}

impl Sampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { texture: None, config }
    }

    pub fn bound_texture(&self) -> Option<&Arc<Texture2D>> {
        self.texture.as_ref()
    }

    pub fn set_bound_texture(&mut self, texture: Option<Arc<Texture2D>>) {
        self.texture = texture;
    }

    pub fn config(&self) -> SamplerConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SamplerConfig) {
        self.config = config;
    }

    /// Sample with derivatives computed across the 2x2 quad by finite
    /// differences, which drive implicit mip selection.
    pub fn sample_2d(&self, uv: Vec2) -> Vec4 {
        let dx = Vec2::new(ddx(uv.x), ddx(uv.y));
        let dy = Vec2::new(ddy(uv.x), ddy(uv.y));
        self.sample_2d_grad(uv, dx, dy)
    }

    /// Sample at an explicit per-lane mip level, bypassing derivatives.
    pub fn sample_2d_lod(&self, uv: Vec2, lod: f32x4) -> Vec4 {
        let Some(texture) = self.bound_nonempty() else {
            return BLACK;
        };

        let mut lanes = [[0.0; 4]; LANE_COUNT];
        for lane in 0..LANE_COUNT {
            let level = lod.0[lane].round().max(0.0) as usize;
            lanes[lane] = self.sample_mip(texture.mip(level), uv.x.0[lane], uv.y.0[lane]);
        }
        collect_lanes(lanes)
    }

    /// Sample with explicit derivatives for mip selection.
    pub fn sample_2d_grad(&self, uv: Vec2, dx: Vec2, dy: Vec2) -> Vec4 {
        let Some(texture) = self.bound_nonempty() else {
            return BLACK;
        };

        let base = texture.mip(0);
        let (width, height) = (base.width() as f32, base.height() as f32);

        let mut lod = [0.0; LANE_COUNT];
        for lane in 0..LANE_COUNT {
            let dudx = dx.x.0[lane] * width;
            let dvdx = dx.y.0[lane] * height;
            let dudy = dy.x.0[lane] * width;
            let dvdy = dy.y.0[lane] * height;

            // log2 of the longer gradient, computed from squared lengths
            let len_squared = (dudx * dudx + dvdx * dvdx).max(dudy * dudy + dvdy * dvdy);
            lod[lane] = 0.5 * len_squared.log2();
        }

        self.sample_2d_lod(uv, f32x4(lod))
    }

    fn bound_nonempty(&self) -> Option<&Texture2D> {
        self.texture.as_deref().filter(|texture| texture.num_levels() > 0)
    }

    fn sample_mip(&self, mip: &Mip, u: f32, v: f32) -> [f32; 4] {
        if mip.width() == 0 || mip.height() == 0 {
            return [0.0, 0.0, 0.0, 1.0];
        }

        match self.config.texture_filter {
            TextureFilter::Nearest => {
                let x = self.wrap((u * mip.width() as f32).floor() as i64, mip.width());
                let y = self.wrap((v * mip.height() as f32).floor() as i64, mip.height());
                mip.texel(x, y)
            }

            TextureFilter::Linear => {
                let s = u * mip.width() as f32 - 0.5;
                let t = v * mip.height() as f32 - 0.5;
                let fx = s - s.floor();
                let fy = t - t.floor();

                let x0 = self.wrap(s.floor() as i64, mip.width());
                let x1 = self.wrap(s.floor() as i64 + 1, mip.width());
                let y0 = self.wrap(t.floor() as i64, mip.height());
                let y1 = self.wrap(t.floor() as i64 + 1, mip.height());

                bilerp(
                    mip.texel(x0, y0),
                    mip.texel(x1, y0),
                    mip.texel(x0, y1),
                    mip.texel(x1, y1),
                    fx,
                    fy,
                )
            }
        }
    }

    #[inline(always)]
    fn wrap(&self, texel: i64, size: usize) -> usize {
        match self.config.address_mode {
            AddressMode::ClampToEdge => texel.clamp(0, size as i64 - 1) as usize,
            AddressMode::Repeat => texel.rem_euclid(size as i64) as usize,
        }
    }
}

fn collect_lanes(lanes: [[f32; 4]; LANE_COUNT]) -> Vec4 {
    let mut out = Vec4::default();
    for lane in 0..LANE_COUNT {
        out.x.0[lane] = lanes[lane][0];
        out.y.0[lane] = lanes[lane][1];
        out.z.0[lane] = lanes[lane][2];
        out.w.0[lane] = lanes[lane][3];
    }
    out
}
