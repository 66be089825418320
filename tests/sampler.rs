use softshade::{
    AddressMode, PixelFormat, Sampler, SamplerConfig, Texture2D, TextureFilter, Vec2, f32x4,
};
use std::sync::Arc;

fn lane0(color: softshade::Vec4) -> [f32; 4] {
    [color.x.0[0], color.y.0[0], color.z.0[0], color.w.0[0]]
}

fn to_u8(color: [f32; 4]) -> [u8; 4] {
    color.map(|v| (v * 255.0).round() as u8)
}

fn sampler_with(texture: Texture2D, filter: TextureFilter, address_mode: AddressMode) -> Sampler {
    let mut sampler = Sampler::new(SamplerConfig {
        texture_filter: filter,
        address_mode,
    });
    sampler.set_bound_texture(Some(Arc::new(texture)));
    sampler
}

// four distinct RGBA texels for a 2x2 texture, row-major
const QUAD_TEXELS: [[u8; 4]; 4] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 255, 255, 255],
];

fn quad_texture() -> Texture2D {
    let mut texture = Texture2D::new();
    texture.upload(0, 2, 2, PixelFormat::Rgba8, &QUAD_TEXELS.concat());
    texture
}

/// sampling an unbound slot is not an error: it returns opaque black
#[test]
fn unbound_sampler_returns_opaque_black() {
    let sampler = Sampler::default();
    let color = sampler.sample_2d(Vec2::splat(0.3, 0.7));
    assert_eq!(lane0(color), [0.0, 0.0, 0.0, 1.0]);
}

/// a bound but never-uploaded texture behaves like an unbound one
#[test]
fn empty_texture_returns_opaque_black() {
    let sampler = sampler_with(Texture2D::new(), TextureFilter::Linear, AddressMode::ClampToEdge);
    let color = sampler.sample_2d(Vec2::splat(0.5, 0.5));
    assert_eq!(lane0(color), [0.0, 0.0, 0.0, 1.0]);
}

/// a single-texel solid color texture sampled at uv=(0,0) returns exactly
/// that color under both filter modes
#[test]
fn single_texel_is_exact_under_both_filters() {
    for filter in [TextureFilter::Nearest, TextureFilter::Linear] {
        let mut texture = Texture2D::new();
        texture.upload(0, 1, 1, PixelFormat::Rgba8, &[12, 34, 56, 255]);

        let sampler = sampler_with(texture, filter, AddressMode::ClampToEdge);
        let color = lane0(sampler.sample_2d(Vec2::splat(0.0, 0.0)));

        assert_eq!(to_u8(color), [12, 34, 56, 255], "filter {filter:?}");
    }
}

/// linear filtering at the exact center of a 2x2 texture blends all four
/// texels with equal weights
#[test]
fn linear_center_is_average_of_quad() {
    let sampler = sampler_with(quad_texture(), TextureFilter::Linear, AddressMode::ClampToEdge);
    let color = lane0(sampler.sample_2d(Vec2::splat(0.5, 0.5)));

    let expected = [0.5, 0.5, 0.5, 1.0];
    for (c, e) in color.iter().zip(expected) {
        assert!((c - e).abs() < 1e-6, "{color:?} != {expected:?}");
    }
}

/// upload then nearest-sample round-trips every texel exactly, for every
/// supported source format
#[test]
fn nearest_round_trips_all_formats() {
    let cases: [(PixelFormat, Vec<u8>); 4] = [
        (PixelFormat::Rgba8, QUAD_TEXELS.concat()),
        (
            PixelFormat::Bgra8,
            QUAD_TEXELS.iter().flat_map(|t| [t[2], t[1], t[0], t[3]]).collect(),
        ),
        (
            PixelFormat::Rgb8,
            QUAD_TEXELS.iter().flat_map(|t| [t[0], t[1], t[2]]).collect(),
        ),
        (
            PixelFormat::Bgr8,
            QUAD_TEXELS.iter().flat_map(|t| [t[2], t[1], t[0]]).collect(),
        ),
    ];

    for (format, data) in cases {
        let mut texture = Texture2D::new();
        texture.upload(0, 2, 2, format, &data);
        let sampler = sampler_with(texture, TextureFilter::Nearest, AddressMode::ClampToEdge);

        for (i, texel) in QUAD_TEXELS.iter().enumerate() {
            let uv = Vec2::splat((i % 2) as f32 * 0.5 + 0.25, (i / 2) as f32 * 0.5 + 0.25);
            let color = to_u8(lane0(sampler.sample_2d(uv)));
            let mut expected = *texel;
            if format.bytes_per_pixel() == 3 {
                expected[3] = 255;
            }
            assert_eq!(color, expected, "format {format:?}, texel {i}");
        }
    }
}

/// repeat addressing wraps coordinates outside [0, 1] back into the texture
#[test]
fn repeat_addressing_wraps() {
    let sampler = sampler_with(quad_texture(), TextureFilter::Nearest, AddressMode::Repeat);

    let inside = to_u8(lane0(sampler.sample_2d(Vec2::splat(0.25, 0.25))));
    let wrapped = to_u8(lane0(sampler.sample_2d(Vec2::splat(1.25, -0.75))));
    assert_eq!(inside, wrapped);
    assert_eq!(inside, QUAD_TEXELS[0]);
}

/// replacing a sub-region only changes the covered texels
#[test]
fn replaced_sub_region_is_visible() {
    let mut texture = quad_texture();
    texture.replace_sub_region(0, 1, 1, 1, 1, PixelFormat::Rgba8, &[9, 8, 7, 255]);

    let sampler = sampler_with(texture, TextureFilter::Nearest, AddressMode::ClampToEdge);
    assert_eq!(to_u8(lane0(sampler.sample_2d(Vec2::splat(0.75, 0.75)))), [9, 8, 7, 255]);
    assert_eq!(to_u8(lane0(sampler.sample_2d(Vec2::splat(0.25, 0.25)))), QUAD_TEXELS[0]);
}

fn mip_chain_texture() -> Texture2D {
    let mut texture = Texture2D::new();
    // red 4x4, green 2x2, blue 1x1
    texture.upload(0, 4, 4, PixelFormat::Rgba8, &[255, 0, 0, 255].repeat(16));
    texture.upload(1, 2, 2, PixelFormat::Rgba8, &[0, 255, 0, 255].repeat(4));
    texture.upload(2, 1, 1, PixelFormat::Rgba8, &[0, 0, 255, 255]);
    texture
}

/// an explicit lod bypasses derivatives and indexes the mip chain directly,
/// clamping past its end
#[test]
fn explicit_lod_selects_mip_level() {
    let sampler = sampler_with(mip_chain_texture(), TextureFilter::Nearest, AddressMode::ClampToEdge);
    let uv = Vec2::splat(0.25, 0.25);

    assert_eq!(to_u8(lane0(sampler.sample_2d_lod(uv, f32x4::splat(0.0)))), [255, 0, 0, 255]);
    assert_eq!(to_u8(lane0(sampler.sample_2d_lod(uv, f32x4::splat(1.0)))), [0, 255, 0, 255]);
    assert_eq!(to_u8(lane0(sampler.sample_2d_lod(uv, f32x4::splat(2.0)))), [0, 0, 255, 255]);
    assert_eq!(to_u8(lane0(sampler.sample_2d_lod(uv, f32x4::splat(9.0)))), [0, 0, 255, 255]);
}

/// a quad whose UVs span the whole texture has unit derivatives, which must
/// select the smallest mip level
#[test]
fn implicit_lod_minifies_from_quad_derivatives() {
    let sampler = sampler_with(mip_chain_texture(), TextureFilter::Nearest, AddressMode::ClampToEdge);

    // row-major 2x2 quad: ddx = ddy = 1.0 in both u and v
    let uv = Vec2::new(f32x4([0.0, 1.0, 0.0, 1.0]), f32x4([0.0, 0.0, 1.0, 1.0]));
    let color = sampler.sample_2d(uv);

    for lane in 0..4 {
        assert_eq!(
            to_u8([color.x.0[lane], color.y.0[lane], color.z.0[lane], color.w.0[lane]]),
            [0, 0, 255, 255],
            "lane {lane}",
        );
    }
}

/// a lane-constant UV has zero derivatives and stays on the base level
#[test]
fn constant_uv_magnifies_to_base_level() {
    let sampler = sampler_with(mip_chain_texture(), TextureFilter::Nearest, AddressMode::ClampToEdge);
    let color = to_u8(lane0(sampler.sample_2d(Vec2::splat(0.25, 0.25))));
    assert_eq!(color, [255, 0, 0, 255]);
}

/// explicit gradients behave like the implicitly computed ones
#[test]
fn explicit_gradients_match_implicit() {
    let sampler = sampler_with(mip_chain_texture(), TextureFilter::Nearest, AddressMode::ClampToEdge);

    let uv = Vec2::splat(0.25, 0.25);
    let dx = Vec2::splat(1.0, 0.0);
    let dy = Vec2::splat(0.0, 1.0);
    let color = to_u8(lane0(sampler.sample_2d_grad(uv, dx, dy)));
    assert_eq!(color, [0, 0, 255, 255]);
}
