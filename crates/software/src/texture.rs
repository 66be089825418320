use log::{debug, trace};
use softshade_core::{ImageData, PixelFormat};

/// A single mip level: a `width` x `height` grid of packed ARGB8 texels.
pub struct Mip {
    width: usize,
    height: usize,
    texels: Box<[u32]>,
}

impl Mip {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            texels: vec![0; width * height].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fetch a single texel as normalized RGBA. `x` and `y` must be in bounds.
    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> [f32; 4] {
        const DIV: f32 = 1.0 / 255.0;
        let texel = self.texels[y * self.width + x];
        [
            ((texel >> 16) & 0xff) as f32 * DIV,
            ((texel >> 8) & 0xff) as f32 * DIV,
            (texel & 0xff) as f32 * DIV,
            ((texel >> 24) & 0xff) as f32 * DIV,
        ]
    }
}

/// A 2D texture with a mip chain, stored as packed ARGB8.
///
/// Uploads convert from the source [`PixelFormat`] by byte-order remapping
/// only; no color-space transform is applied. Textures are read-only while a
/// shader executes, so they can be shared across processors.
pub struct Texture2D {
    mips: Vec<Mip>,
}

impl Texture2D {
    pub fn new() -> Self {
        Self { mips: Vec::new() }
    }

    pub fn num_levels(&self) -> usize {
        self.mips.len()
    }

    /// Mip accessor; levels past the end clamp to the last populated one.
    pub fn mip(&self, level: usize) -> &Mip {
        &self.mips[level.min(self.mips.len() - 1)]
    }

    /// Upload a full mip level, converting `data` from `format` into the
    /// packed internal representation.
    pub fn upload(&mut self, level: usize, width: usize, height: usize, format: PixelFormat, data: &[u8]) {
        assert!(
            data.len() == width * height * format.bytes_per_pixel(),
            "invalid {:?} data length: {} != {}",
            format,
            data.len(),
            width * height * format.bytes_per_pixel(),
        );

        debug!("uploading {width}x{height} {format:?} texels to mip level {level}");

        if self.mips.len() <= level {
            self.mips.resize_with(level + 1, || Mip::new(0, 0));
        }

        let mut mip = Mip::new(width, height);
        blit(data, format, &mut mip, 0, 0, width);
        self.mips[level] = mip;
    }

    /// Replace a sub-region of an already uploaded level. The region must fit
    /// inside the level.
    pub fn replace_sub_region(
        &mut self,
        level: usize,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        format: PixelFormat,
        data: &[u8],
    ) {
        assert!(
            data.len() == width * height * format.bytes_per_pixel(),
            "invalid {:?} data length: {} != {}",
            format,
            data.len(),
            width * height * format.bytes_per_pixel(),
        );

        let mip = &mut self.mips[level];
        assert!(
            x + width <= mip.width && y + height <= mip.height,
            "sub-region {width}x{height}+{x}+{y} outside {}x{} level {level}",
            mip.width,
            mip.height,
        );

        trace!("replacing {width}x{height} region at ({x}, {y}) in mip level {level}");
        blit(data, format, mip, x, y, width);
    }
}

impl Default for Texture2D {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> From<ImageData<'a>> for Texture2D {
    fn from(image: ImageData) -> Self {
        let mut texture = Self::new();
        texture.upload(
            0,
            image.width as usize,
            image.height as usize,
            image.format,
            image.data,
        );
        texture
    }
}

fn blit(src: &[u8], format: PixelFormat, dst: &mut Mip, x0: usize, y0: usize, width: usize) {
    for (i, px) in src.chunks_exact(format.bytes_per_pixel()).enumerate() {
        let (r, g, b, a) = match format {
            PixelFormat::Rgba8 => (px[0], px[1], px[2], px[3]),
            PixelFormat::Bgra8 => (px[2], px[1], px[0], px[3]),
            PixelFormat::Rgb8 => (px[0], px[1], px[2], 0xff),
            PixelFormat::Bgr8 => (px[2], px[1], px[0], 0xff),
        };

        let x = x0 + i % width;
        let y = y0 + i / width;
        dst.texels[y * dst.width + x] = pack_argb(r, g, b, a);
    }
}

#[inline(always)]
pub fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | (b as u32)
}
