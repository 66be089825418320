//! A software-rasterized fragment shader pipeline: a per-quad shader virtual
//! machine with masked SIMD lanes, plus the texture store and sampler it
//! consults. An external rasterizer preloads interpolated attributes into
//! registers, calls [`ShaderProcessor::execute`] and reads the output color
//! registers back.

pub use softshade_core::*;
pub use softshade_software::*;
