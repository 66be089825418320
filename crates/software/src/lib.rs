mod math;
mod processor;
mod sampler;
mod simd;
mod texture;

#[cfg(feature = "parallel")]
mod parallel;

pub use math::*;
pub use processor::*;
pub use sampler::*;
pub use simd::*;
pub use texture::*;

#[cfg(feature = "parallel")]
pub use parallel::*;
