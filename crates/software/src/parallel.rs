use crate::{
    processor::ShaderProcessor,
    sampler::Sampler,
    simd::{Vec4, i32x4},
};
use rayon::prelude::*;
use softshade_core::{SHADER_SAMPLER_COUNT, Shader};

/// One fragment quad invocation: the registers to preload (interpolated
/// attributes) and the rasterizer coverage mask for the quad.
pub struct QuadJob {
    pub inputs: Vec<(usize, Vec4)>,
    pub coverage: i32x4,
}

/// Execute `shader` over many quads in parallel, reading `output_register`
/// back from each invocation.
///
/// Every rayon worker owns an independent [`ShaderProcessor`]; samplers and
/// their textures are shared read-only. As with any sequentially reused
/// processor, register contents carry over between jobs on the same worker,
/// so each job must preload every register its shader reads.
pub fn execute_quads(
    shader: &Shader,
    samplers: &[Sampler; SHADER_SAMPLER_COUNT],
    jobs: &[QuadJob],
    output_register: usize,
) -> Vec<Vec4> {
    jobs.par_iter()
        .map_init(ShaderProcessor::new, |processor, job| {
            for &(index, value) in &job.inputs {
                processor.write_register(index, value);
            }
            processor.execute_masked(shader, job.coverage, samplers);
            processor.read_register(output_register)
        })
        .collect()
}
