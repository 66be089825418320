use criterion::{Criterion, criterion_group, criterion_main};
use softshade::{
    Instruction as I, Opcode, PixelFormat, SHADER_SAMPLER_COUNT, Sampler, Shader, ShaderProcessor,
    Texture2D, Vec4, dispatch_simd, f32x4,
};
use std::hint::black_box;
use std::sync::Arc;

fn samplers() -> [Sampler; SHADER_SAMPLER_COUNT] {
    std::array::from_fn(|_| Sampler::default())
}

/// an arithmetic-heavy shader with divergent control flow
fn shader_branchy() -> Shader {
    Shader::new(
        [
            I::new(Opcode::Mul, 4, 1, 1),
            I::new(Opcode::Add, 4, 4, 2),
            I::new(Opcode::CmpGt, 5, 4, 3),
            I::new(Opcode::If, 0, 5, 2),
            I::new(Opcode::Sqrt, 4, 4, 0),
            I::new(Opcode::Else, 0, 0, 2),
            I::new(Opcode::Mul, 4, 4, 3),
            I::new(Opcode::EndIf, 0, 0, 0),
            I::new(Opcode::Mov, 0, 4, 0),
        ],
        0,
    )
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("branchy quads", |b| {
        let shader = shader_branchy();
        let samplers = samplers();
        let mut processor = ShaderProcessor::new();
        processor.write_register(1, Vec4::new(f32x4([0.1, 0.7, 1.3, 2.9]), f32x4::ONE, f32x4::ONE, f32x4::ONE));
        processor.write_register(2, Vec4::splat(0.5, 0.5, 0.5, 0.5));
        processor.write_register(3, Vec4::splat(1.0, 1.0, 1.0, 1.0));

        b.iter(|| {
            dispatch_simd(|| {
                for _ in 0..1000 {
                    processor.execute(&shader, &samplers);
                }
            });
            black_box(processor.read_register(0));
        })
    });

    c.bench_function("textured quads", |b| {
        let shader = Shader::new([I::new(Opcode::Texture2D, 0, 0, 1)], 0);

        let mut texture = Texture2D::new();
        texture.upload(0, 64, 64, PixelFormat::Rgba8, &[0x80; 64 * 64 * 4]);

        let mut samplers = samplers();
        samplers[0].set_bound_texture(Some(Arc::new(texture)));

        let mut processor = ShaderProcessor::new();
        processor.write_register(
            1,
            Vec4::new(
                f32x4([0.25, 0.26, 0.25, 0.26]),
                f32x4([0.25, 0.25, 0.26, 0.26]),
                f32x4::ZERO,
                f32x4::ZERO,
            ),
        );

        b.iter(|| {
            dispatch_simd(|| {
                for _ in 0..1000 {
                    processor.execute(&shader, &samplers);
                }
            });
            black_box(processor.read_register(0));
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
