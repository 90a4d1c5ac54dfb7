use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec4;
use tessera::gpu::{NativeObjectManager, RecordingExecutor, RenderContext};
use tessera::shader::{ShaderProgram, ShaderType};

type Fixture =
    (ShaderProgram, RenderContext, RecordingExecutor, NativeObjectManager);

fn linked_program(uniforms: usize) -> Fixture {
    let mut program = ShaderProgram::new();
    for ty in [ShaderType::Vertex, ShaderType::Fragment] {
        program
            .add_source(ty, None, "void main() {}", None, "GLSL330")
            .unwrap();
    }
    for i in 0..uniforms {
        program
            .get_uniform(&format!("m_Param{i}"))
            .set_value(Vec4::splat(i as f32))
            .unwrap();
    }
    let mut ctx = RenderContext::default();
    let mut gpu = RecordingExecutor::new();
    let mut objects = NativeObjectManager::new();
    program.bind(&mut ctx, &mut gpu, &mut objects).unwrap();
    (program, ctx, gpu, objects)
}

fn clean_bind_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_bind");
    for count in [8, 32, 128] {
        let (mut program, mut ctx, mut gpu, mut objects) =
            linked_program(count);
        group.bench_function(format!("{count}_uniforms"), |b| {
            b.iter(|| black_box(program.bind(&mut ctx, &mut gpu, &mut objects)))
        });
    }
    group.finish();
}

fn material_switch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("material_switch");
    for count in [8, 32, 128] {
        let (mut program, mut ctx, mut gpu, mut objects) =
            linked_program(count);
        let mut frame = 0.0_f32;
        group.bench_function(format!("{count}_uniforms"), |b| {
            b.iter(|| {
                frame += 1.0;
                program.clear_uniforms_set_by_current_flag();
                program
                    .get_uniform("m_Param0")
                    .set_value(Vec4::splat(frame))
                    .unwrap();
                program.reset_uniforms_not_set_by_current();
                gpu.clear_calls();
                black_box(program.bind(&mut ctx, &mut gpu, &mut objects))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, clean_bind_benchmark, material_switch_benchmark);
criterion_main!(benches);
