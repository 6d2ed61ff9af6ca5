use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skeleton_viz::{normalize, Motion, Position, RenderConfig, Skeleton};

pub fn criterion_benchmark(c: &mut Criterion) {

    fn chain_skeleton(num_joints: usize) -> Skeleton {
        let parents = (0..num_joints).map(|i| i as isize - 1).collect();
        let offsets = (0..num_joints).map(|_| Position::new(0.0, 0.08, 0.0)).collect();
        Skeleton::new(parents, offsets).unwrap()
    }

    fn synthetic_motion(num_frames: usize, num_joints: usize) -> Motion {
        let frames = (0..num_frames)
            .map(|f| {
                let t = f as f64 * 0.02;
                (0..num_joints)
                    .map(|j| Position::new((t + j as f64).sin(), 1.0 + j as f64 * 0.1, t * 0.5))
                    .collect()
            })
            .collect();
        Motion::from_frames(frames)
    }

    let skeleton = chain_skeleton(24);
    let motion = synthetic_motion(600, 24);
    let config = RenderConfig::default();

    let long_chain = chain_skeleton(100);

    let mut group = c.benchmark_group("normalize");
    group.sample_size(10);
    group.bench_function("600 frames x 24 joints", |b| {
        b.iter(|| black_box(normalize(&skeleton, &motion, &config).unwrap()))
    });
    group.bench_function("rest pose of a 100 joint chain", |b| {
        b.iter(|| black_box(long_chain.rest_global_positions()))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
