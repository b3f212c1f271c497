use physarum::{
    agent::Agent,
    grid::EnvironmentField,
    sense::{sense_and_steer, SensorGeometry},
    Simulation, SimulationParameters,
};

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn bench_tick(c: &mut Criterion) {
    let params = SimulationParameters {
        wander_strength: 0.1,
        ..SimulationParameters::default()
    };
    let mut group = c.benchmark_group("tick");
    for &agents in [1 << 14, 1 << 17].iter() {
        group.bench_function(format!("agents_{}_grid_512", agents), |b| {
            b.iter_batched(
                || Simulation::initialize(agents, 512, 512, 7).unwrap(),
                |mut sim| {
                    sim.step(&params).unwrap();
                    sim
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_sensing(c: &mut Criterion) {
    let params = SimulationParameters::default();
    let mut field = EnvironmentField::new(256, 256).unwrap();
    field.fill([0.3, 0.2, 0.1]);
    let current: Vec<Agent> = (0..1 << 14)
        .map(|i| Agent::new((i % 256) as f32 + 0.5, (i / 256) as f32 + 0.5, i as f32))
        .collect();
    let mut next = current.clone();

    c.bench_function("sense single agent", |b| {
        let geometry = SensorGeometry::new(&params);
        let view = field.view();
        b.iter(|| geometry.sense(&view, black_box(10.5), black_box(20.5), black_box(1.0)))
    });
    c.bench_function("sense and steer 16k agents", |b| {
        let view = field.view();
        b.iter(|| sense_and_steer(&view, black_box(&current), &mut next, &params))
    });
}

criterion_group!(benches, bench_tick, bench_sensing);
criterion_main!(benches);
