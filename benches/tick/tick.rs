use contagion::random::seeded_rng;
use contagion::{define_rng, ContactPolicy, Parameters, Simulation};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

define_rng!(BenchRng);

static SEED: u64 = 123;
static STEPS: u64 = 100;

fn run(population: usize, contact_policy: ContactPolicy) -> Simulation {
    let parameters = Parameters {
        contact_policy,
        ..Parameters::default()
    };
    let mut rng = seeded_rng::<BenchRng>(SEED);
    let mut simulation = Simulation::new(parameters, population, 5.0, 5, 0, &mut rng)
        .expect("failed to build simulation");
    for _ in 0..STEPS {
        simulation.tick();
    }
    simulation
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for population in [100, 500, 1000] {
        for (name, policy) in [
            ("snapshot", ContactPolicy::Snapshot),
            ("sequential", ContactPolicy::Sequential),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, population),
                &population,
                |bencher, &population| {
                    bencher.iter_with_large_drop(|| run(black_box(population), policy));
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
