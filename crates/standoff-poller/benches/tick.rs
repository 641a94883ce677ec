use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use standoff_core::{Detection, Frame, RangeLimit};
use standoff_poller::{AlignmentPoller, PollerParams, SensorArbiter};

fn crowded_frame() -> Frame {
    let targets = (1..=16)
        .map(|id| {
            Detection::new(
                id,
                0.01 * id as f64,
                Vector3::new(2.0 + id as f64 * 0.1, id as f64 * 0.05, 0.4),
                -12.0,
            )
        })
        .collect();
    Frame::from_targets(targets)
}

fn bench_tick(c: &mut Criterion) {
    let params = PollerParams {
        range_limit: RangeLimit::Symmetric { max_deg: 8.0 },
        ..PollerParams::default()
    };
    let hit = crowded_frame();
    let miss = Frame::empty();

    c.bench_function("tick_resolve_16_targets", |b| {
        let mut poller = AlignmentPoller::from_params("bench", &params, SensorArbiter::new());
        b.iter(|| {
            poller.start().ok();
            black_box(poller.tick(black_box(&hit)))
        })
    });

    c.bench_function("tick_miss", |b| {
        let mut poller = AlignmentPoller::from_params(
            "bench",
            &PollerParams {
                max_missed_cycles: u32::MAX,
                ..params.clone()
            },
            SensorArbiter::new(),
        );
        poller.start().ok();
        b.iter(|| black_box(poller.tick(black_box(&miss))))
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
