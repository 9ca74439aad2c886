#![forbid(unsafe_code)]

use criterion::{Criterion, criterion_group, criterion_main};
use ftouch_core::{
    ElementId, GestureConfig, GestureRecognizer, Modifiers, NoopHost, PointerEvent, PointerPhase,
};
use std::hint::black_box;
use std::time::Duration;
use web_time::Instant;

const EL: ElementId = ElementId(1);

fn recognizer() -> GestureRecognizer {
    let mut gr = GestureRecognizer::new(GestureConfig::default(), NoopHost);
    for name in ["start", "end", "tap", "moving", "swipe", "pan"] {
        gr.register(EL, name, Modifiers::NONE, |ev| {
            black_box(ev.name);
        });
    }
    gr.register(EL, "swipe", Modifiers::LEFT | Modifiers::RIGHT, |ev| {
        black_box(ev.direction);
    });
    gr
}

fn bench_interaction_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognizer/lifecycle");

    group.bench_function("tap", |b| {
        let mut gr = recognizer();
        let t = Instant::now();
        b.iter(|| {
            gr.handle(EL, &PointerEvent::touch(PointerPhase::Start, 4.0, 4.0, t));
            let out = gr.handle(
                EL,
                &PointerEvent::touch(PointerPhase::End, 4.0, 4.0, t + Duration::from_millis(60)),
            );
            black_box(out.fired.len());
        });
    });

    group.bench_function("start_move_32_swipe", |b| {
        let mut gr = recognizer();
        let t = Instant::now();
        b.iter(|| {
            gr.handle(EL, &PointerEvent::touch(PointerPhase::Start, 0.0, 0.0, t));
            for step in 1..=32u32 {
                let x = f64::from(step) * 3.0;
                let out = gr.handle(
                    EL,
                    &PointerEvent::touch(
                        PointerPhase::Move,
                        x,
                        0.0,
                        t + Duration::from_millis(u64::from(step)),
                    ),
                );
                black_box(out.fired.len());
            }
            let out = gr.handle(
                EL,
                &PointerEvent::touch(PointerPhase::End, 96.0, 0.0, t + Duration::from_millis(40)),
            );
            black_box(out.fired.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_interaction_lifecycle);
criterion_main!(benches);
