use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glide_core::MutableState;
use glide_foundation::{Document, PointerEvent, PointerEventKind};
use glide_ui::{Slider, SliderProps};
use glide_ui_graphics::{Point, Rect};

const TRACK: Rect = Rect::new(0.0, 0.0, 1_020.0, 20.0);
const MOVE_SAMPLES: &[usize] = &[16, 256];

fn mounted_slider() -> (Document, Slider, MutableState<f64>) {
    let document = Document::new();
    let page = document.create_element("main");
    document
        .set_bounds(page, Rect::new(0.0, 0.0, 1_200.0, 200.0))
        .unwrap();
    let model = MutableState::new(0.0);
    let slider = Slider::new(
        &document,
        page,
        SliderProps::default().with_step(0.5),
        model.as_state(),
        {
            let model = model.clone();
            move |value| model.set(value)
        },
    )
    .unwrap();
    document.set_bounds(slider.elements().track, TRACK).unwrap();
    slider.render();
    (document, slider, model)
}

fn dispatch(document: &Document, kind: PointerEventKind, x: f32) {
    let point = Point::new(x, 10.0);
    let mut event = PointerEvent::new(kind, point);
    event.target = document.hit_test(point);
    document.dispatch(&event);
}

fn bench_drag_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("slider_drag");
    for &moves in MOVE_SAMPLES {
        group.bench_with_input(BenchmarkId::new("moves", moves), &moves, |b, &moves| {
            let (document, _slider, model) = mounted_slider();
            b.iter(|| {
                model.set(0.0);
                dispatch(&document, PointerEventKind::Down, 10.0);
                for step in 0..moves {
                    let x = 10.0 + (step as f32 / moves as f32) * 1_000.0;
                    dispatch(&document, PointerEventKind::Move, x);
                }
                dispatch(&document, PointerEventKind::Up, 1_010.0);
                black_box(model.get())
            });
        });
    }
    group.finish();
}

fn bench_queued_moves(c: &mut Criterion) {
    c.bench_function("slider_drag/queued_256", |b| {
        let (document, _slider, model) = mounted_slider();
        b.iter(|| {
            model.set(0.0);
            dispatch(&document, PointerEventKind::Down, 10.0);
            for step in 0..256 {
                let x = 10.0 + step as f32 * 4.0;
                document.enqueue(PointerEvent::new(PointerEventKind::Move, Point::new(x, 10.0)));
            }
            document.enqueue(PointerEvent::new(PointerEventKind::Up, Point::new(1_010.0, 10.0)));
            black_box(document.flush_pointer_events())
        });
    });
}

criterion_group!(benches, bench_drag_moves, bench_queued_moves);
criterion_main!(benches);
