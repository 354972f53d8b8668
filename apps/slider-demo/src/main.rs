use glide_core::MutableState;
use glide_foundation::{
    Document, Draggable, DraggableOptions, ElementId, IgnoreRegion, PointerEvent,
    PointerEventKind, Position, Subscription,
};
use glide_runtime_std::StdRuntime;
use glide_ui::{Slider, SliderProps};
use glide_ui_graphics::{DrawPrimitive, Point, Rect};

const PAGE: Rect = Rect::new(0.0, 0.0, 640.0, 360.0);
const TRACK: Rect = Rect::new(40.0, 60.0, 560.0, 20.0);
const PLAYGROUND: Rect = Rect::new(40.0, 120.0, 560.0, 200.0);
const CARD_SIZE: f32 = 48.0;
const CLOSE_SIZE: f32 = 12.0;

/// Plays the host: owns layout, feeds input, and pumps frames.
struct DemoHost {
    runtime: StdRuntime,
    document: Document,
    page: ElementId,
    playground: ElementId,
    card: ElementId,
    card_close: ElementId,
    slider: Slider,
    volume: MutableState<f64>,
    card_drag: Draggable,
    _notices: Subscription,
}

impl DemoHost {
    fn new() -> anyhow::Result<Self> {
        let runtime = StdRuntime::new();
        let document = Document::with_frame_clock(runtime.frame_clock());

        let page = document.create_element("main");
        let playground = document.create_element("section");
        let card = document.create_element("div");
        let card_close = document.create_element("button");
        document.append_child(page, playground)?;
        document.append_child(playground, card)?;
        document.append_child(card, card_close)?;
        document.add_class(card_close, "close")?;

        let volume = MutableState::new(20.0);
        let slider = Slider::new(
            &document,
            page,
            SliderProps::default().with_step(5.0),
            volume.as_state(),
            {
                let volume = volume.clone();
                move |value| {
                    println!("  volume -> {value}");
                    volume.set(value);
                }
            },
        )?;

        let card_drag = Draggable::new(
            &document,
            DraggableOptions::new(MutableState::new(Some(card)))
                .centered(true)
                .with_initial_position(Position::new(50.0, 50.0))
                .ignore(IgnoreRegion::selector(".close")?),
        );

        let notices = document.drag_broadcast().subscribe(|notice| {
            log::debug!(
                "element {} dragged to ({:.1}%, {:.1}%)",
                notice.source,
                notice.position.x,
                notice.position.y
            );
        });

        let host = Self {
            runtime,
            document,
            page,
            playground,
            card,
            card_close,
            slider,
            volume,
            card_drag,
            _notices: notices,
        };
        host.layout();
        Ok(host)
    }

    /// Writes every element's bounds, the way a layout pass would.
    fn layout(&self) {
        let position = self.card_drag.position().get();
        let center = Point::new(
            PLAYGROUND.x + PLAYGROUND.width * position.x as f32 / 100.0,
            PLAYGROUND.y + PLAYGROUND.height * position.y as f32 / 100.0,
        );
        let card = Rect::new(
            center.x - CARD_SIZE / 2.0,
            center.y - CARD_SIZE / 2.0,
            CARD_SIZE,
            CARD_SIZE,
        );
        let close = Rect::new(card.right() - CLOSE_SIZE, card.y, CLOSE_SIZE, CLOSE_SIZE);

        let placed = [
            (self.page, PAGE),
            (self.playground, PLAYGROUND),
            (self.card, card),
            (self.card_close, close),
            (self.slider.elements().track, TRACK),
        ];
        for (element, bounds) in placed {
            if let Err(err) = self.document.set_bounds(element, bounds) {
                log::warn!("layout skipped element {element}: {err}");
            }
        }
        self.slider.render();
    }

    /// Lays out again after input, then answers any frames widgets asked for.
    fn after_input(&self) {
        self.layout();
        let frames = self.runtime.run_requested_frames(|| self.layout());
        if frames > 0 {
            println!("  ({frames} deferred frame(s) ran)");
        }
    }

    fn mouse(&self, kind: PointerEventKind, x: f32, y: f32) {
        let point = Point::new(x, y);
        let mut event = PointerEvent::new(kind, point);
        event.target = self.document.hit_test(point);
        self.document.dispatch(&event);
        self.after_input();
    }

    fn touch(&self, kind: PointerEventKind, touches: &[Point]) -> bool {
        let mut event = PointerEvent::touch(kind, touches.iter().copied());
        event.target = touches.first().and_then(|point| self.document.hit_test(*point));
        self.document.dispatch(&event);
        self.after_input();
        event.is_default_prevented()
    }

    fn thumb_center(&self) -> Point {
        self.document
            .bounds(self.slider.elements().thumb)
            .map(|bounds| bounds.center())
            .unwrap_or(Point::ZERO)
    }

    fn card_center(&self) -> Point {
        self.document
            .bounds(self.card)
            .map(|bounds| bounds.center())
            .unwrap_or(Point::ZERO)
    }
}

fn track_x(percent: f32) -> f32 {
    TRACK.x + TRACK.width * percent / 100.0
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Glide Slider Demo ===");
    println!("A scripted walk through the drag engine and the slider built on it.");
    println!("Run with RUST_LOG=debug to see drag sessions and broadcast notices.");
    println!();

    let host = DemoHost::new()?;
    println!("Initial volume: {}", host.volume.get());

    println!("Click the track at 60%, then keep dragging to 80%:");
    host.mouse(PointerEventKind::Down, track_x(60.0), TRACK.center().y);
    for percent in [65.0, 70.0, 75.0, 80.0] {
        host.mouse(PointerEventKind::Move, track_x(percent), TRACK.center().y);
    }
    host.mouse(PointerEventKind::Up, track_x(80.0), TRACK.center().y);

    println!("Drag the thumb all the way left:");
    let thumb = host.thumb_center();
    host.mouse(PointerEventKind::Down, thumb.x, thumb.y);
    host.mouse(PointerEventKind::Move, TRACK.x - 100.0, thumb.y);
    host.mouse(PointerEventKind::Up, TRACK.x - 100.0, thumb.y);

    println!("Disable the slider and try again:");
    host.slider.set_disabled(true);
    let thumb = host.thumb_center();
    host.mouse(PointerEventKind::Down, thumb.x, thumb.y);
    host.mouse(PointerEventKind::Move, track_x(50.0), thumb.y);
    host.mouse(PointerEventKind::Up, track_x(50.0), thumb.y);
    println!("  volume stays {}", host.volume.get());
    host.slider.set_disabled(false);

    println!("Touch drag to the middle:");
    let thumb = host.thumb_center();
    let prevented = host.touch(PointerEventKind::Down, &[thumb]);
    host.touch(PointerEventKind::Move, &[Point::new(track_x(50.0), thumb.y)]);
    host.touch(PointerEventKind::Up, &[]);
    println!("  page scrolling suppressed: {prevented}");

    println!("Drag the card by its body, then try its close button:");
    let card = host.card_center();
    host.mouse(PointerEventKind::Down, card.x, card.y);
    host.mouse(PointerEventKind::Move, card.x + 140.0, card.y - 40.0);
    host.mouse(PointerEventKind::Up, card.x + 140.0, card.y - 40.0);
    let position = host.card_drag.position().get();
    println!("  card at ({:.1}%, {:.1}%)", position.x, position.y);

    let close = host
        .document
        .bounds(host.card_close)
        .map(|bounds| bounds.center())
        .unwrap_or(Point::ZERO);
    host.mouse(PointerEventKind::Down, close.x, close.y);
    println!("  dragging from close button: {}", host.card_drag.is_dragging().get());
    host.mouse(PointerEventKind::Up, close.x, close.y);

    println!();
    println!("Final volume: {}", host.volume.get());
    for primitive in host.slider.visuals().to_primitives() {
        if let DrawPrimitive::RoundRect { rect, .. } = primitive {
            println!(
                "  draw {:>6.1} {:>6.1} {:>6.1}x{:<6.1}",
                rect.x, rect.y, rect.width, rect.height
            );
        }
    }
    Ok(())
}
