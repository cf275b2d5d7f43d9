use crate::Message;
use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke};
use iced::{mouse, Color, Element, Length, Point, Rectangle, Renderer, Theme};
use rand::Rng;
use std::time::{Duration, Instant};

/// Cadence at which new blips appear.
pub const SPAWN_INTERVAL: Duration = Duration::from_millis(600);
/// Lifetime of a blip before it fades out completely.
const BLIP_TTL: Duration = Duration::from_secs(2);
/// One sweep revolution every 2s at the 100ms poll cadence.
const SWEEP_STEP_DEG: f32 = 18.0;
/// Blip distances are drawn in this range; the upper bound maps to the
/// scope edge.
const DISTANCE_RANGE: std::ops::Range<f32> = 20.0..80.0;

#[derive(Debug, Clone)]
struct Blip {
    angle_deg: f32,
    distance: f32,
    born: Instant,
}

/// Decorative obstacle radar. Purely synthetic: uniform random blips with a
/// fixed lifetime and a rotating sweep, fed by no telemetry at all.
pub struct RadarPanel {
    blips: Vec<Blip>,
    sweep_deg: f32,
}

impl RadarPanel {
    pub fn new() -> Self {
        Self {
            blips: Vec::new(),
            sweep_deg: 0.0,
        }
    }

    pub fn spawn<R: Rng>(&mut self, rng: &mut R, now: Instant) {
        self.blips.push(Blip {
            angle_deg: rng.gen_range(0.0..360.0),
            distance: rng.gen_range(DISTANCE_RANGE),
            born: now,
        });
    }

    /// Poll tick: advance the sweep and drop expired blips.
    pub fn tick(&mut self, now: Instant) {
        self.sweep_deg = (self.sweep_deg + SWEEP_STEP_DEG) % 360.0;
        self.blips
            .retain(|blip| now.duration_since(blip.born) < BLIP_TTL);
    }

    pub fn view(&self) -> Element<'_, Message> {
        let now = Instant::now();
        let dots = self
            .blips
            .iter()
            .map(|blip| BlipDot {
                angle_deg: blip.angle_deg,
                distance: blip.distance,
                age: (now.duration_since(blip.born).as_secs_f32()
                    / BLIP_TTL.as_secs_f32())
                .clamp(0.0, 1.0),
            })
            .collect();

        Canvas::new(RadarScope {
            dots,
            sweep_deg: self.sweep_deg,
        })
        .width(Length::Fixed(240.0))
        .height(Length::Fixed(240.0))
        .into()
    }
}

struct BlipDot {
    angle_deg: f32,
    distance: f32,
    age: f32,
}

struct RadarScope {
    dots: Vec<BlipDot>,
    sweep_deg: f32,
}

impl canvas::Program<Message> for RadarScope {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.03, 0.04, 0.06),
        );

        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = bounds.width.min(bounds.height) / 2.0 - 8.0;

        for ring in 1..=3 {
            let ring_radius = radius * (ring as f32 / 3.0);
            let ring_path = Path::new(|builder| builder.circle(center, ring_radius));
            frame.stroke(
                &ring_path,
                Stroke::default().with_color(Color::from_rgb(0.2, 0.28, 0.4)),
            );
        }

        let axes = Path::new(|builder| {
            builder.move_to(Point::new(center.x - radius, center.y));
            builder.line_to(Point::new(center.x + radius, center.y));
            builder.move_to(Point::new(center.x, center.y - radius));
            builder.line_to(Point::new(center.x, center.y + radius));
        });
        frame.stroke(
            &axes,
            Stroke::default()
                .with_color(Color::from_rgb(0.18, 0.24, 0.34))
                .with_width(1.0),
        );

        // Sweep line with a short fading trail.
        for (lag, alpha) in [(0.0, 0.9), (9.0, 0.35), (18.0, 0.15)] {
            let angle = (self.sweep_deg - lag).to_radians();
            let tip = Point::new(
                center.x + radius * angle.cos(),
                center.y - radius * angle.sin(),
            );
            let sweep = Path::new(|builder| {
                builder.move_to(center);
                builder.line_to(tip);
            });
            frame.stroke(
                &sweep,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgba(0.25, 0.55, 0.95, alpha)),
            );
        }

        for dot in &self.dots {
            let angle = dot.angle_deg.to_radians();
            let dot_radius = dot.distance / DISTANCE_RANGE.end * radius;
            let position = Point::new(
                center.x + dot_radius * angle.cos(),
                center.y - dot_radius * angle.sin(),
            );
            let marker = Path::new(|builder| builder.circle(position, 3.0));
            frame.fill(
                &marker,
                Color::from_rgba(0.94, 0.27, 0.27, 1.0 - dot.age),
            );
        }

        let user = Path::new(|builder| builder.circle(center, 3.5));
        frame.fill(&user, Color::from_rgb(0.15, 0.39, 0.92));

        vec![frame.into_geometry()]
    }
}
