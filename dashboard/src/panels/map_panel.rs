use crate::tiles::{self, TileCache, TileId, TileLibrary, TILE_SIZE};
use crate::Message;
use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke};
use iced::widget::image;
use iced::{mouse, Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};
use navcore::map::{DrawingSurface, PositionTracker, SurfaceError, SurfaceFactory, TrackerConfig};
use navcore::model::{Fix, GpsSnapshot};
use navcore::telemetry::FeedMetrics;
use std::sync::Arc;
use std::time::Duration;

/// Concrete drawing surface: the view center, zoom, and single marker the
/// adapter owns.
#[derive(Debug, Clone, PartialEq)]
pub struct SlippySurface {
    pub center: Fix,
    pub zoom: u8,
    pub marker: Fix,
}

impl DrawingSurface for SlippySurface {
    fn set_view(&mut self, center: Fix, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
    }

    fn move_marker(&mut self, position: Fix) {
        self.marker = position;
    }
}

/// Builds the slippy surface once the tile library handle has loaded and
/// the map panel is mounted (the splash has been dismissed).
#[derive(Debug, Default)]
pub struct SlippyFactory {
    library: Option<TileLibrary>,
    mounted: bool,
}

impl SlippyFactory {
    pub fn set_library(&mut self, library: TileLibrary) {
        self.library = Some(library);
    }

    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    pub fn library(&self) -> Option<&TileLibrary> {
        self.library.as_ref()
    }
}

impl SurfaceFactory for SlippyFactory {
    type Surface = SlippySurface;

    fn library_ready(&self) -> bool {
        self.library.is_some()
    }

    fn build(&mut self, initial: Fix, zoom: u8) -> Result<SlippySurface, SurfaceError> {
        if self.library.is_none() {
            return Err(SurfaceError::LibraryUnavailable);
        }
        if !self.mounted {
            return Err(SurfaceError::MountNotReady("map panel not shown yet".into()));
        }
        Ok(SlippySurface {
            center: initial,
            zoom,
            marker: initial,
        })
    }
}

/// Map panel glue: the position tracker, its surface factory, and the tile
/// cache backing the canvas.
pub struct MapPanel {
    tracker: PositionTracker<SlippySurface>,
    factory: SlippyFactory,
    cache: TileCache,
}

impl MapPanel {
    pub fn new(metrics: Arc<FeedMetrics>) -> Self {
        Self {
            tracker: PositionTracker::new(TrackerConfig::default(), metrics),
            factory: SlippyFactory::default(),
            cache: TileCache::new(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.tracker.config().poll_interval
    }

    pub fn library_loaded(&mut self, library: TileLibrary) {
        self.factory.set_library(library);
    }

    pub fn library(&self) -> Option<&TileLibrary> {
        self.factory.library()
    }

    pub fn set_mounted(&mut self, mounted: bool) {
        self.factory.set_mounted(mounted);
    }

    pub fn handle_snapshot(&mut self, snapshot: &GpsSnapshot) -> bool {
        self.tracker.handle_snapshot(snapshot)
    }

    pub fn has_fix(&self) -> bool {
        self.tracker.last_fix().is_some()
    }

    /// Poll tick: drive lazy surface construction, then plan fetches for
    /// whatever tiles the current view needs.
    pub fn poll(&mut self) -> Vec<TileId> {
        self.tracker.poll_tick(&mut self.factory);
        match self.tracker.surface() {
            Some(surface) => {
                let wanted = tiles::neighborhood(surface.center, surface.zoom);
                self.cache.plan_fetches(&wanted)
            }
            None => Vec::new(),
        }
    }

    pub fn tile_loaded(&mut self, tile: TileId, bytes: Vec<u8>) {
        self.cache.insert(tile, image::Handle::from_bytes(bytes));
    }

    pub fn tile_failed(&mut self, tile: TileId) {
        self.cache.mark_failed(tile);
    }

    pub fn view(&self) -> Element<'_, Message> {
        let surface = self.tracker.surface().cloned();
        let cached_tiles = match &surface {
            Some(surface) => tiles::neighborhood(surface.center, surface.zoom)
                .into_iter()
                .filter_map(|tile| self.cache.get(tile).map(|handle| (tile, handle.clone())))
                .collect(),
            None => Vec::new(),
        };

        Canvas::new(MapCanvas {
            surface,
            tiles: cached_tiles,
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}

struct MapCanvas {
    surface: Option<SlippySurface>,
    tiles: Vec<(TileId, image::Handle)>,
}

impl canvas::Program<Message> for MapCanvas {
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
            Color::from_rgb(0.04, 0.05, 0.07),
        );

        let Some(surface) = &self.surface else {
            let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
            let axes = Path::new(|builder| {
                builder.move_to(Point::new(center.x - 40.0, center.y));
                builder.line_to(Point::new(center.x + 40.0, center.y));
                builder.move_to(Point::new(center.x, center.y - 40.0));
                builder.line_to(Point::new(center.x, center.y + 40.0));
            });
            frame.stroke(
                &axes,
                Stroke::default().with_color(Color::from_rgb(0.3, 0.35, 0.45)),
            );
            frame.fill_text(canvas::Text {
                content: "MAP STANDBY".into(),
                position: Point::new(center.x - 46.0, center.y + 52.0),
                color: Color::from_rgb(0.55, 0.6, 0.7),
                ..canvas::Text::default()
            });
            return vec![frame.into_geometry()];
        };

        let (center_x, center_y) = tiles::project(surface.center, surface.zoom);
        let origin = Point::new(bounds.width / 2.0, bounds.height / 2.0);

        for (tile, handle) in &self.tiles {
            let rect = Rectangle::new(
                Point::new(
                    origin.x + (f64::from(tile.x) * f64::from(TILE_SIZE) - center_x) as f32,
                    origin.y + (f64::from(tile.y) * f64::from(TILE_SIZE) - center_y) as f32,
                ),
                Size::new(TILE_SIZE as f32, TILE_SIZE as f32),
            );
            frame.draw_image(rect, canvas::Image::new(handle.clone()));
        }

        let (marker_x, marker_y) = tiles::project(surface.marker, surface.zoom);
        let marker = Point::new(
            origin.x + (marker_x - center_x) as f32,
            origin.y + (marker_y - center_y) as f32,
        );
        let halo = Path::new(|builder| builder.circle(marker, 12.0));
        frame.fill(&halo, Color::from_rgba(0.15, 0.39, 0.92, 0.2));
        let ring = Path::new(|builder| builder.circle(marker, 7.0));
        frame.stroke(
            &ring,
            Stroke::default().with_width(2.0).with_color(Color::WHITE),
        );
        let dot = Path::new(|builder| builder.circle(marker, 5.0));
        frame.fill(&dot, Color::from_rgb(0.15, 0.39, 0.92));

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix() -> Fix {
        Fix::new(29.000784, 77.697562333)
    }

    async fn library() -> TileLibrary {
        tiles::load_library("https://tiles.example.com/{z}/{x}/{y}.png".into())
            .await
            .unwrap()
    }

    #[test]
    fn surface_tracks_view_and_marker_independently() {
        let mut surface = SlippySurface {
            center: fix(),
            zoom: 16,
            marker: fix(),
        };
        surface.move_marker(Fix::new(29.1, 77.7));
        assert_eq!(surface.center, fix());
        surface.set_view(Fix::new(29.1, 77.7), 15);
        assert_eq!(surface.zoom, 15);
    }

    #[tokio::test]
    async fn factory_requires_library_then_mount() {
        let mut factory = SlippyFactory::default();
        assert!(!factory.library_ready());
        assert!(matches!(
            factory.build(fix(), 16),
            Err(SurfaceError::LibraryUnavailable)
        ));

        factory.set_library(library().await);
        assert!(factory.library_ready());
        assert!(matches!(
            factory.build(fix(), 16),
            Err(SurfaceError::MountNotReady(_))
        ));

        factory.set_mounted(true);
        let surface = factory.build(fix(), 16).unwrap();
        assert_eq!(surface.marker, fix());
        assert_eq!(surface.zoom, 16);
    }

    #[tokio::test]
    async fn poll_requests_the_view_neighborhood_once_ready() {
        let metrics = Arc::new(FeedMetrics::new());
        let mut panel = MapPanel::new(metrics);

        assert!(panel.poll().is_empty());

        panel.library_loaded(library().await);
        panel.set_mounted(true);
        let fetches = panel.poll();
        assert_eq!(fetches.len(), 9);

        // Pending tiles are not requested twice.
        assert!(panel.poll().is_empty());

        for tile in fetches {
            panel.tile_loaded(tile, Vec::new());
        }
        assert!(panel.poll().is_empty());
    }

    #[tokio::test]
    async fn snapshot_after_ready_moves_marker() {
        let metrics = Arc::new(FeedMetrics::new());
        let mut panel = MapPanel::new(metrics);
        panel.library_loaded(library().await);
        panel.set_mounted(true);
        panel.poll();

        let snapshot = GpsSnapshot {
            latitude: Some(29.1),
            longitude: Some(77.8),
            valid: true,
            ..Default::default()
        };
        assert!(panel.handle_snapshot(&snapshot));
        assert!(panel.has_fix());
    }
}
