use crate::map::surface::{DrawingSurface, MapSurfaceAdapter, SurfaceFactory};
use crate::model::{Fix, GpsSnapshot, FALLBACK_FIX};
use crate::telemetry::FeedMetrics;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Tunables for the live position tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Zoom applied on every recenter.
    pub zoom: u8,
    /// Cadence at which the driver should call [`PositionTracker::poll_tick`].
    pub poll_interval: Duration,
    /// Bound on surface construction attempts; `None` retries forever.
    pub max_init_attempts: Option<u32>,
    /// View center used only if the surface comes up before any fix arrived.
    pub fallback_fix: Fix,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            zoom: 16,
            poll_interval: Duration::from_millis(100),
            max_init_attempts: None,
            fallback_fix: FALLBACK_FIX,
        }
    }
}

/// Keeps the map surface in sync with the latest valid position.
///
/// Owns the last-known fix and the surface adapter. Snapshot delivery and
/// availability poll ticks are independent timers and may interleave in any
/// order; both become no-ops after [`PositionTracker::detach`].
pub struct PositionTracker<S: DrawingSurface> {
    config: TrackerConfig,
    adapter: MapSurfaceAdapter<S>,
    last_fix: Option<Fix>,
    detached: bool,
    metrics: Arc<FeedMetrics>,
}

impl<S: DrawingSurface> PositionTracker<S> {
    pub fn new(config: TrackerConfig, metrics: Arc<FeedMetrics>) -> Self {
        Self {
            config,
            adapter: MapSurfaceAdapter::new(),
            last_fix: None,
            detached: false,
            metrics,
        }
    }

    /// Processes one feed snapshot. Non-actionable records are dropped and
    /// the previously displayed position is kept. Returns whether the
    /// snapshot moved the tracked position.
    pub fn handle_snapshot(&mut self, snapshot: &GpsSnapshot) -> bool {
        if self.detached {
            return false;
        }
        let Some(fix) = snapshot.actionable() else {
            self.metrics.record_rejected();
            debug!("dropping non-actionable gps snapshot");
            return false;
        };
        self.last_fix = Some(fix);
        self.metrics.record_applied();
        self.apply(fix);
        true
    }

    /// Availability poll tick. Drives lazy surface construction with the
    /// latest known fix, and on the tick the surface becomes ready applies
    /// that fix so the marker reflects the most recent snapshot rather than
    /// an intermediate one.
    pub fn poll_tick<F>(&mut self, factory: &mut F)
    where
        F: SurfaceFactory<Surface = S>,
    {
        if self.detached {
            return;
        }
        let initial = self.last_fix.unwrap_or(self.config.fallback_fix);
        let became_ready = self.adapter.poll_initialize(
            factory,
            initial,
            self.config.zoom,
            self.config.max_init_attempts,
        );
        if became_ready {
            if let Some(fix) = self.last_fix {
                self.apply(fix);
            }
        }
    }

    fn apply(&mut self, fix: Fix) {
        self.adapter.move_marker(fix);
        self.adapter.set_view(fix, self.config.zoom);
    }

    /// Tears the tracker down. Idempotent; afterwards neither snapshots nor
    /// poll ticks have any effect.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn is_ready(&self) -> bool {
        self.adapter.is_ready()
    }

    pub fn last_fix(&self) -> Option<Fix> {
        self.last_fix
    }

    pub fn surface(&self) -> Option<&S> {
        self.adapter.surface()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}
