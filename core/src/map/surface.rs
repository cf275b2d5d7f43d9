use crate::model::Fix;
use log::{info, warn};

/// Capability surface offered by the map/tile rendering backend. The
/// adapter is the sole writer; rendering code may inspect the concrete
/// surface through [`MapSurfaceAdapter::surface`].
pub trait DrawingSurface {
    fn set_view(&mut self, center: Fix, zoom: u8);
    fn move_marker(&mut self, position: Fix);
}

#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    #[error("drawing library not loaded")]
    LibraryUnavailable,
    #[error("mount not ready: {0}")]
    MountNotReady(String),
    #[error("surface construction failed: {0}")]
    Construction(String),
}

/// Source of drawing surfaces. `library_ready` reports whether the backing
/// library has finished loading; `build` may still fail afterwards (the
/// mount may not exist yet) and is retried on subsequent poll ticks.
pub trait SurfaceFactory {
    type Surface: DrawingSurface;

    fn library_ready(&self) -> bool;
    fn build(&mut self, initial: Fix, zoom: u8) -> Result<Self::Surface, SurfaceError>;
}

/// Lifecycle of the map surface. Transitions run strictly forward:
/// `Uninitialized` until the library is observed, `Initializing` while
/// construction attempts run, `Ready` once exactly one attempt succeeds.
#[derive(Debug)]
pub enum MapSurfaceState<S> {
    Uninitialized,
    Initializing { attempts: u32 },
    Ready(S),
}

/// Owns the drawing surface and guards its construction with the state
/// machine above. Construction succeeds at most once per process; the
/// state, not a fresh library check, is the guard.
#[derive(Debug)]
pub struct MapSurfaceAdapter<S> {
    state: MapSurfaceState<S>,
}

impl<S: DrawingSurface> MapSurfaceAdapter<S> {
    pub fn new() -> Self {
        Self {
            state: MapSurfaceState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, MapSurfaceState::Ready(_))
    }

    pub fn state(&self) -> &MapSurfaceState<S> {
        &self.state
    }

    pub fn surface(&self) -> Option<&S> {
        match &self.state {
            MapSurfaceState::Ready(surface) => Some(surface),
            _ => None,
        }
    }

    /// Drives initialization from the periodic availability poll. A failed
    /// construction attempt is logged and retried on the next tick, bounded
    /// by `max_attempts` (`None` retries forever). Returns true on the tick
    /// the adapter becomes `Ready`.
    pub fn poll_initialize<F>(
        &mut self,
        factory: &mut F,
        initial: Fix,
        zoom: u8,
        max_attempts: Option<u32>,
    ) -> bool
    where
        F: SurfaceFactory<Surface = S>,
    {
        let attempts = match self.state {
            MapSurfaceState::Ready(_) => return false,
            MapSurfaceState::Uninitialized => {
                if !factory.library_ready() {
                    return false;
                }
                0
            }
            MapSurfaceState::Initializing { attempts } => {
                if max_attempts.is_some_and(|cap| attempts >= cap) {
                    return false;
                }
                attempts
            }
        };

        self.state = MapSurfaceState::Initializing {
            attempts: attempts + 1,
        };
        match factory.build(initial, zoom) {
            Ok(surface) => {
                info!(
                    "map surface ready at ({:.6}, {:.6}), attempt {}",
                    initial.latitude,
                    initial.longitude,
                    attempts + 1
                );
                self.state = MapSurfaceState::Ready(surface);
                true
            }
            Err(err) => {
                warn!("map surface construction deferred: {err}");
                false
            }
        }
    }

    /// Recenters the surface. No-op unless `Ready`.
    pub fn set_view(&mut self, center: Fix, zoom: u8) {
        if let MapSurfaceState::Ready(surface) = &mut self.state {
            surface.set_view(center, zoom);
        }
    }

    /// Relocates the position marker. No-op unless `Ready`.
    pub fn move_marker(&mut self, position: Fix) {
        if let MapSurfaceState::Ready(surface) = &mut self.state {
            surface.move_marker(position);
        }
    }
}

impl<S: DrawingSurface> Default for MapSurfaceAdapter<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::testutil::{StubFactory, SurfaceCall};
    use crate::model::Fix;

    const HOME: Fix = Fix {
        latitude: 29.000784,
        longitude: 77.697562333,
    };

    #[test]
    fn nothing_happens_while_library_is_missing() {
        let mut adapter = MapSurfaceAdapter::new();
        let mut factory = StubFactory::default();

        for _ in 0..5 {
            assert!(!adapter.poll_initialize(&mut factory, HOME, 16, None));
        }
        assert_eq!(factory.build_calls, 0);
        assert!(matches!(adapter.state(), MapSurfaceState::Uninitialized));
    }

    #[test]
    fn initializes_exactly_once_after_library_appears() {
        let mut adapter = MapSurfaceAdapter::new();
        let mut factory = StubFactory {
            library_loaded: true,
            ..Default::default()
        };

        assert!(adapter.poll_initialize(&mut factory, HOME, 16, None));
        // Poll keeps firing after success; nothing rebuilds.
        for _ in 0..5 {
            assert!(!adapter.poll_initialize(&mut factory, HOME, 16, None));
        }
        assert_eq!(factory.build_calls, 1);
        assert!(adapter.is_ready());
    }

    #[test]
    fn failed_construction_retries_on_later_ticks() {
        let mut adapter = MapSurfaceAdapter::new();
        let mut factory = StubFactory {
            library_loaded: true,
            failures_left: 2,
            ..Default::default()
        };

        assert!(!adapter.poll_initialize(&mut factory, HOME, 16, None));
        assert!(matches!(
            adapter.state(),
            MapSurfaceState::Initializing { attempts: 1 }
        ));
        assert!(!adapter.poll_initialize(&mut factory, HOME, 16, None));
        assert!(adapter.poll_initialize(&mut factory, HOME, 16, None));
        assert_eq!(factory.build_calls, 3);
    }

    #[test]
    fn attempt_cap_stops_retrying() {
        let mut adapter = MapSurfaceAdapter::new();
        let mut factory = StubFactory {
            library_loaded: true,
            failures_left: u32::MAX,
            ..Default::default()
        };

        for _ in 0..10 {
            adapter.poll_initialize(&mut factory, HOME, 16, Some(3));
        }
        assert_eq!(factory.build_calls, 3);
        assert!(!adapter.is_ready());
    }

    #[test]
    fn operations_are_noops_before_ready() {
        let mut adapter: MapSurfaceAdapter<crate::map::testutil::RecordingSurface> =
            MapSurfaceAdapter::new();
        adapter.set_view(HOME, 16);
        adapter.move_marker(HOME);
        assert!(adapter.surface().is_none());
    }

    #[test]
    fn operations_reach_surface_once_ready() {
        let mut adapter = MapSurfaceAdapter::new();
        let mut factory = StubFactory {
            library_loaded: true,
            ..Default::default()
        };
        adapter.poll_initialize(&mut factory, HOME, 16, None);

        let target = Fix::new(29.1, 77.7);
        adapter.move_marker(target);
        adapter.set_view(target, 16);

        let surface = adapter.surface().unwrap();
        assert_eq!(surface.last_marker(), Some(target));
        assert_eq!(surface.last_view(), Some((target, 16)));
        assert_eq!(surface.calls[0], SurfaceCall::View(HOME, 16));
    }
}
