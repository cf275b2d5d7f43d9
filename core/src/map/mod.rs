pub mod surface;
pub mod tracker;

pub use surface::{
    DrawingSurface, MapSurfaceAdapter, MapSurfaceState, SurfaceError, SurfaceFactory,
};
pub use tracker::{PositionTracker, TrackerConfig};

#[cfg(test)]
pub(crate) mod testutil {
    use super::surface::{DrawingSurface, SurfaceError, SurfaceFactory};
    use crate::model::Fix;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceCall {
        View(Fix, u8),
        Marker(Fix),
    }

    /// Surface double that records every operation in order.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<SurfaceCall>,
    }

    impl RecordingSurface {
        pub fn last_marker(&self) -> Option<Fix> {
            self.calls.iter().rev().find_map(|call| match call {
                SurfaceCall::Marker(fix) => Some(*fix),
                _ => None,
            })
        }

        pub fn last_view(&self) -> Option<(Fix, u8)> {
            self.calls.iter().rev().find_map(|call| match call {
                SurfaceCall::View(fix, zoom) => Some((*fix, *zoom)),
                _ => None,
            })
        }
    }

    impl DrawingSurface for RecordingSurface {
        fn set_view(&mut self, center: Fix, zoom: u8) {
            self.calls.push(SurfaceCall::View(center, zoom));
        }

        fn move_marker(&mut self, position: Fix) {
            self.calls.push(SurfaceCall::Marker(position));
        }
    }

    /// Factory double with a toggleable library and scriptable build
    /// failures.
    #[derive(Debug, Default)]
    pub struct StubFactory {
        pub library_loaded: bool,
        pub failures_left: u32,
        pub build_calls: u32,
    }

    impl SurfaceFactory for StubFactory {
        type Surface = RecordingSurface;

        fn library_ready(&self) -> bool {
            self.library_loaded
        }

        fn build(&mut self, initial: Fix, zoom: u8) -> Result<RecordingSurface, SurfaceError> {
            self.build_calls += 1;
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(SurfaceError::MountNotReady("mount missing".into()));
            }
            let mut surface = RecordingSurface::default();
            surface.set_view(initial, zoom);
            surface.move_marker(initial);
            Ok(surface)
        }
    }
}
