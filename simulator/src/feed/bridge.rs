use log::info;
use navcore::model::{GpsSnapshot, StreamLocator};
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::Filter;

/// Values currently published at the two feed paths. `None` serializes to
/// JSON `null`, which is what the hosted store answers for an absent
/// record.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub gps: Option<GpsSnapshot>,
    pub camera_link: Option<StreamLocator>,
}

/// Stand-in for the hosted database: serves the same path-addressed GET
/// surface the dashboard's feed client consumes, from a dedicated thread.
pub struct DeviceFeed {
    state: Arc<RwLock<FeedState>>,
}

impl DeviceFeed {
    pub fn serve(port: u16) -> Self {
        let state = Arc::new(RwLock::new(FeedState::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());

        let gps_route = warp::path!("blind_stick" / "gps.json")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<FeedState>>| warp::reply::json(&state.read().unwrap().gps));

        let camera_route = warp::path!("live_camera" / "link.json")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<FeedState>>| {
                warp::reply::json(&state.read().unwrap().camera_link)
            });

        let address = SocketAddr::from(([127, 0, 0, 1], port));
        thread::spawn(move || {
            let routes = gps_route.or(camera_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build feed runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        });
        info!("device feed listening on {address}");

        Self { state }
    }

    pub fn publish_gps(&self, snapshot: GpsSnapshot) {
        if let Ok(mut state) = self.state.write() {
            state.gps = Some(snapshot);
        }
    }

    pub fn publish_camera_link(&self, locator: StreamLocator) {
        if let Ok(mut state) = self.state.write() {
            state.camera_link = Some(locator);
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> FeedState {
        self.state.read().unwrap().clone()
    }
}
