use iced::widget::image;
use navcore::model::Fix;
use std::collections::{HashMap, HashSet};

pub const TILE_SIZE: u32 = 256;

/// Slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

/// Handle to the tile rendering backend, produced asynchronously at boot.
/// The surface adapter polls for its presence before constructing the map.
#[derive(Debug, Clone)]
pub struct TileLibrary {
    http: reqwest::Client,
    template: String,
}

impl TileLibrary {
    pub fn tile_url(&self, tile: TileId) -> String {
        self.template
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

/// Loads the tile backend. Kept async so the shell boots without waiting on
/// it.
pub async fn load_library(template: String) -> Result<TileLibrary, String> {
    let http = reqwest::Client::builder()
        .user_agent("blindstick-dashboard/0.1")
        .build()
        .map_err(|e| e.to_string())?;
    Ok(TileLibrary { http, template })
}

pub async fn fetch_tile(library: TileLibrary, tile: TileId) -> Result<Vec<u8>, String> {
    let url = library.tile_url(tile);
    let response = library
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}

/// Projects a fix into global pixel space at `zoom` (Web Mercator).
pub fn project(fix: Fix, zoom: u8) -> (f64, f64) {
    let scale = f64::from(1u32 << zoom) * f64::from(TILE_SIZE);
    let x = (fix.longitude + 180.0) / 360.0 * scale;
    let lat_rad = fix.latitude.to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0 * scale;
    (x, y)
}

/// Tile containing the projected point, clamped to the grid.
pub fn tile_at(fix: Fix, zoom: u8) -> TileId {
    let (x, y) = project(fix, zoom);
    let max = (1u32 << zoom) - 1;
    TileId {
        zoom,
        x: ((x / f64::from(TILE_SIZE)).max(0.0) as u32).min(max),
        y: ((y / f64::from(TILE_SIZE)).max(0.0) as u32).min(max),
    }
}

/// 3x3 tile neighborhood around the view center, clamped to the grid.
pub fn neighborhood(center: Fix, zoom: u8) -> Vec<TileId> {
    let center_tile = tile_at(center, zoom);
    let max = i64::from((1u32 << zoom) - 1);
    let mut tiles = Vec::with_capacity(9);
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            let x = i64::from(center_tile.x) + dx;
            let y = i64::from(center_tile.y) + dy;
            if x < 0 || y < 0 || x > max || y > max {
                continue;
            }
            tiles.push(TileId {
                zoom,
                x: x as u32,
                y: y as u32,
            });
        }
    }
    tiles
}

/// Tile store with single-fetch discipline: a tile is requested at most
/// once while pending; a failure clears the pending mark so the next view
/// request retries it.
#[derive(Debug, Default)]
pub struct TileCache {
    tiles: HashMap<TileId, image::Handle>,
    pending: HashSet<TileId>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tile: TileId) -> Option<&image::Handle> {
        self.tiles.get(&tile)
    }

    /// Marks and returns the tiles that need a fetch.
    pub fn plan_fetches(&mut self, wanted: &[TileId]) -> Vec<TileId> {
        let mut fetches = Vec::new();
        for &tile in wanted {
            if !self.tiles.contains_key(&tile) && self.pending.insert(tile) {
                fetches.push(tile);
            }
        }
        fetches
    }

    pub fn insert(&mut self, tile: TileId, handle: image::Handle) {
        self.pending.remove(&tile);
        self.tiles.insert(tile, handle);
    }

    pub fn mark_failed(&mut self, tile: TileId) {
        self.pending.remove(&tile);
    }
}
