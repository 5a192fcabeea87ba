//! Configuration for the editor
//!
//! Three pieces live here: the persisted [`Config`] document (start view and
//! era list), the on-disk [`DataLayout`] the file gateway reads and writes, and
//! the [`TileProbeOptions`] that drive tile-provider selection.

use crate::core::constants::{
    DEFAULT_ERAS, DEFAULT_MAX_ZOOM, DEFAULT_START_LAT, DEFAULT_START_LON, DEFAULT_START_ZOOM,
    HTTP_USER_AGENT, TILE_PROBE_WINDOW_MS,
};
use crate::core::geo::LatLng;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Initial map view stored in `config.json`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartView {
    pub lat: f64,
    pub lon: f64,
    #[serde(deserialize_with = "zoom_level")]
    pub zoom: u8,
}

/// Accepts any JSON number as a zoom level, rounded and clamped to the
/// supported range.
fn zoom_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let zoom = f64::deserialize(deserializer)?;
    if !zoom.is_finite() {
        return Err(serde::de::Error::custom("zoom must be a finite number"));
    }
    Ok(zoom.round().clamp(0.0, DEFAULT_MAX_ZOOM as f64) as u8)
}

impl StartView {
    pub fn new(lat: f64, lon: f64, zoom: u8) -> Self {
        Self { lat, lon, zoom }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

impl Default for StartView {
    fn default() -> Self {
        Self::new(DEFAULT_START_LAT, DEFAULT_START_LON, DEFAULT_START_ZOOM)
    }
}

/// The configuration document: start view plus the ordered era list.
///
/// Keys the editor does not know about are kept in `extra` so rewriting the
/// start view leaves the rest of the document untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub start: StartView,
    #[serde(default)]
    pub start_era_index: usize,
    #[serde(default)]
    pub eras: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    /// Era shown first, if the index points into the list.
    pub fn start_era(&self) -> Option<&str> {
        self.eras.get(self.start_era_index).map(String::as_str)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start: StartView::default(),
            start_era_index: 0,
            eras: DEFAULT_ERAS.iter().map(|era| era.to_string()).collect(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Where the editor keeps its files, relative to a project root.
///
/// ```text
/// <root>/src/assets/data/config.json
/// <root>/src/assets/data/pois.json
/// <root>/src/assets/data/polygons.geojson
/// <root>/src/assets/images/
/// <root>/Editor/assets/tiles/   (optional, preferred)
/// <root>/src/assets/tiles/      (optional)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataLayout {
    /// Directory the published map is served from; image paths are relative to it.
    pub site_root: PathBuf,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    pub config_path: PathBuf,
    pub pois_path: PathBuf,
    pub polygons_path: PathBuf,
    /// Local tile directories in preference order.
    pub tile_dirs: Vec<PathBuf>,
}

impl DataLayout {
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let site_root = root.join("src");
        let assets = site_root.join("assets");
        let data_dir = assets.join("data");

        Self {
            images_dir: assets.join("images"),
            config_path: data_dir.join("config.json"),
            pois_path: data_dir.join("pois.json"),
            polygons_path: data_dir.join("polygons.geojson"),
            tile_dirs: vec![
                root.join("Editor").join("assets").join("tiles"),
                assets.join("tiles"),
            ],
            data_dir,
            site_root,
        }
    }

    /// First local tile directory that exists on disk.
    pub fn local_tiles_dir(&self) -> Option<&Path> {
        self.tile_dirs
            .iter()
            .find(|dir| dir.is_dir())
            .map(PathBuf::as_path)
    }

    /// Path prefix (forward slashes) under which imported images are referenced.
    pub fn image_url_prefix(&self) -> String {
        let relative = self
            .images_dir
            .strip_prefix(&self.site_root)
            .unwrap_or(&self.images_dir);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Options for tile-provider probing
#[derive(Debug, Clone, PartialEq)]
pub struct TileProbeOptions {
    /// How long each candidate gets to serve a tile
    pub probe_window: Duration,
    /// Highest zoom level requested from a provider
    pub max_zoom: u8,
    pub user_agent: String,
}

impl TileProbeOptions {
    /// Short window for tests that script the prober.
    pub fn for_testing() -> Self {
        Self {
            probe_window: Duration::from_millis(20),
            ..Self::default()
        }
    }
}

impl Default for TileProbeOptions {
    fn default() -> Self {
        Self {
            probe_window: Duration::from_millis(TILE_PROBE_WINDOW_MS),
            max_zoom: DEFAULT_MAX_ZOOM,
            user_agent: HTTP_USER_AGENT.to_string(),
        }
    }
}
