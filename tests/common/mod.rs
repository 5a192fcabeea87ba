//! Shared test doubles: an in-memory gateway and a scripted tile prober.

#![allow(dead_code)]

use async_trait::async_trait;
use eramap::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What the in-memory gateway has been asked to store
#[derive(Debug, Default)]
pub struct Stored {
    pub bundle: InitialBundle,
    pub poi_saves: usize,
    pub polygon_saves: usize,
}

/// Gateway keeping everything in memory; `fail_writes` turns every save into
/// a failure without touching the stored bundle.
#[derive(Default)]
pub struct MemoryGateway {
    pub stored: Mutex<Stored>,
    pub fail_writes: Mutex<bool>,
    pub next_import: Mutex<Option<ImageImport>>,
}

impl MemoryGateway {
    pub fn with_bundle(bundle: InitialBundle) -> Self {
        let gateway = Self::default();
        gateway.stored.lock().unwrap().bundle = bundle;
        gateway
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail_writes.lock().unwrap() = failing;
    }

    pub fn set_next_import(&self, import: ImageImport) {
        *self.next_import.lock().unwrap() = Some(import);
    }

    pub fn stored_pois(&self) -> FeatureCollection {
        self.stored.lock().unwrap().bundle.pois.clone()
    }

    pub fn stored_polygons(&self) -> FeatureCollection {
        self.stored.lock().unwrap().bundle.polygons.clone()
    }

    fn failing(&self) -> bool {
        *self.fail_writes.lock().unwrap()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn fetch_initial_bundle(&self) -> InitialBundle {
        self.stored.lock().unwrap().bundle.clone()
    }

    async fn save_pois(&self, pois: &FeatureCollection) -> SaveOutcome {
        if self.failing() {
            return SaveOutcome::Failed("Error saving POIs: read-only".into());
        }
        let mut stored = self.stored.lock().unwrap();
        stored.bundle.pois = pois.clone();
        stored.poi_saves += 1;
        SaveOutcome::Saved("POIs saved.".into())
    }

    async fn save_polygons(&self, polygons: &FeatureCollection) -> SaveOutcome {
        if self.failing() {
            return SaveOutcome::Failed("Error saving polygons: read-only".into());
        }
        let mut stored = self.stored.lock().unwrap();
        stored.bundle.polygons = polygons.clone();
        stored.polygon_saves += 1;
        SaveOutcome::Saved("Polygons saved.".into())
    }

    async fn save_start_view(&self, start: StartView) -> SaveOutcome {
        if self.failing() {
            return SaveOutcome::Failed("Error saving start view: read-only".into());
        }
        self.stored.lock().unwrap().bundle.config.start = start;
        SaveOutcome::Saved("Start view saved.".into())
    }

    async fn import_image(&self) -> ImageImport {
        self.next_import
            .lock()
            .unwrap()
            .take()
            .unwrap_or(ImageImport::Cancelled)
    }
}

/// Prober answering from a fixed table and recording every probe
#[derive(Default)]
pub struct ScriptedProber {
    pub answers: HashMap<String, bool>,
    pub probed: Mutex<Vec<String>>,
}

impl ScriptedProber {
    pub fn new(answers: &[(&str, bool)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(name, ok)| (name.to_string(), *ok))
                .collect(),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl TileProber for ScriptedProber {
    async fn probe(&self, layer: &TileLayer, _coord: TileCoord, _window: Duration) -> bool {
        self.probed.lock().unwrap().push(layer.name.clone());
        self.answers.get(&layer.name).copied().unwrap_or(false)
    }
}

pub fn poi(title: &str, lat: f64, lng: f64) -> Feature {
    let props = PoiProperties {
        title: title.to_string(),
        ..Default::default()
    };
    Feature::new(Geometry::point(LatLng::new(lat, lng)), props.to_properties())
}

pub fn triangle() -> Vec<LatLng> {
    vec![
        LatLng::new(51.150, 11.800),
        LatLng::new(51.150, 11.810),
        LatLng::new(51.156, 11.805),
    ]
}
