//! Folding persisted and draft geometries into the collections that get saved.
//!
//! A save is optimistic: whatever the gateway answers, the layer is rebuilt
//! from the collection that was sent and the merged drafts leave the draft
//! layer. The answer only decides the recorded [`SaveState`].

use crate::core::constants::DEFAULT_POI_TITLE;
use crate::data::geojson::{Feature, FeatureCollection, Geometry, Properties};
use crate::data::polygon::PolygonStyle;
use crate::editor::surface::MapSurface;
use crate::gateway::SaveOutcome;
use crate::layers::base::EntryId;

/// Lifecycle of one save target
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Pending,
    Committed(String),
    Failed(String),
}

impl SaveState {
    pub fn is_failed(&self) -> bool {
        matches!(self, SaveState::Failed(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SaveState::Committed(msg) | SaveState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<&SaveOutcome> for SaveState {
    fn from(outcome: &SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Saved(msg) => SaveState::Committed(msg.clone()),
            SaveOutcome::Failed(msg) => SaveState::Failed(msg.clone()),
        }
    }
}

/// A collection ready to be sent, plus the draft entries folded into it
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub collection: FeatureCollection,
    pub merged_drafts: Vec<EntryId>,
}

pub struct Serializer;

impl Serializer {
    /// Persisted POIs followed by every committed draft marker. A persisted
    /// POI without a usable title is written with the default one.
    pub fn collect_pois(surface: &MapSurface) -> PendingSave {
        let mut features: Vec<Feature> = surface
            .pois()
            .features()
            .cloned()
            .map(with_title)
            .collect();
        let mut merged_drafts = Vec::new();

        for (id, position, props) in surface.draft().committed_markers() {
            features.push(Feature::new(Geometry::point(position), props.to_properties()));
            merged_drafts.push(id);
        }

        PendingSave {
            collection: FeatureCollection::new(features),
            merged_drafts,
        }
    }

    /// Persisted polygons followed by drafted polygons in the default style.
    /// Rectangles are left in the draft layer.
    pub fn collect_polygons(surface: &MapSurface) -> PendingSave {
        let mut features: Vec<Feature> = surface.polygons().features().cloned().collect();
        let mut merged_drafts = Vec::new();
        let style = PolygonStyle::default().to_properties();

        for (id, ring) in surface.draft().polygons() {
            features.push(Feature::new(Geometry::polygon(ring), style.clone()));
            merged_drafts.push(id);
        }

        PendingSave {
            collection: FeatureCollection::new(features),
            merged_drafts,
        }
    }

    /// Re-renders the POI layer from the sent collection
    pub fn apply_pois(surface: &mut MapSurface, pending: &PendingSave) {
        surface.render_pois(&pending.collection);
        surface.draft_mut().remove_all(&pending.merged_drafts);
    }

    pub fn apply_polygons(surface: &mut MapSurface, pending: &PendingSave) {
        surface.render_polygons(&pending.collection);
        surface.draft_mut().remove_all(&pending.merged_drafts);
    }

    /// Whether a POI save would write anything the layer does not hold yet
    pub fn has_draft_pois(surface: &MapSurface) -> bool {
        surface.draft().iter().any(|e| e.geometry.is_committed_marker())
    }

    pub fn has_draft_polygons(surface: &MapSurface) -> bool {
        surface.draft().iter().any(|e| e.geometry.is_polygon())
    }
}

fn with_title(mut feature: Feature) -> Feature {
    let props = feature.properties.get_or_insert_with(Properties::new);
    let titled = props
        .get("title")
        .and_then(|title| title.as_str())
        .is_some_and(|title| !title.trim().is_empty());
    if !titled {
        props.insert("title".into(), DEFAULT_POI_TITLE.into());
    }
    feature
}
