//! Prelude module for common eramap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use eramap::prelude::*;`

pub use crate::core::{
    config::{Config, DataLayout, StartView, TileProbeOptions},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    viewport::Viewport,
};

pub use crate::data::{
    geojson::{Feature, FeatureCollection, Geometry, Properties},
    poi::{PoiFormFields, PoiProperties},
    polygon::PolygonStyle,
};

pub use crate::layers::{
    draft::{DraftEntry, DraftGeometry, DraftLayer},
    feature::{EntryId, FeatureLayer},
    tile::TileLayer,
};

pub use crate::tiles::{
    probe::{HttpTileProber, TileProber},
    resolver::{TileResolver, TileStatus},
    source::{TileCandidate, TileSource},
};

pub use crate::editor::{
    draw::{DrawMode, DrawOutcome},
    form::{FormTarget, PoiForm},
    serializer::SaveState,
    session::{EditorSession, Notice, NoticeLevel},
    surface::MapSurface,
};

pub use crate::gateway::{
    fs::FileGateway, FilePicker, ImageImport, InitialBundle, PersistenceGateway, SaveOutcome,
};

pub use crate::{Error as EditorError, Result};
