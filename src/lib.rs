//! # eramap
//!
//! Editing core for annotating a historical map with point-of-interest markers
//! and polygon areas, tagged by era and persisted as GeoJSON.
//!
//! The crate is organised the way a small map engine is: geographic primitives
//! and configuration in [`core`], the GeoJSON data model in [`data`], layers in
//! [`layers`], tile-provider selection in [`tiles`], the interactive editing
//! controllers in [`editor`] and the host-side storage in [`gateway`].

pub mod core;
pub mod data;
pub mod editor;
pub mod gateway;
pub mod layers;
pub mod prelude;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{Config, DataLayout, StartView, TileProbeOptions},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    viewport::Viewport,
};

pub use data::{
    geojson::{Feature, FeatureCollection, Geometry, Properties},
    poi::{PoiFormFields, PoiProperties},
    polygon::PolygonStyle,
};

pub use layers::{
    draft::{DraftEntry, DraftGeometry, DraftLayer},
    feature::{EntryId, FeatureLayer},
    tile::TileLayer,
};

pub use tiles::{
    probe::{HttpTileProber, TileProber},
    resolver::{TileResolver, TileStatus},
    source::{TileCandidate, TileSource},
};

pub use editor::{
    draw::{DrawMode, DrawOutcome, DrawSession},
    form::{FormTarget, PoiForm},
    serializer::{SaveState, Serializer},
    session::{EditorSession, Notice, NoticeLevel},
    surface::MapSurface,
};

pub use gateway::{
    fs::FileGateway, FilePicker, ImageImport, InitialBundle, PersistenceGateway, SaveOutcome,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, EditorError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid tile URL template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("another POI is already being edited")]
    EditInProgress,

    #[error("no POI is being edited")]
    NoActiveEdit,

    #[error("a draw gesture is already in progress")]
    DrawInProgress,

    #[error("unknown layer entry: {0}")]
    UnknownEntry(EntryId),
}

/// Error type alias for convenience
pub type Error = EditorError;
