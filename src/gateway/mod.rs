//! Host-side storage: the async contract the editor persists through.

pub mod fs;

use crate::core::config::{Config, StartView};
use crate::core::constants::IMPORT_ERROR_TAG;
use crate::data::geojson::FeatureCollection;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the editor needs at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialBundle {
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub pois: FeatureCollection,
    #[serde(default)]
    pub polygons: FeatureCollection,
}

/// Human-readable result of a save call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(String),
    Failed(String),
}

impl SaveOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SaveOutcome::Saved(msg) | SaveOutcome::Failed(msg) => msg,
        }
    }
}

/// Result of the "import image" operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageImport {
    /// Path relative to the site root, inserted verbatim into the form
    Imported(String),
    /// The picker was dismissed
    Cancelled,
    Failed(String),
}

impl ImageImport {
    /// String form used across process boundaries: the path, an empty string
    /// on cancel, or the error text prefixed with `ERROR:`.
    pub fn to_wire(&self) -> String {
        match self {
            ImageImport::Imported(path) => path.clone(),
            ImageImport::Cancelled => String::new(),
            ImageImport::Failed(msg) => format!("{IMPORT_ERROR_TAG}{msg}"),
        }
    }

    pub fn from_wire(raw: &str) -> Self {
        if raw.is_empty() {
            ImageImport::Cancelled
        } else if let Some(msg) = raw.strip_prefix(IMPORT_ERROR_TAG) {
            ImageImport::Failed(msg.to_string())
        } else {
            ImageImport::Imported(raw.to_string())
        }
    }
}

/// Storage operations the editor core awaits.
///
/// None of these fail at the type level: reads substitute defaults and
/// writes report their result as a message.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Config plus both collections, with defaults for anything missing
    async fn fetch_initial_bundle(&self) -> InitialBundle;

    /// Writes the POI collection verbatim
    async fn save_pois(&self, pois: &FeatureCollection) -> SaveOutcome;

    async fn save_polygons(&self, polygons: &FeatureCollection) -> SaveOutcome;

    /// Replaces `start` in the stored config, keeping every other field
    async fn save_start_view(&self, start: StartView) -> SaveOutcome;

    async fn import_image(&self) -> ImageImport;
}

/// Source of the image file to import, usually a native dialog
pub trait FilePicker: Send + Sync {
    /// `None` when the user cancels
    fn pick_image(&self) -> Option<PathBuf>;
}

impl<F> FilePicker for F
where
    F: Fn() -> Option<PathBuf> + Send + Sync,
{
    fn pick_image(&self) -> Option<PathBuf> {
        self()
    }
}
