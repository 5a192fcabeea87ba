use crate::core::geo::TileCoord;
use std::path::Path;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// One entry of the provider fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCandidate {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

impl TileCandidate {
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        attribution: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            attribution: attribution.into(),
        }
    }

    /// Candidate serving `<dir>/{z}/{x}/{y}.png` from disk
    pub fn local(dir: &Path) -> Self {
        let base = dir.to_string_lossy().replace('\\', "/");
        let base = base.trim_end_matches('/');
        let url = if base.starts_with('/') {
            format!("file://{base}/{{z}}/{{x}}/{{y}}.png")
        } else {
            format!("file:///{base}/{{z}}/{{x}}/{{y}}.png")
        };
        Self::new("LOCAL tiles", url, "(local)")
    }
}

/// The remote providers, in fallback order
pub fn remote_candidates() -> Vec<TileCandidate> {
    const OSM: &str = "© OpenStreetMap contributors";
    vec![
        TileCandidate::new("OSM main", "https://tile.openstreetmap.org/{z}/{x}/{y}.png", OSM),
        TileCandidate::new("OSM DE", "https://tile.openstreetmap.de/{z}/{x}/{y}.png", OSM),
        TileCandidate::new(
            "OSM FR",
            "https://a.tile.openstreetmap.fr/osmfr/{z}/{x}/{y}.png",
            "© OpenStreetMap contributors & OSM-FR",
        ),
    ]
}

/// Full chain: local tiles first when a tile directory exists, then remote
pub fn default_candidates(local_tiles: Option<&Path>) -> Vec<TileCandidate> {
    let mut candidates = Vec::new();
    if let Some(dir) = local_tiles {
        candidates.push(TileCandidate::local(dir));
    }
    candidates.extend(remote_candidates());
    candidates
}
