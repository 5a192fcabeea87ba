//! Tile layer built from a URL template.
//!
//! Templates use the usual slippy-map placeholders `{z}`, `{x}`, `{y}` and an
//! optional `{s}` subdomain. `file://` templates address a local tile tree.

use crate::core::constants::DEFAULT_MAX_ZOOM;
use crate::core::geo::TileCoord;
use crate::tiles::source::{TileCandidate, TileSource};
use crate::{Error, Result};
use std::path::PathBuf;

const FILE_SCHEME: &str = "file://";

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// Provider name shown as the active source
    pub name: String,
    /// URL template for tiles (e.g., "https://tile.openstreetmap.org/{z}/{x}/{y}.png")
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
    pub subdomains: Vec<String>,
}

impl TileLayer {
    /// Creates a layer, rejecting templates that cannot address a tile
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        attribution: impl Into<String>,
    ) -> Result<Self> {
        let url_template = url_template.into();
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !url_template.contains(placeholder) {
                return Err(Error::InvalidTemplate(format!(
                    "{url_template} lacks {placeholder}"
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            url_template,
            attribution: attribution.into(),
            max_zoom: DEFAULT_MAX_ZOOM,
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        })
    }

    pub fn from_candidate(candidate: &TileCandidate, max_zoom: u8) -> Result<Self> {
        let mut layer = Self::new(
            candidate.name.clone(),
            candidate.url_template.clone(),
            candidate.attribution.clone(),
        )?;
        layer.max_zoom = max_zoom;
        Ok(layer)
    }

    pub fn is_local(&self) -> bool {
        self.url_template.starts_with(FILE_SCHEME)
    }

    /// Filesystem path of a tile for `file://` layers
    pub fn local_path(&self, coord: TileCoord) -> Option<PathBuf> {
        let url = self.url(coord);
        let path = url.strip_prefix(FILE_SCHEME)?;
        // file:///C:/tiles/... names a drive, not a root-relative path
        let path = match path.as_bytes() {
            [b'/', _, b':', ..] => &path[1..],
            _ => path,
        };
        Some(PathBuf::from(path))
    }
}

impl TileSource for TileLayer {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = self
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if url.contains("{s}") {
            // Guard against an empty subdomain list
            let sub = if self.subdomains.is_empty() {
                String::new()
            } else {
                let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
                self.subdomains[idx].clone()
            };
            url = url.replace("{s}", &sub);
        }
        url
    }
}
