//! Sequential tile-provider selection.
//!
//! Candidates are tried strictly one after another: the layer is attached,
//! given one probe window to serve the tile under the map center, and either
//! kept or detached before the next candidate is touched. At most one tile
//! layer is ever attached.

use crate::core::config::TileProbeOptions;
use crate::editor::surface::MapSurface;
use crate::layers::tile::TileLayer;
use crate::tiles::probe::TileProber;
use crate::tiles::source::TileCandidate;

/// Outcome of tile resolution, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TileStatus {
    /// Resolution has not finished yet
    #[default]
    Pending,
    Active {
        name: String,
        attribution: String,
    },
    /// Every candidate failed; the map has no background
    Unavailable,
}

impl TileStatus {
    pub fn active_name(&self) -> Option<&str> {
        match self {
            TileStatus::Active { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, TileStatus::Unavailable)
    }

    /// Text of the provider badge or the persistent warning banner
    pub fn label(&self) -> String {
        match self {
            TileStatus::Pending => "Tiles: loading…".to_string(),
            TileStatus::Active { name, .. } => format!("Tiles: {name}"),
            TileStatus::Unavailable => {
                "Tiles not loaded – check the internet connection and local tiles.".to_string()
            }
        }
    }
}

/// Ordered candidate list plus the per-candidate deadline
#[derive(Debug, Clone)]
pub struct TileResolver {
    candidates: Vec<TileCandidate>,
    options: TileProbeOptions,
}

impl TileResolver {
    pub fn new(candidates: Vec<TileCandidate>, options: TileProbeOptions) -> Self {
        Self {
            candidates,
            options,
        }
    }

    pub fn candidates(&self) -> &[TileCandidate] {
        &self.candidates
    }

    /// Activates the first candidate that serves a tile within the probe
    /// window and records the result on the surface.
    pub async fn resolve<P>(&self, surface: &mut MapSurface, prober: &P) -> TileStatus
    where
        P: TileProber + ?Sized,
    {
        surface.detach_tile_layer();

        for candidate in &self.candidates {
            let layer = match TileLayer::from_candidate(candidate, self.options.max_zoom) {
                Ok(layer) => layer,
                Err(e) => {
                    log::warn!("skipping tile provider {}: {}", candidate.name, e);
                    continue;
                }
            };

            let coord = surface.viewport().center_tile(layer.max_zoom);
            surface.attach_tile_layer(layer);
            log::debug!("probing tile provider {} at {:?}", candidate.name, coord);

            let served = match surface.tile_layer() {
                Some(layer) => prober.probe(layer, coord, self.options.probe_window).await,
                None => false,
            };

            if served {
                let status = TileStatus::Active {
                    name: candidate.name.clone(),
                    attribution: candidate.attribution.clone(),
                };
                log::info!("using tile provider {}", candidate.name);
                surface.set_tile_status(status.clone());
                return status;
            }

            log::info!("tile provider {} did not respond, trying next", candidate.name);
            surface.detach_tile_layer();
        }

        log::warn!("no tile provider available");
        surface.set_tile_status(TileStatus::Unavailable);
        TileStatus::Unavailable
    }
}
