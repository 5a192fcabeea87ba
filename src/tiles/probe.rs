use crate::core::config::TileProbeOptions;
use crate::core::geo::TileCoord;
use crate::layers::tile::TileLayer;
use crate::tiles::loader::{fetch_tile, HTTP_CLIENT};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Decides whether an attached tile layer demonstrably serves tiles.
///
/// Implementations must return within `window`; `false` means no tile
/// arrived in time.
#[async_trait]
pub trait TileProber: Send + Sync {
    async fn probe(&self, layer: &TileLayer, coord: TileCoord, window: Duration) -> bool;
}

/// Probes by fetching one real tile, from disk or over HTTP
#[derive(Debug, Clone)]
pub struct HttpTileProber {
    client: reqwest::Client,
}

impl HttpTileProber {
    pub fn new(options: &TileProbeOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl Default for HttpTileProber {
    fn default() -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
        }
    }
}

#[async_trait]
impl TileProber for HttpTileProber {
    async fn probe(&self, layer: &TileLayer, coord: TileCoord, window: Duration) -> bool {
        match tokio::time::timeout(window, fetch_tile(&self.client, layer, coord)).await {
            Ok(Ok(data)) => {
                log::debug!("{} served {:?} ({} bytes)", layer.name, coord, data.len());
                true
            }
            Ok(Err(e)) => {
                log::debug!("{} failed {:?}: {}", layer.name, coord, e);
                false
            }
            Err(_) => {
                log::debug!("{} timed out after {:?}", layer.name, window);
                false
            }
        }
    }
}
