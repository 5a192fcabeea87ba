use super::source::TileSource;
use crate::core::constants::HTTP_USER_AGENT;
use crate::core::geo::TileCoord;
use crate::layers::tile::TileLayer;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use crossbeam_channel::Sender;
use std::time::Duration;

/// Shared async HTTP client with a custom User-Agent so that public tile
/// servers (e.g. OpenStreetMap) don't reject the request. Building the client
/// once avoids the cost of TLS and connection pool setup for every tile.
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(HTTP_USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .expect("failed to build reqwest async client")
});

/// Fetches one tile, from disk for `file://` layers or over HTTP otherwise.
/// An empty body counts as a failure.
pub async fn fetch_tile(client: &reqwest::Client, layer: &TileLayer, coord: TileCoord) -> Result<Vec<u8>> {
    let data = match layer.local_path(coord) {
        Some(path) => tokio::fs::read(&path).await?,
        None => {
            let resp = client.get(layer.url(coord)).send().await?.error_for_status()?;
            resp.bytes().await?.to_vec()
        }
    };

    if data.is_empty() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("empty tile {coord:?} from {}", layer.name),
        )));
    }
    Ok(data)
}

/// Result of a tile loading operation
#[derive(Debug)]
pub struct TileResult {
    pub coord: TileCoord,
    pub data: Result<Vec<u8>>,
}

/// Tile loader that fetches tiles on the tokio runtime and sends the
/// resulting bytes back over a channel the UI thread drains.
pub struct TileLoader {
    tx: Sender<TileResult>,
    runtime: tokio::runtime::Handle,
    max_attempts: usize,
}

impl TileLoader {
    /// Create a new tile loader given a sender to report completed downloads.
    pub fn new(tx: Sender<TileResult>, runtime: tokio::runtime::Handle) -> Self {
        Self {
            tx,
            runtime,
            max_attempts: 2,
        }
    }

    /// Start downloading the specified tile. The download runs as a detached
    /// task so that it does not block the caller. When the request finishes
    /// (successfully or not), the sender receives a [`TileResult`].
    pub fn start_download(&self, layer: &TileLayer, coord: TileCoord) {
        let layer = layer.clone();
        let tx = self.tx.clone();
        let max_attempts = self.max_attempts;

        self.runtime.spawn(async move {
            let mut attempt = 1;
            let data = loop {
                log::debug!("fetch tile {:?} attempt {}", coord, attempt);
                match fetch_tile(&HTTP_CLIENT, &layer, coord).await {
                    Ok(data) => {
                        log::debug!("downloaded tile {:?} ({} bytes)", coord, data.len());
                        break Ok(data);
                    }
                    Err(e) if attempt < max_attempts => {
                        log::warn!("tile {:?} download failed on attempt {}: {}", coord, attempt, e);
                        attempt += 1;
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                    Err(e) => {
                        log::error!("giving up on tile {:?}: {}", coord, e);
                        break Err(e);
                    }
                }
            };
            let _ = tx.send(TileResult { coord, data });
        });
    }
}
