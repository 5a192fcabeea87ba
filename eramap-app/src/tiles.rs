//! Tile textures for the map canvas: downloads through the library loader,
//! decodes on arrival and keeps the most recent textures in an LRU.

use crossbeam_channel::{unbounded, Receiver};
use eramap::tiles::loader::{TileLoader, TileResult};
use eramap::{TileCoord, TileLayer};
use fxhash::FxHashSet;
use lru::LruCache;
use std::num::NonZeroUsize;

const TEXTURE_CAPACITY: usize = 512;

pub struct TileTextures {
    loader: TileLoader,
    rx: Receiver<TileResult>,
    textures: LruCache<TileCoord, egui::TextureHandle>,
    in_flight: FxHashSet<TileCoord>,
    failed: FxHashSet<TileCoord>,
}

impl TileTextures {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        let (tx, rx) = unbounded();
        let capacity = NonZeroUsize::new(TEXTURE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            loader: TileLoader::new(tx, runtime),
            rx,
            textures: LruCache::new(capacity),
            in_flight: FxHashSet::default(),
            failed: FxHashSet::default(),
        }
    }

    /// Texture for `coord`, requesting the download on first use
    pub fn get(&mut self, layer: &TileLayer, coord: TileCoord) -> Option<egui::TextureId> {
        if let Some(texture) = self.textures.get(&coord) {
            return Some(texture.id());
        }
        if !self.in_flight.contains(&coord) && !self.failed.contains(&coord) {
            self.in_flight.insert(coord);
            self.loader.start_download(layer, coord);
        }
        None
    }

    /// Turns finished downloads into textures. Returns `true` if anything new
    /// arrived.
    pub fn poll(&mut self, ctx: &egui::Context) -> bool {
        let mut arrived = false;
        for result in self.rx.try_iter() {
            self.in_flight.remove(&result.coord);
            arrived = true;

            let image = match result.data {
                Ok(bytes) => decode(&bytes),
                Err(e) => {
                    log::debug!("tile {:?} unavailable: {}", result.coord, e);
                    None
                }
            };
            match image {
                Some(image) => {
                    let c = result.coord;
                    let name = format!("tile_{}_{}_{}", c.z, c.x, c.y);
                    let texture = ctx.load_texture(name, image, egui::TextureOptions::LINEAR);
                    self.textures.put(result.coord, texture);
                }
                None => {
                    self.failed.insert(result.coord);
                }
            }
        }
        arrived
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

fn decode(bytes: &[u8]) -> Option<egui::ColorImage> {
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            log::warn!("cannot decode tile: {}", e);
            return None;
        }
    };
    let (width, height) = img.dimensions();
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        &img.into_raw(),
    ))
}
