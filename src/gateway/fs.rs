//! File-backed gateway over the project's data directory.

use crate::core::config::{Config, DataLayout, StartView};
use crate::data::geojson::FeatureCollection;
use crate::gateway::{FilePicker, ImageImport, InitialBundle, PersistenceGateway, SaveOutcome};
use crate::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Which collection a save writes, for paths and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollectionKind {
    Pois,
    Polygons,
}

impl CollectionKind {
    fn saved(self) -> &'static str {
        match self {
            CollectionKind::Pois => "POIs saved.",
            CollectionKind::Polygons => "Polygons saved.",
        }
    }

    fn failed(self, err: impl std::fmt::Display) -> String {
        match self {
            CollectionKind::Pois => format!("Error saving POIs: {err}"),
            CollectionKind::Polygons => format!("Error saving polygons: {err}"),
        }
    }
}

pub struct FileGateway {
    layout: DataLayout,
    picker: Box<dyn FilePicker>,
}

impl FileGateway {
    /// Opens the data directory, creating it and any missing data file with
    /// defaults.
    pub async fn open(layout: DataLayout, picker: impl FilePicker + 'static) -> Result<Self> {
        tokio::fs::create_dir_all(&layout.data_dir).await?;
        tokio::fs::create_dir_all(&layout.images_dir).await?;

        ensure_file(&layout.config_path, &Config::default()).await?;
        ensure_file(&layout.pois_path, &FeatureCollection::empty()).await?;
        ensure_file(&layout.polygons_path, &FeatureCollection::empty()).await?;

        Ok(Self {
            layout,
            picker: Box::new(picker),
        })
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    fn collection_path(&self, kind: CollectionKind) -> &Path {
        match kind {
            CollectionKind::Pois => &self.layout.pois_path,
            CollectionKind::Polygons => &self.layout.polygons_path,
        }
    }

    /// Saves a raw POI payload. Anything that is not a FeatureCollection is
    /// reported and leaves the stored file untouched.
    pub async fn save_pois_json(&self, raw: &str) -> SaveOutcome {
        self.save_raw(CollectionKind::Pois, raw).await
    }

    pub async fn save_polygons_json(&self, raw: &str) -> SaveOutcome {
        self.save_raw(CollectionKind::Polygons, raw).await
    }

    async fn save_raw(&self, kind: CollectionKind, raw: &str) -> SaveOutcome {
        match FeatureCollection::from_json(raw) {
            Ok(collection) => self.save_collection(kind, &collection).await,
            Err(e) => {
                log::warn!("rejected {:?} payload: {}", kind, e);
                SaveOutcome::Failed(kind.failed(e))
            }
        }
    }

    async fn save_collection(&self, kind: CollectionKind, collection: &FeatureCollection) -> SaveOutcome {
        let path = self.collection_path(kind);
        match write_json(path, collection).await {
            Ok(()) => {
                log::info!("wrote {} features to {}", collection.len(), path.display());
                SaveOutcome::Saved(kind.saved().to_string())
            }
            Err(e) => {
                log::error!("failed to write {}: {}", path.display(), e);
                SaveOutcome::Failed(kind.failed(e))
            }
        }
    }

    async fn copy_into_images(&self, source: &Path) -> Result<String> {
        tokio::fs::create_dir_all(&self.layout.images_dir).await?;
        let target = next_free_path(&self.layout.images_dir, source).await?;
        tokio::fs::copy(source, &target).await?;

        let name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::info!("imported {} as {}", source.display(), name);
        Ok(format!("{}/{}", self.layout.image_url_prefix(), name))
    }
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn fetch_initial_bundle(&self) -> InitialBundle {
        InitialBundle {
            config: read_or_default(&self.layout.config_path).await,
            pois: read_or_default(&self.layout.pois_path).await,
            polygons: read_or_default(&self.layout.polygons_path).await,
        }
    }

    async fn save_pois(&self, pois: &FeatureCollection) -> SaveOutcome {
        self.save_collection(CollectionKind::Pois, pois).await
    }

    async fn save_polygons(&self, polygons: &FeatureCollection) -> SaveOutcome {
        self.save_collection(CollectionKind::Polygons, polygons).await
    }

    async fn save_start_view(&self, start: StartView) -> SaveOutcome {
        let mut config: Config = read_or_default(&self.layout.config_path).await;
        config.start = start;

        match write_json(&self.layout.config_path, &config).await {
            Ok(()) => SaveOutcome::Saved("Start view saved.".to_string()),
            Err(e) => {
                log::error!("failed to write config: {}", e);
                SaveOutcome::Failed(format!("Error saving start view: {e}"))
            }
        }
    }

    async fn import_image(&self) -> ImageImport {
        let Some(source) = self.picker.pick_image() else {
            return ImageImport::Cancelled;
        };

        match self.copy_into_images(&source).await {
            Ok(path) => ImageImport::Imported(path),
            Err(e) => {
                log::error!("image import from {} failed: {}", source.display(), e);
                ImageImport::Failed(e.to_string())
            }
        }
    }
}

/// Reads a JSON document, substituting the default when it is missing or
/// unreadable. A document that exists but does not parse is copied aside
/// first, so the next save cannot destroy its contents.
async fn read_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("cannot read {}, using defaults: {}", path.display(), e);
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            match preserve_unreadable(path).await {
                Ok(backup) => log::warn!(
                    "cannot parse {}, using defaults (kept as {}): {}",
                    path.display(),
                    backup.display(),
                    e
                ),
                Err(copy_err) => log::error!(
                    "cannot parse {} and cannot keep a copy ({}), using defaults: {}",
                    path.display(),
                    copy_err,
                    e
                ),
            }
            T::default()
        }
    }
}

/// Copies `path` to `<stem>.unreadable.<ext>` beside it, never overwriting an
/// earlier copy.
async fn preserve_unreadable(path: &Path) -> Result<PathBuf> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.unreadable.{}", ext.to_string_lossy()),
        None => format!("{stem}.unreadable"),
    };
    let backup = next_free_path(dir, Path::new(&name)).await?;
    tokio::fs::copy(path, &backup).await?;
    Ok(backup)
}

/// Writes pretty JSON next to `path` first and renames it into place.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    let written = match tokio::fs::write(&tmp, body).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

async fn ensure_file<T: Serialize>(path: &Path, default: &T) -> Result<()> {
    if !tokio::fs::try_exists(path).await? {
        log::info!("creating {}", path.display());
        write_json(path, default).await?;
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// First path in `dir` for the file name of `source` that does not exist yet:
/// `foto.jpg`, then `foto_1.jpg`, `foto_2.jpg`, ...
pub async fn next_free_path(dir: &Path, source: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a file: {}", source.display()),
        )
    })?;

    let mut target = dir.join(file_name);
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut i = 1;
    while tokio::fs::try_exists(&target).await? {
        target = dir.join(format!("{stem}_{i}{suffix}"));
        i += 1;
    }
    Ok(target)
}
