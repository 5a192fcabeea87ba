mod app;
mod picker;
mod tiles;

use anyhow::Context as _;
use eramap::prelude::*;
use eramap::tiles::source::default_candidates;
use std::path::PathBuf;

/// Environment variable naming the project root; the current directory otherwise
const ROOT_ENV: &str = "ERAMAP_ROOT";

fn project_root() -> anyhow::Result<PathBuf> {
    match std::env::var_os(ROOT_ENV) {
        Some(root) => Ok(PathBuf::from(root)),
        None => std::env::current_dir().context("cannot determine the current directory"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let root = project_root()?;
    log::info!("project root: {}", root.display());

    let runtime = tokio::runtime::Runtime::new().context("cannot start the async runtime")?;
    let layout = DataLayout::from_root(&root);
    let options = TileProbeOptions::default();

    let session = runtime.block_on(async {
        let picker = picker::DialogPicker::new(root.clone());
        let gateway = FileGateway::open(layout.clone(), picker)
            .await
            .with_context(|| format!("cannot open data directory {}", layout.data_dir.display()))?;
        let mut session = EditorSession::load(gateway, &options).await;

        let resolver = TileResolver::new(default_candidates(layout.local_tiles_dir()), options.clone());
        let prober = HttpTileProber::new(&options)?;
        session.resolve_tiles(&resolver, &prober).await;
        anyhow::Ok(session)
    })?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("eramap - map editor"),
        ..Default::default()
    };

    eframe::run_native(
        "eramap-app",
        native_options,
        Box::new(move |cc| Box::new(app::EditorApp::new(cc, session, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    Ok(())
}
