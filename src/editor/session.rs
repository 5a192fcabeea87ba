//! The editor session: one owner for the surface, the draw gesture, the open
//! form and the save bookkeeping. Every user command goes through it.

use crate::core::config::{Config, TileProbeOptions};
use crate::core::geo::{LatLng, Point};
use crate::editor::draw::{DrawMode, DrawOutcome, DrawSession};
use crate::editor::form::{FormTarget, PoiForm};
use crate::editor::serializer::{SaveState, Serializer};
use crate::editor::surface::MapSurface;
use crate::gateway::{ImageImport, PersistenceGateway, SaveOutcome};
use crate::layers::base::EntryId;
use crate::layers::draft::{DraftEntry, DraftGeometry};
use crate::tiles::probe::TileProber;
use crate::tiles::resolver::{TileResolver, TileStatus};
use crate::{EditorError, Result};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Save lifecycle per target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveStates {
    pub pois: SaveState,
    pub polygons: SaveState,
    pub start_view: SaveState,
}

pub struct EditorSession<G> {
    gateway: G,
    config: Config,
    surface: MapSurface,
    draw: DrawSession,
    form: Option<PoiForm>,
    saves: SaveStates,
    /// A persisted POI was edited in place since the last committed POI save
    pois_edited: bool,
    notices: VecDeque<Notice>,
}

impl<G: PersistenceGateway> EditorSession<G> {
    /// Fetches the initial bundle and renders it
    pub async fn load(gateway: G, options: &TileProbeOptions) -> Self {
        let bundle = gateway.fetch_initial_bundle().await;
        log::info!(
            "loaded {} POIs and {} polygons",
            bundle.pois.len(),
            bundle.polygons.len()
        );
        let surface = MapSurface::from_bundle(&bundle, options.max_zoom);

        Self {
            gateway,
            config: bundle.config,
            surface,
            draw: DrawSession::new(),
            form: None,
            saves: SaveStates::default(),
            pois_edited: false,
            notices: VecDeque::new(),
        }
    }

    /// Picks the tile provider; an empty result raises the persistent banner
    pub async fn resolve_tiles<P>(&mut self, resolver: &TileResolver, prober: &P) -> TileStatus
    where
        P: TileProber + ?Sized,
    {
        let status = resolver.resolve(&mut self.surface, prober).await;
        if status.is_unavailable() {
            self.notify(Notice::error(status.label()));
        }
        status
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn surface(&self) -> &MapSurface {
        &self.surface
    }

    pub fn tile_status(&self) -> &TileStatus {
        self.surface.tile_status()
    }

    pub fn draw_mode(&self) -> &DrawMode {
        self.draw.mode()
    }

    pub fn form(&self) -> Option<&PoiForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut PoiForm> {
        self.form.as_mut()
    }

    pub fn save_states(&self) -> &SaveStates {
        &self.saves
    }

    // Viewport

    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.surface.viewport_mut().set_view(center, zoom);
    }

    pub fn pan_by(&mut self, offset: Point) {
        self.surface.viewport_mut().pan_by(offset);
    }

    pub fn zoom_in(&mut self) {
        self.surface.viewport_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.surface.viewport_mut().zoom_out();
    }

    // Draw gestures

    pub fn start_add_poi(&mut self) -> Result<()> {
        self.ensure_no_form()?;
        self.draw.start_marker()
    }

    pub fn start_draw_polygon(&mut self) -> Result<()> {
        self.ensure_no_form()?;
        self.draw.start_polygon()
    }

    pub fn start_draw_rectangle(&mut self) -> Result<()> {
        self.ensure_no_form()?;
        self.draw.start_rectangle()
    }

    /// Feeds a map click into the active gesture
    pub fn map_click(&mut self, at: LatLng) -> DrawOutcome {
        let outcome = self.draw.click(at);
        self.apply_outcome(&outcome);
        outcome
    }

    /// Completes a polygon gesture
    pub fn finish_gesture(&mut self) -> DrawOutcome {
        let outcome = self.draw.finish();
        self.apply_outcome(&outcome);
        outcome
    }

    pub fn cancel_gesture(&mut self) -> DrawOutcome {
        self.draw.cancel()
    }

    pub fn remove_last_vertex(&mut self) -> bool {
        self.draw.remove_last_vertex()
    }

    fn apply_outcome(&mut self, outcome: &DrawOutcome) {
        match outcome {
            DrawOutcome::MarkerPlaced(position) => {
                self.form = Some(PoiForm::new_marker(*position));
            }
            DrawOutcome::PolygonCompleted(ring) => {
                let id = self
                    .surface
                    .draft_mut()
                    .push(DraftGeometry::Polygon { ring: ring.clone() });
                log::debug!("polygon {} with {} vertices drafted", id, ring.len());
            }
            DrawOutcome::RectangleCompleted(bounds) => {
                self.surface
                    .draft_mut()
                    .push(DraftGeometry::Rectangle { bounds: *bounds });
            }
            DrawOutcome::Ignored | DrawOutcome::Pending | DrawOutcome::Cancelled => {}
        }
    }

    /// Removes the most recently added draft entry. Persisted features are
    /// never touched.
    pub fn delete_selection(&mut self) -> Result<Option<DraftEntry>> {
        self.ensure_no_form()?;
        let removed = self.surface.draft_mut().pop_last();
        if let Some(entry) = &removed {
            log::debug!("deleted draft entry {}", entry.id);
        }
        Ok(removed)
    }

    // POI form

    /// Opens the form for a persisted POI or a committed draft marker
    pub fn open_poi(&mut self, id: EntryId) -> Result<()> {
        self.ensure_no_form()?;
        if !self.draw.is_idle() {
            return Err(EditorError::DrawInProgress);
        }
        let form = if self.surface.pois().get(id).is_some() {
            PoiForm::edit_persisted(&self.surface, id)?
        } else {
            PoiForm::edit_draft(&self.surface, id)?
        };
        self.form = Some(form);
        Ok(())
    }

    pub fn commit_form(&mut self) -> Result<EntryId> {
        let form = self.form.take().ok_or(EditorError::NoActiveEdit)?;
        let persisted = matches!(form.target(), FormTarget::Persisted { .. });

        match form.commit(&mut self.surface) {
            Ok(id) => {
                self.pois_edited |= persisted;
                Ok(id)
            }
            Err(e) => {
                self.notify(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Closes the form. A marker placed for it never reaches the draft layer.
    pub fn cancel_form(&mut self) -> Result<()> {
        let form = self.form.take().ok_or(EditorError::NoActiveEdit)?;
        log::debug!("POI form for {:?} cancelled", form.target());
        Ok(())
    }

    /// Asks the gateway for an image and puts its path into the open form
    pub async fn import_image(&mut self) -> Result<ImageImport> {
        if self.form.is_none() {
            return Err(EditorError::NoActiveEdit);
        }
        let import = self.gateway.import_image().await;

        let failure = self
            .form
            .as_mut()
            .and_then(|form| form.apply_image_import(&import));
        if let Some(msg) = failure {
            self.notify(Notice::error(import.to_wire()));
            log::warn!("image import failed: {}", msg);
        }
        Ok(import)
    }

    // Saving

    pub async fn save_pois(&mut self) -> Result<SaveState> {
        self.ensure_no_form()?;
        self.saves.pois = SaveState::Pending;

        let pending = Serializer::collect_pois(&self.surface);
        let outcome = self.gateway.save_pois(&pending.collection).await;
        Serializer::apply_pois(&mut self.surface, &pending);

        if outcome.is_ok() {
            self.pois_edited = false;
        }
        self.saves.pois = SaveState::from(&outcome);
        self.report(&outcome);
        Ok(self.saves.pois.clone())
    }

    pub async fn save_polygons(&mut self) -> Result<SaveState> {
        self.ensure_no_form()?;
        self.saves.polygons = SaveState::Pending;

        let pending = Serializer::collect_polygons(&self.surface);
        let outcome = self.gateway.save_polygons(&pending.collection).await;
        Serializer::apply_polygons(&mut self.surface, &pending);

        self.saves.polygons = SaveState::from(&outcome);
        self.report(&outcome);
        Ok(self.saves.polygons.clone())
    }

    /// Stores the current center and zoom as the start view
    pub async fn save_start_view(&mut self) -> SaveState {
        self.saves.start_view = SaveState::Pending;

        let start = self.surface.viewport().to_start();
        let outcome = self.gateway.save_start_view(start).await;
        if outcome.is_ok() {
            self.config.start = start;
        }

        self.saves.start_view = SaveState::from(&outcome);
        self.report(&outcome);
        self.saves.start_view.clone()
    }

    /// Anything on screen that is not known to be on disk
    pub fn has_unpersisted_changes(&self) -> bool {
        self.pois_edited
            || Serializer::has_draft_pois(&self.surface)
            || Serializer::has_draft_polygons(&self.surface)
            || self.saves.pois.is_failed()
            || self.saves.polygons.is_failed()
    }

    // Notices

    pub fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => log::info!("{}", notice.text),
            NoticeLevel::Error => log::error!("{}", notice.text),
        }
        self.notices.push_back(notice);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn report(&mut self, outcome: &SaveOutcome) {
        let notice = match outcome {
            SaveOutcome::Saved(msg) => Notice::info(msg.as_str()),
            SaveOutcome::Failed(msg) => Notice::error(msg.as_str()),
        };
        self.notify(notice);
    }

    fn ensure_no_form(&self) -> Result<()> {
        match self.form {
            Some(_) => Err(EditorError::EditInProgress),
            None => Ok(()),
        }
    }
}
