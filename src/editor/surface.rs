use crate::core::geo::LatLng;
use crate::core::viewport::Viewport;
use crate::data::geojson::FeatureCollection;
use crate::data::polygon::PolygonStyle;
use crate::gateway::InitialBundle;
use crate::layers::base::{EntryId, LayerKind};
use crate::layers::draft::DraftLayer;
use crate::layers::feature::FeatureLayer;
use crate::layers::tile::TileLayer;
use crate::tiles::resolver::TileStatus;

/// A POI marker as the map draws it
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub id: EntryId,
    pub position: LatLng,
    pub title: String,
    /// `true` for committed draft markers, `false` for persisted POIs
    pub draft: bool,
}

/// The map viewport, its single tile layer and the three geometry layers
#[derive(Debug, Clone)]
pub struct MapSurface {
    viewport: Viewport,
    tile_layer: Option<TileLayer>,
    tile_status: TileStatus,
    pois: FeatureLayer,
    polygons: FeatureLayer,
    draft: DraftLayer,
}

impl MapSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            tile_layer: None,
            tile_status: TileStatus::Pending,
            pois: FeatureLayer::new(LayerKind::Poi),
            polygons: FeatureLayer::new(LayerKind::Polygon),
            draft: DraftLayer::new(),
        }
    }

    /// Sets the viewport from the config and renders both persisted layers
    pub fn from_bundle(bundle: &InitialBundle, max_zoom: u8) -> Self {
        let mut viewport = Viewport::from_start(&bundle.config.start);
        viewport.set_max_zoom(max_zoom);

        let mut surface = Self::new(viewport);
        surface.render_pois(&bundle.pois);
        surface.render_polygons(&bundle.polygons);
        surface
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Replaces the displayed POIs with `collection`
    pub fn render_pois(&mut self, collection: &FeatureCollection) {
        self.pois.render(collection);
    }

    /// Replaces the displayed polygons with `collection`
    pub fn render_polygons(&mut self, collection: &FeatureCollection) {
        self.polygons.render(collection);
    }

    pub fn attach_tile_layer(&mut self, layer: TileLayer) {
        log::debug!("attached tile layer {}", layer.name);
        self.tile_layer = Some(layer);
    }

    pub fn detach_tile_layer(&mut self) -> Option<TileLayer> {
        self.tile_layer.take()
    }

    pub fn tile_layer(&self) -> Option<&TileLayer> {
        self.tile_layer.as_ref()
    }

    pub fn tile_status(&self) -> &TileStatus {
        &self.tile_status
    }

    pub fn set_tile_status(&mut self, status: TileStatus) {
        self.tile_status = status;
    }

    pub fn pois(&self) -> &FeatureLayer {
        &self.pois
    }

    pub fn pois_mut(&mut self) -> &mut FeatureLayer {
        &mut self.pois
    }

    pub fn polygons(&self) -> &FeatureLayer {
        &self.polygons
    }

    pub fn draft(&self) -> &DraftLayer {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DraftLayer {
        &mut self.draft
    }

    /// Persisted POIs followed by committed draft markers
    pub fn markers(&self) -> Vec<MarkerView> {
        let persisted = self.pois.iter().filter_map(|(id, feature)| {
            Some(MarkerView {
                id,
                position: feature.position()?,
                title: feature
                    .property_str("title")
                    .filter(|title| !title.is_empty())
                    .unwrap_or(crate::constants::DEFAULT_POI_TITLE)
                    .to_string(),
                draft: false,
            })
        });
        let drafted = self
            .draft
            .committed_markers()
            .map(|(id, position, props)| MarkerView {
                id,
                position,
                title: props.title.clone(),
                draft: true,
            });
        persisted.chain(drafted).collect()
    }

    /// Persisted polygons with the style each one is drawn with
    pub fn styled_polygons(&self) -> Vec<(EntryId, Vec<LatLng>, PolygonStyle)> {
        self.polygons
            .iter()
            .filter_map(|(id, feature)| {
                let ring = feature.geometry.as_ref()?.exterior_ring()?;
                let style = PolygonStyle::from_properties(feature.properties.as_ref());
                Some((id, ring, style))
            })
            .collect()
    }
}

impl Default for MapSurface {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
