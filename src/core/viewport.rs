use crate::core::config::StartView;
use crate::core::constants::{DEFAULT_MAX_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, Point, TileCoord};
use serde::{Deserialize, Serialize};

/// The current view of the map: center and integer zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: u8,
    /// The maximum allowed zoom level
    pub max_zoom: u8,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(DEFAULT_MAX_ZOOM),
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }

    pub fn from_start(start: &StartView) -> Self {
        Self::new(start.center(), start.zoom)
    }

    /// The view as it is written back to the configuration
    pub fn to_start(&self) -> StartView {
        StartView::new(self.center.lat, self.center.lng, self.zoom)
    }

    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = Self::clamp_center(center);
        self.zoom = zoom.min(self.max_zoom);
    }

    /// Sets the zoom limit, pulling the current zoom down if needed
    pub fn set_max_zoom(&mut self, max_zoom: u8) {
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.min(max_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.saturating_add(1).min(self.max_zoom);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1);
    }

    /// Tile under the center at the current zoom, capped at `max_zoom`
    pub fn center_tile(&self, max_zoom: u8) -> TileCoord {
        TileCoord::from_lat_lng(&self.center, self.zoom.min(max_zoom))
    }

    /// Moves the center by a screen-pixel offset
    pub fn pan_by(&mut self, offset: Point) {
        let zoom = self.zoom as f64;
        let center_px = self.center.to_world_pixel(zoom);
        let moved = center_px.add(&offset);
        self.center = Self::clamp_center(LatLng::from_world_pixel(moved, zoom));
    }

    /// Converts a coordinate to container pixels for a container of `size`
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng, size: Point) -> Point {
        let zoom = self.zoom as f64;
        let offset = lat_lng
            .to_world_pixel(zoom)
            .subtract(&self.center.to_world_pixel(zoom));
        Point::new(size.x / 2.0 + offset.x, size.y / 2.0 + offset.y)
    }

    /// Converts container pixels back to a coordinate
    pub fn pixel_to_lat_lng(&self, pixel: Point, size: Point) -> LatLng {
        let zoom = self.zoom as f64;
        let center_px = self.center.to_world_pixel(zoom);
        let world = Point::new(
            center_px.x + pixel.x - size.x / 2.0,
            center_px.y + pixel.y - size.y / 2.0,
        );
        LatLng::from_world_pixel(world, zoom)
    }

    /// Tiles covering a container of `size`, row by row
    pub fn visible_tiles(&self, size: Point) -> Vec<TileCoord> {
        let zoom = self.zoom as f64;
        let tile = TILE_SIZE as f64;
        let center_px = self.center.to_world_pixel(zoom);
        let max_index = (1_u64 << self.zoom) as f64 - 1.0;

        let min_x = ((center_px.x - size.x / 2.0) / tile).floor().clamp(0.0, max_index) as u32;
        let max_x = ((center_px.x + size.x / 2.0) / tile).floor().clamp(0.0, max_index) as u32;
        let min_y = ((center_px.y - size.y / 2.0) / tile).floor().clamp(0.0, max_index) as u32;
        let max_y = ((center_px.y + size.y / 2.0) / tile).floor().clamp(0.0, max_index) as u32;

        let mut tiles = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                tiles.push(TileCoord::new(x, y, self.zoom));
            }
        }
        tiles
    }

    /// Container pixel position of a tile's top-left corner
    pub fn tile_origin(&self, coord: &TileCoord, size: Point) -> Point {
        let center_px = self.center.to_world_pixel(coord.z as f64);
        let tile = TILE_SIZE as f64;
        Point::new(
            coord.x as f64 * tile - center_px.x + size.x / 2.0,
            coord.y as f64 * tile - center_px.y + size.y / 2.0,
        )
    }

    fn clamp_center(center: LatLng) -> LatLng {
        LatLng::new(
            LatLng::clamp_lat(center.lat),
            center.lng.clamp(-180.0, 180.0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_start(&StartView::default())
    }
}
