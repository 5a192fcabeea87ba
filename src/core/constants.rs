//! Editor-wide defaults. The start view, the polygon style and the probe
//! window all live here so the file gateway, the surface and the serializer
//! agree on the same numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom level requested from any tile provider.
pub const DEFAULT_MAX_ZOOM: u8 = 20;

/// How long a tile candidate gets to serve its first tile, in milliseconds.
pub const TILE_PROBE_WINDOW_MS: u64 = 800;

/// Fallback start view: Naumburg (Saale), old town.
pub const DEFAULT_START_LAT: f64 = 51.1530;
pub const DEFAULT_START_LON: f64 = 11.8088;
pub const DEFAULT_START_ZOOM: u8 = 14;

/// Eras offered by a freshly created configuration, oldest first.
pub const DEFAULT_ERAS: [&str; 6] = [
    "Frühmittelalter",
    "Hochmittelalter",
    "Spätmittelalter",
    "Frühe Neuzeit",
    "Moderne",
    "Postmoderne",
];

/// Title stored for a POI whose form was submitted with a blank title.
pub const DEFAULT_POI_TITLE: &str = "POI";

/// Title given to polygons drawn in the editor.
pub const DEFAULT_POLYGON_TITLE: &str = "Fläche";

pub const DEFAULT_STROKE: &str = "#0a7cff";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_STROKE_OPACITY: f64 = 0.9;
pub const DEFAULT_FILL: &str = "#0a7cff";
pub const DEFAULT_FILL_OPACITY: f64 = 0.15;

/// Prefix of the string an image import returns when the copy failed.
pub const IMPORT_ERROR_TAG: &str = "ERROR:";

/// User agent sent to public tile servers, which reject anonymous clients.
pub const HTTP_USER_AGENT: &str = "eramap/0.1 (+https://github.com/eramap/eramap)";
