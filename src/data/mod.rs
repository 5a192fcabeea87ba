pub mod geojson;
pub mod poi;
pub mod polygon;
