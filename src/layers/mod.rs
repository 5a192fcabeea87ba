pub mod base;
pub mod draft;
pub mod feature;
pub mod tile;
