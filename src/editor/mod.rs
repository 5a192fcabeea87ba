//! Interactive editing: the map surface and the controllers that mutate it.

pub mod draw;
pub mod form;
pub mod serializer;
pub mod session;
pub mod surface;
