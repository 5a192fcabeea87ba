use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::poi::PoiProperties;
use crate::layers::base::EntryId;

/// A geometry created during the current session and not yet saved.
///
/// Rectangles are kept apart from polygons: they are drawable and deletable
/// but are never written to the polygon collection.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftGeometry {
    Marker {
        position: LatLng,
        /// Set once the POI form was committed for this marker
        properties: Option<PoiProperties>,
    },
    Polygon {
        ring: Vec<LatLng>,
    },
    Rectangle {
        bounds: LatLngBounds,
    },
}

impl DraftGeometry {
    /// Marker that went through a form commit
    pub fn is_committed_marker(&self) -> bool {
        matches!(
            self,
            DraftGeometry::Marker {
                properties: Some(_),
                ..
            }
        )
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, DraftGeometry::Polygon { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftEntry {
    pub id: EntryId,
    pub geometry: DraftGeometry,
}

/// Session-only geometries, in insertion order
#[derive(Debug, Clone, Default)]
pub struct DraftLayer {
    entries: Vec<DraftEntry>,
}

impl DraftLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, geometry: DraftGeometry) -> EntryId {
        let id = EntryId::next();
        self.entries.push(DraftEntry { id, geometry });
        id
    }

    /// Removes the most recently added entry
    pub fn pop_last(&mut self) -> Option<DraftEntry> {
        self.entries.pop()
    }

    /// Removes every entry whose id is in `ids`
    pub fn remove_all(&mut self, ids: &[EntryId]) {
        self.entries.retain(|entry| !ids.contains(&entry.id));
    }

    pub fn get(&self, id: EntryId) -> Option<&DraftEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut DraftEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DraftEntry> {
        self.entries.iter()
    }

    /// Markers carrying committed POI properties
    pub fn committed_markers(&self) -> impl Iterator<Item = (EntryId, LatLng, &PoiProperties)> {
        self.entries.iter().filter_map(|entry| match &entry.geometry {
            DraftGeometry::Marker {
                position,
                properties: Some(props),
            } => Some((entry.id, *position, props)),
            _ => None,
        })
    }

    /// Drawn polygons; rectangles are not included
    pub fn polygons(&self) -> impl Iterator<Item = (EntryId, &[LatLng])> {
        self.entries.iter().filter_map(|entry| match &entry.geometry {
            DraftGeometry::Polygon { ring } => Some((entry.id, ring.as_slice())),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
