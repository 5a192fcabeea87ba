use crate::data::geojson::{Feature, FeatureCollection};
pub use crate::layers::base::{EntryId, LayerKind};

/// A rendered copy of a persisted FeatureCollection.
///
/// Rendering clones the source collection, so the caller's collection is never
/// touched, and it replaces whatever the layer showed before.
#[derive(Debug, Clone)]
pub struct FeatureLayer {
    kind: LayerKind,
    entries: Vec<(EntryId, Feature)>,
}

impl FeatureLayer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Replaces the layer contents with `collection`
    pub fn render(&mut self, collection: &FeatureCollection) {
        self.entries = collection
            .features
            .iter()
            .cloned()
            .map(|feature| (EntryId::next(), feature))
            .collect();
        log::debug!(
            "rendered {} layer with {} features",
            self.kind,
            self.entries.len()
        );
    }

    pub fn get(&self, id: EntryId) -> Option<&Feature> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, feature)| feature)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Feature> {
        self.entries
            .iter_mut()
            .find(|(entry, _)| *entry == id)
            .map(|(_, feature)| feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Feature)> {
        self.entries.iter().map(|(id, feature)| (*id, feature))
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.entries.iter().map(|(_, feature)| feature)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
