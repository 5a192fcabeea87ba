//! The POI form: one edit at a time, bound to a new marker, a draft marker
//! or a persisted POI.

use crate::core::geo::LatLng;
use crate::data::poi::PoiFormFields;
use crate::editor::surface::MapSurface;
use crate::gateway::ImageImport;
use crate::layers::base::EntryId;
use crate::layers::draft::DraftGeometry;
use crate::{EditorError, Result};

/// What a form commit writes to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormTarget {
    /// A marker that was just placed. It only enters the draft layer on commit.
    NewMarker { position: LatLng },
    /// A committed marker in the draft layer
    Draft { id: EntryId },
    /// A feature of the persisted POI layer, edited in place
    Persisted { id: EntryId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoiForm {
    target: FormTarget,
    position: LatLng,
    pub fields: PoiFormFields,
}

impl PoiForm {
    /// Blank form for a freshly placed marker
    pub fn new_marker(position: LatLng) -> Self {
        Self {
            target: FormTarget::NewMarker { position },
            position,
            fields: PoiFormFields::default(),
        }
    }

    /// Form pre-filled from a committed draft marker
    pub fn edit_draft(surface: &MapSurface, id: EntryId) -> Result<Self> {
        let entry = surface.draft().get(id).ok_or(EditorError::UnknownEntry(id))?;
        let DraftGeometry::Marker {
            position,
            properties,
        } = &entry.geometry
        else {
            return Err(EditorError::UnknownEntry(id));
        };
        let props = properties.as_ref().map(|p| p.to_properties());

        Ok(Self {
            target: FormTarget::Draft { id },
            position: *position,
            fields: PoiFormFields::from_properties(props.as_ref()),
        })
    }

    /// Form pre-filled from a persisted POI
    pub fn edit_persisted(surface: &MapSurface, id: EntryId) -> Result<Self> {
        let feature = surface.pois().get(id).ok_or(EditorError::UnknownEntry(id))?;
        let position = feature.position().ok_or(EditorError::UnknownEntry(id))?;

        Ok(Self {
            target: FormTarget::Persisted { id },
            position,
            fields: PoiFormFields::from_properties(feature.properties.as_ref()),
        })
    }

    pub fn target(&self) -> FormTarget {
        self.target
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn is_new(&self) -> bool {
        matches!(self.target, FormTarget::NewMarker { .. })
    }

    /// Parses the fields and writes them to the target. Returns the id the
    /// POI now has.
    pub fn commit(self, surface: &mut MapSurface) -> Result<EntryId> {
        let props = self.fields.to_properties();

        match self.target {
            FormTarget::NewMarker { position } => {
                let id = surface.draft_mut().push(DraftGeometry::Marker {
                    position,
                    properties: Some(props),
                });
                log::debug!("new POI {} committed to the draft layer", id);
                Ok(id)
            }
            FormTarget::Draft { id } => match surface.draft_mut().get_mut(id) {
                Some(entry) => match &mut entry.geometry {
                    DraftGeometry::Marker { properties, .. } => {
                        *properties = Some(props);
                        Ok(id)
                    }
                    _ => Err(EditorError::UnknownEntry(id)),
                },
                // The marker went away while the form was open; put it back.
                None => Ok(surface.draft_mut().push(DraftGeometry::Marker {
                    position: self.position,
                    properties: Some(props),
                })),
            },
            FormTarget::Persisted { id } => {
                let feature = surface
                    .pois_mut()
                    .get_mut(id)
                    .ok_or(EditorError::UnknownEntry(id))?;
                props.apply_to(feature.properties.get_or_insert_with(Default::default));
                log::debug!("POI {} updated in place", id);
                Ok(id)
            }
        }
    }

    /// Takes the result of an image import. Returns the text to surface when
    /// the import failed; the field is left alone in that case.
    pub fn apply_image_import(&mut self, import: &ImageImport) -> Option<String> {
        match import {
            ImageImport::Imported(path) => {
                self.fields.image = path.clone();
                None
            }
            ImageImport::Cancelled => None,
            ImageImport::Failed(msg) => Some(msg.clone()),
        }
    }
}
