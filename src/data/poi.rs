//! POI metadata and the text form it is edited through.
//!
//! `era` and `tags` are lists on disk but comma-separated text in the form.
//! They differ on empty input: a blank era field means "no era" and is stored
//! as `null`, a blank tags field is stored as `[]`.

use crate::core::constants::DEFAULT_POI_TITLE;
use crate::data::geojson::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Properties of a POI feature, in the order they are written
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoiProperties {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub era: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
}

impl PoiProperties {
    /// Writes the POI keys into `target`, leaving any other keys alone.
    pub fn apply_to(&self, target: &mut Properties) {
        if let Ok(Value::Object(map)) = serde_json::to_value(self) {
            for (key, value) in map {
                target.insert(key, value);
            }
        }
    }

    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        self.apply_to(&mut props);
        props
    }
}

/// Raw text of the POI form fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoiFormFields {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub era: String,
    pub tags: String,
    pub image: String,
    pub link: String,
}

impl PoiFormFields {
    /// Populates the fields from existing feature properties; blanks otherwise.
    ///
    /// Hand-written data files sometimes carry `era` as a single string, which
    /// is shown as-is.
    pub fn from_properties(props: Option<&Properties>) -> Self {
        let Some(props) = props else {
            return Self::default();
        };
        let text = |key: &str| {
            props
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let era = match props.get("era") {
            Some(Value::Array(items)) => join_list(items),
            Some(Value::String(era)) => era.clone(),
            _ => String::new(),
        };
        let tags = match props.get("tags") {
            Some(Value::Array(items)) => join_list(items),
            _ => String::new(),
        };

        Self {
            title: text("title"),
            subtitle: text("subtitle"),
            description: text("description"),
            era,
            tags,
            image: text("image"),
            link: text("link"),
        }
    }

    /// Parses the fields into the properties stored on commit
    pub fn to_properties(&self) -> PoiProperties {
        let title = self.title.trim();
        PoiProperties {
            title: if title.is_empty() {
                DEFAULT_POI_TITLE.to_string()
            } else {
                title.to_string()
            },
            subtitle: self.subtitle.trim().to_string(),
            description: self.description.trim().to_string(),
            era: parse_era(&self.era),
            tags: parse_tags(&self.tags),
            image: self.image.trim().to_string(),
            link: self.link.trim().to_string(),
        }
    }
}

/// `None` for a blank field, else the trimmed non-empty entries.
pub fn parse_era(text: &str) -> Option<Vec<String>> {
    if text.trim().is_empty() {
        None
    } else {
        Some(split_list(text))
    }
}

/// Trimmed non-empty entries; a blank field gives an empty list.
pub fn parse_tags(text: &str) -> Vec<String> {
    split_list(text)
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_list(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
