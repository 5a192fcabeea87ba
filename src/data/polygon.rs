use crate::core::constants::{
    DEFAULT_FILL, DEFAULT_FILL_OPACITY, DEFAULT_POLYGON_TITLE, DEFAULT_STROKE,
    DEFAULT_STROKE_OPACITY, DEFAULT_STROKE_WIDTH,
};
use crate::data::geojson::Properties;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Style properties carried by a polygon feature (simplestyle keys)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    pub title: String,
    pub stroke: String,
    #[serde(rename = "stroke-width", serialize_with = "compact_number")]
    pub stroke_width: f64,
    #[serde(rename = "stroke-opacity", serialize_with = "compact_number")]
    pub stroke_opacity: f64,
    pub fill: String,
    #[serde(rename = "fill-opacity", serialize_with = "compact_number")]
    pub fill_opacity: f64,
}

impl PolygonStyle {
    /// Resolves the style of a persisted polygon. Missing or unusable values
    /// fall back to the defaults one key at a time; numbers given as strings
    /// are accepted.
    pub fn from_properties(props: Option<&Properties>) -> Self {
        let defaults = Self::default();
        let Some(props) = props else {
            return defaults;
        };

        let text = |key: &str, fallback: String| match props.get(key) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => fallback,
        };
        let number = |key: &str| -> Option<f64> {
            let parsed = match props.get(key)? {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            parsed.filter(|n| n.is_finite())
        };

        Self {
            title: text("title", defaults.title),
            stroke: text("stroke", defaults.stroke),
            stroke_width: number("stroke-width")
                .map(|w| w.max(0.0))
                .unwrap_or(defaults.stroke_width),
            stroke_opacity: number("stroke-opacity")
                .map(|o| o.clamp(0.0, 1.0))
                .unwrap_or(defaults.stroke_opacity),
            fill: text("fill", defaults.fill),
            fill_opacity: number("fill-opacity")
                .map(|o| o.clamp(0.0, 1.0))
                .unwrap_or(defaults.fill_opacity),
        }
    }

    pub fn to_properties(&self) -> Properties {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Properties::new(),
        }
    }

    /// Parses a `#rrggbb` (or `#rgb`) color into RGB components
    pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
        let hex = color.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                    let value = digit.to_digit(16)? as u8;
                    *slot = value * 16 + value;
                }
                Some(rgb)
            }
            _ => None,
        }
    }
}

/// Whole numbers are written without a fractional part (`2`, not `2.0`).
fn compact_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            title: DEFAULT_POLYGON_TITLE.to_string(),
            stroke: DEFAULT_STROKE.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_opacity: DEFAULT_STROKE_OPACITY,
            fill: DEFAULT_FILL.to_string(),
            fill_opacity: DEFAULT_FILL_OPACITY,
        }
    }
}
