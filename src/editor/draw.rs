//! Draw gestures: placing a marker, a polygon or a rectangle.
//!
//! The session only tracks the gesture. Turning a finished gesture into a
//! draft entry (or a POI form) is up to the caller.

use crate::core::geo::{LatLng, LatLngBounds};
use crate::{EditorError, Result};

/// Minimum number of vertices of a completed polygon
pub const MIN_POLYGON_VERTICES: usize = 3;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawMode {
    #[default]
    Idle,
    PlacingMarker,
    PlacingPolygon {
        vertices: Vec<LatLng>,
    },
    PlacingRectangle {
        corner: Option<LatLng>,
    },
}

impl DrawMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, DrawMode::Idle)
    }

    /// Short hint shown while a gesture is active
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DrawMode::Idle => None,
            DrawMode::PlacingMarker => Some("Click the map to place the POI"),
            DrawMode::PlacingPolygon { vertices } if vertices.len() < MIN_POLYGON_VERTICES => {
                Some("Click to add vertices")
            }
            DrawMode::PlacingPolygon { .. } => Some("Click to add vertices, Enter to finish"),
            DrawMode::PlacingRectangle { corner: None } => Some("Click the first corner"),
            DrawMode::PlacingRectangle { corner: Some(_) } => Some("Click the opposite corner"),
        }
    }
}

/// What a gesture step produced
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// No gesture is active
    Ignored,
    /// The gesture continues
    Pending,
    MarkerPlaced(LatLng),
    PolygonCompleted(Vec<LatLng>),
    RectangleCompleted(LatLngBounds),
    /// The gesture ended without producing a geometry
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct DrawSession {
    mode: DrawMode,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &DrawMode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode.is_idle()
    }

    pub fn start_marker(&mut self) -> Result<()> {
        self.start(DrawMode::PlacingMarker)
    }

    pub fn start_polygon(&mut self) -> Result<()> {
        self.start(DrawMode::PlacingPolygon {
            vertices: Vec::new(),
        })
    }

    pub fn start_rectangle(&mut self) -> Result<()> {
        self.start(DrawMode::PlacingRectangle { corner: None })
    }

    fn start(&mut self, mode: DrawMode) -> Result<()> {
        if !self.mode.is_idle() {
            return Err(EditorError::DrawInProgress);
        }
        log::debug!("draw gesture started: {:?}", mode);
        self.mode = mode;
        Ok(())
    }

    /// Feeds one map click into the active gesture
    pub fn click(&mut self, at: LatLng) -> DrawOutcome {
        match &mut self.mode {
            DrawMode::Idle => DrawOutcome::Ignored,
            DrawMode::PlacingMarker => {
                self.mode = DrawMode::Idle;
                DrawOutcome::MarkerPlaced(at)
            }
            DrawMode::PlacingPolygon { vertices } => {
                vertices.push(at);
                DrawOutcome::Pending
            }
            DrawMode::PlacingRectangle { corner: None } => {
                self.mode = DrawMode::PlacingRectangle { corner: Some(at) };
                DrawOutcome::Pending
            }
            DrawMode::PlacingRectangle { corner: Some(first) } => {
                let bounds = LatLngBounds::from_corners(*first, at);
                self.mode = DrawMode::Idle;
                DrawOutcome::RectangleCompleted(bounds)
            }
        }
    }

    /// Ends a polygon gesture. Fewer than three vertices cancel it.
    pub fn finish(&mut self) -> DrawOutcome {
        match std::mem::take(&mut self.mode) {
            DrawMode::Idle => DrawOutcome::Ignored,
            DrawMode::PlacingPolygon { vertices } if vertices.len() >= MIN_POLYGON_VERTICES => {
                DrawOutcome::PolygonCompleted(vertices)
            }
            _ => DrawOutcome::Cancelled,
        }
    }

    pub fn cancel(&mut self) -> DrawOutcome {
        match std::mem::take(&mut self.mode) {
            DrawMode::Idle => DrawOutcome::Ignored,
            _ => DrawOutcome::Cancelled,
        }
    }

    /// Drops the last polygon vertex; `false` if there was none
    pub fn remove_last_vertex(&mut self) -> bool {
        match &mut self.mode {
            DrawMode::PlacingPolygon { vertices } => vertices.pop().is_some(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_gesture() {
        let mut draw = DrawSession::new();
        assert_eq!(draw.click(LatLng::new(51.0, 11.0)), DrawOutcome::Ignored);

        draw.start_marker().unwrap();
        assert!(matches!(draw.start_polygon(), Err(EditorError::DrawInProgress)));

        let outcome = draw.click(LatLng::new(51.0, 11.0));
        assert_eq!(outcome, DrawOutcome::MarkerPlaced(LatLng::new(51.0, 11.0)));
        assert!(draw.is_idle());
    }

    #[test]
    fn test_polygon_gesture() {
        let mut draw = DrawSession::new();
        draw.start_polygon().unwrap();
        for (lat, lng) in [(51.0, 11.0), (51.0, 11.1), (51.1, 11.1)] {
            assert_eq!(draw.click(LatLng::new(lat, lng)), DrawOutcome::Pending);
        }

        match draw.finish() {
            DrawOutcome::PolygonCompleted(ring) => assert_eq!(ring.len(), 3),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(draw.is_idle());
    }

    #[test]
    fn test_short_polygon_is_cancelled() {
        let mut draw = DrawSession::new();
        draw.start_polygon().unwrap();
        draw.click(LatLng::new(51.0, 11.0));
        draw.click(LatLng::new(51.0, 11.1));
        draw.click(LatLng::new(51.1, 11.1));
        assert!(draw.remove_last_vertex());

        assert_eq!(draw.finish(), DrawOutcome::Cancelled);
        assert!(draw.is_idle());
    }

    #[test]
    fn test_rectangle_gesture() {
        let mut draw = DrawSession::new();
        draw.start_rectangle().unwrap();
        assert_eq!(draw.click(LatLng::new(51.1, 11.1)), DrawOutcome::Pending);

        match draw.click(LatLng::new(51.0, 11.0)) {
            DrawOutcome::RectangleCompleted(bounds) => {
                assert_eq!(bounds.south_west, LatLng::new(51.0, 11.0));
                assert_eq!(bounds.north_east, LatLng::new(51.1, 11.1));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_cancel() {
        let mut draw = DrawSession::new();
        assert_eq!(draw.cancel(), DrawOutcome::Ignored);
        draw.start_marker().unwrap();
        assert_eq!(draw.cancel(), DrawOutcome::Cancelled);
        assert!(draw.start_polygon().is_ok());
    }
}
