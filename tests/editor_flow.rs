mod common;

use common::{poi, triangle, MemoryGateway};
use eramap::prelude::*;
use serde_json::json;

/// End-to-end editing flows against an in-memory gateway
#[cfg(test)]
mod editor_flow {
    use super::*;

    async fn session_with(pois: Vec<Feature>) -> EditorSession<MemoryGateway> {
        let bundle = InitialBundle {
            pois: FeatureCollection::new(pois),
            ..Default::default()
        };
        EditorSession::load(MemoryGateway::with_bundle(bundle), &TileProbeOptions::for_testing()).await
    }

    async fn place_poi(session: &mut EditorSession<MemoryGateway>, at: LatLng) {
        session.start_add_poi().unwrap();
        let outcome = session.map_click(at);
        assert_eq!(outcome, DrawOutcome::MarkerPlaced(at));
    }

    /// A new POI goes through the form, is saved and comes back on reload
    #[tokio::test]
    async fn test_poi_round_trip() {
        let mut session = session_with(vec![poi("Dom", 51.1545, 11.8035)]).await;

        place_poi(&mut session, LatLng::new(51.1510, 11.8100)).await;
        let form = session.form_mut().unwrap();
        form.fields.title = "Marientor".into();
        form.fields.era = "Spätmittelalter, Frühe Neuzeit".into();
        session.commit_form().unwrap();

        let state = session.save_pois().await.unwrap();
        assert_eq!(state, SaveState::Committed("POIs saved.".into()));
        assert_eq!(session.surface().pois().len(), 2);
        assert!(session.surface().draft().is_empty());
        assert!(!session.has_unpersisted_changes());

        let bundle = session.gateway().fetch_initial_bundle().await;
        assert_eq!(bundle.pois.len(), 2);
        let reloaded = EditorSession::load(
            MemoryGateway::with_bundle(bundle),
            &TileProbeOptions::for_testing(),
        )
        .await;
        let original: Vec<_> = session.surface().pois().features().cloned().collect();
        let round_tripped: Vec<_> = reloaded.surface().pois().features().cloned().collect();
        assert_eq!(original, round_tripped);

        let props = round_tripped[1].properties.as_ref().unwrap();
        assert_eq!(props["era"], json!(["Spätmittelalter", "Frühe Neuzeit"]));
        assert_eq!(props["tags"], json!([]));
    }

    /// Era and tags parsing as stored after a form commit
    #[tokio::test]
    async fn test_era_and_tags_parsing() {
        let cases = [
            ("", "", json!(null), json!([])),
            ("A, B", "x", json!(["A", "B"]), json!(["x"])),
            ("A,, B", " , y ,", json!(["A", "B"]), json!(["y"])),
        ];

        for (era, tags, expected_era, expected_tags) in cases {
            let mut session = session_with(Vec::new()).await;
            place_poi(&mut session, LatLng::new(51.0, 11.0)).await;
            let form = session.form_mut().unwrap();
            form.fields.era = era.into();
            form.fields.tags = tags.into();
            session.commit_form().unwrap();
            session.save_pois().await.unwrap();

            let stored = session.gateway().stored_pois();
            let props = stored.features[0].properties.as_ref().unwrap();
            assert_eq!(props["era"], expected_era, "era input {:?}", era);
            assert_eq!(props["tags"], expected_tags, "tags input {:?}", tags);
        }
    }

    /// A blank title is stored as "POI"
    #[tokio::test]
    async fn test_blank_title_defaults() {
        let mut session = session_with(Vec::new()).await;
        place_poi(&mut session, LatLng::new(51.0, 11.0)).await;
        session.form_mut().unwrap().fields.title = "   ".into();
        session.commit_form().unwrap();
        session.save_pois().await.unwrap();

        let stored = session.gateway().stored_pois();
        assert_eq!(stored.features[0].property_str("title"), Some("POI"));
    }

    /// Cancelling the form of a freshly placed marker leaves no trace
    #[tokio::test]
    async fn test_cancel_new_marker() {
        let mut session = session_with(vec![poi("Dom", 51.1545, 11.8035)]).await;
        place_poi(&mut session, LatLng::new(51.0, 11.0)).await;
        assert!(session.form().unwrap().is_new());

        session.cancel_form().unwrap();
        assert!(session.form().is_none());
        assert!(session.surface().draft().is_empty());
        assert_eq!(session.surface().pois().len(), 1);

        session.save_pois().await.unwrap();
        assert_eq!(session.gateway().stored_pois().len(), 1);
    }

    /// Delete selection removes only the most recent draft entry
    #[tokio::test]
    async fn test_delete_selection_is_lifo() {
        let mut session = session_with(vec![poi("Dom", 51.1545, 11.8035)]).await;

        place_poi(&mut session, LatLng::new(51.0, 11.0)).await;
        let first = session.commit_form().unwrap();

        session.start_draw_polygon().unwrap();
        for vertex in triangle() {
            session.map_click(vertex);
        }
        assert!(matches!(session.finish_gesture(), DrawOutcome::PolygonCompleted(_)));

        let removed = session.delete_selection().unwrap().unwrap();
        assert!(removed.geometry.is_polygon());
        assert_eq!(session.surface().draft().len(), 1);
        assert!(session.surface().draft().contains(first));

        session.delete_selection().unwrap();
        assert!(session.delete_selection().unwrap().is_none());
        assert_eq!(session.surface().pois().len(), 1);
    }

    /// Rectangles stay out of the saved polygon collection
    #[tokio::test]
    async fn test_rectangles_are_not_saved() {
        let mut session = session_with(Vec::new()).await;

        session.start_draw_rectangle().unwrap();
        session.map_click(LatLng::new(51.0, 11.0));
        session.map_click(LatLng::new(51.1, 11.1));

        session.start_draw_polygon().unwrap();
        for vertex in triangle() {
            session.map_click(vertex);
        }
        session.finish_gesture();

        session.save_polygons().await.unwrap();
        let stored = session.gateway().stored_polygons();
        assert_eq!(stored.len(), 1);
        assert!(matches!(
            stored.features[0].geometry,
            Some(Geometry::Polygon { .. })
        ));
        assert_eq!(stored.features[0].property_str("title"), Some("Fläche"));

        assert_eq!(session.surface().draft().len(), 1);
        assert!(matches!(
            session.surface().draft().iter().next().unwrap().geometry,
            DraftGeometry::Rectangle { .. }
        ));
    }

    /// Only one POI can be mid-edit, and no gesture starts while it is
    #[tokio::test]
    async fn test_single_active_edit() {
        let mut session = session_with(vec![poi("Dom", 51.1545, 11.8035)]).await;
        let persisted = session.surface().markers()[0].id;

        session.open_poi(persisted).unwrap();
        assert!(matches!(session.open_poi(persisted), Err(EditorError::EditInProgress)));
        assert!(matches!(session.start_add_poi(), Err(EditorError::EditInProgress)));
        assert!(matches!(session.save_pois().await, Err(EditorError::EditInProgress)));

        session.cancel_form().unwrap();
        assert!(matches!(session.commit_form(), Err(EditorError::NoActiveEdit)));

        session.start_draw_polygon().unwrap();
        assert!(matches!(session.start_add_poi(), Err(EditorError::DrawInProgress)));
        assert!(matches!(session.open_poi(persisted), Err(EditorError::DrawInProgress)));
    }

    /// Persisted POIs are edited in place and keep their unknown keys
    #[tokio::test]
    async fn test_edit_persisted_in_place() {
        let mut dom = poi("Dom", 51.1545, 11.8035);
        dom.properties
            .as_mut()
            .unwrap()
            .insert("source".into(), json!("archive"));
        let mut session = session_with(vec![dom]).await;
        let id = session.surface().markers()[0].id;

        session.open_poi(id).unwrap();
        assert_eq!(session.form().unwrap().fields.title, "Dom");
        session.form_mut().unwrap().fields.subtitle = "St. Peter und Paul".into();
        session.commit_form().unwrap();

        assert!(session.surface().draft().is_empty());
        assert!(session.has_unpersisted_changes());

        session.save_pois().await.unwrap();
        let stored = session.gateway().stored_pois();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.features[0].property_str("subtitle"), Some("St. Peter und Paul"));
        assert_eq!(stored.features[0].property_str("source"), Some("archive"));
        assert!(!session.has_unpersisted_changes());
    }

    /// A committed draft marker can be reopened and edited
    #[tokio::test]
    async fn test_reopen_draft_marker() {
        let mut session = session_with(Vec::new()).await;
        place_poi(&mut session, LatLng::new(51.0, 11.0)).await;
        session.form_mut().unwrap().fields.title = "Tor".into();
        let id = session.commit_form().unwrap();

        let marker = session.surface().markers().into_iter().find(|m| m.id == id).unwrap();
        assert!(marker.draft);

        session.open_poi(id).unwrap();
        session.form_mut().unwrap().fields.title = "Marientor".into();
        assert_eq!(session.commit_form().unwrap(), id);
        assert_eq!(session.surface().markers()[0].title, "Marientor");
    }

    /// A failed save keeps the optimistic update and reports it
    #[tokio::test]
    async fn test_failed_save_keeps_optimistic_state() {
        let mut session = session_with(Vec::new()).await;
        session.gateway().set_failing(true);

        place_poi(&mut session, LatLng::new(51.0, 11.0)).await;
        session.commit_form().unwrap();
        let state = session.save_pois().await.unwrap();

        assert!(state.is_failed());
        assert_eq!(session.surface().pois().len(), 1);
        assert!(session.surface().draft().is_empty());
        assert!(session.gateway().stored_pois().is_empty());
        assert!(session.has_unpersisted_changes());

        let notices = session.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);

        session.gateway().set_failing(false);
        session.save_pois().await.unwrap();
        assert_eq!(session.gateway().stored_pois().len(), 1);
        assert!(!session.has_unpersisted_changes());
    }

    /// Saving the start view stores the current center and zoom
    #[tokio::test]
    async fn test_save_start_view() {
        let mut session = session_with(Vec::new()).await;
        session.set_view(LatLng::new(51.2, 11.9), 12);
        session.zoom_in();

        let state = session.save_start_view().await;
        assert_eq!(state, SaveState::Committed("Start view saved.".into()));
        assert_eq!(session.config().start, StartView::new(51.2, 11.9, 13));

        let stored = session.gateway().fetch_initial_bundle().await;
        assert_eq!(stored.config.start.zoom, 13);
    }

    /// Image import fills the form, failures leave the field alone
    #[tokio::test]
    async fn test_import_image() {
        let mut session = session_with(Vec::new()).await;
        assert!(matches!(session.import_image().await, Err(EditorError::NoActiveEdit)));

        place_poi(&mut session, LatLng::new(51.0, 11.0)).await;
        session
            .gateway()
            .set_next_import(ImageImport::Imported("assets/images/foto_1.jpg".into()));
        session.import_image().await.unwrap();
        assert_eq!(session.form().unwrap().fields.image, "assets/images/foto_1.jpg");

        session
            .gateway()
            .set_next_import(ImageImport::Failed("permission denied".into()));
        session.import_image().await.unwrap();
        assert_eq!(session.form().unwrap().fields.image, "assets/images/foto_1.jpg");
        let notices = session.drain_notices();
        assert_eq!(notices[0].text, "ERROR:permission denied");

        session.import_image().await.unwrap();
        assert!(session.drain_notices().is_empty());
    }
}
