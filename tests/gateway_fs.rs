mod common;

use common::{poi, triangle};
use eramap::prelude::*;
use serde_json::{json, Value};
use std::path::PathBuf;

/// The file-backed gateway on a temporary project root
#[cfg(test)]
mod gateway_fs {
    use super::*;

    async fn open(root: &std::path::Path, picked: Option<PathBuf>) -> FileGateway {
        let layout = DataLayout::from_root(root);
        FileGateway::open(layout, move || picked.clone())
            .await
            .unwrap()
    }

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    /// First run creates the data files with defaults
    #[tokio::test]
    async fn test_first_run_creates_defaults() {
        let root = tempfile::tempdir().unwrap();
        let gateway = open(root.path(), None).await;
        let layout = gateway.layout();

        assert!(layout.images_dir.is_dir());
        let config = read_json(&layout.config_path);
        assert_eq!(config["start"], json!({"lat": 51.153, "lon": 11.8088, "zoom": 14}));
        assert_eq!(config["startEraIndex"], json!(0));
        assert_eq!(config["eras"][0], json!("Frühmittelalter"));
        assert_eq!(
            read_json(&layout.pois_path),
            json!({"type": "FeatureCollection", "features": []})
        );

        let raw = std::fs::read_to_string(&layout.config_path).unwrap();
        assert!(raw.contains("Frühmittelalter"));
        assert!(raw.contains("\n  \"start\": {"));
    }

    /// Corrupt files are replaced by defaults when read
    #[tokio::test]
    async fn test_corrupt_files_fall_back() {
        let root = tempfile::tempdir().unwrap();
        let gateway = open(root.path(), None).await;
        std::fs::write(&gateway.layout().pois_path, "[1, 2").unwrap();
        std::fs::remove_file(&gateway.layout().config_path).unwrap();

        let bundle = gateway.fetch_initial_bundle().await;
        assert!(bundle.pois.is_empty());
        assert_eq!(bundle.config, Config::default());

        let kept = gateway.layout().data_dir.join("pois.unreadable.json");
        assert_eq!(std::fs::read_to_string(kept).unwrap(), "[1, 2");
    }

    /// Positions with altitude load, survive a save and keep their third element
    #[tokio::test]
    async fn test_altitude_positions_survive_a_save() {
        let root = tempfile::tempdir().unwrap();
        let layout = DataLayout::from_root(root.path());
        std::fs::create_dir_all(&layout.data_dir).unwrap();
        std::fs::write(
            &layout.pois_path,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [11.8035, 51.1545]}, "properties": {"title": "Dom"}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [11.81, 51.15, 120.0]}, "properties": {"title": "Turm"}, "bbox": [11.81, 51.15, 11.81, 51.15]}
            ]}"#,
        )
        .unwrap();

        let options = TileProbeOptions::for_testing();
        let mut session = EditorSession::load(open(root.path(), None).await, &options).await;
        assert_eq!(session.surface().pois().len(), 2);

        session.start_add_poi().unwrap();
        session.map_click(LatLng::new(51.152, 11.807));
        session.form_mut().unwrap().fields.title = "Marientor".into();
        session.commit_form().unwrap();
        session.save_pois().await.unwrap();

        let stored = read_json(&layout.pois_path);
        let features = stored["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[1]["geometry"]["coordinates"], json!([11.81, 51.15, 120.0]));
        assert_eq!(features[1]["bbox"], json!([11.81, 51.15, 11.81, 51.15]));
        assert_eq!(features[2]["properties"]["title"], json!("Marientor"));
    }

    /// Saved POIs come back with equal properties
    #[tokio::test]
    async fn test_poi_round_trip_on_disk() {
        let root = tempfile::tempdir().unwrap();
        let gateway = open(root.path(), None).await;
        let mut dom = poi("Naumburger Dom", 51.1545, 11.8035);
        let props = PoiFormFields {
            title: "Naumburger Dom".into(),
            era: "Hochmittelalter".into(),
            tags: "Kirche, Welterbe".into(),
            ..Default::default()
        }
        .to_properties();
        dom.properties = Some(props.to_properties());
        let pois = FeatureCollection::new(vec![dom, poi("Marientor", 51.151, 11.81)]);

        let outcome = gateway.save_pois(&pois).await;
        assert_eq!(outcome, SaveOutcome::Saved("POIs saved.".into()));

        let bundle = gateway.fetch_initial_bundle().await;
        assert_eq!(bundle.pois, pois);
        let raw = std::fs::read_to_string(&gateway.layout().pois_path).unwrap();
        assert!(raw.contains("\"title\": \"Naumburger Dom\""));
        assert!(raw.contains("\"era\": null"));
    }

    /// Whole editing session persisted to disk and reloaded
    #[tokio::test]
    async fn test_session_against_files() {
        let root = tempfile::tempdir().unwrap();
        let options = TileProbeOptions::for_testing();
        let mut session = EditorSession::load(open(root.path(), None).await, &options).await;

        session.start_draw_polygon().unwrap();
        for vertex in triangle() {
            session.map_click(vertex);
        }
        session.finish_gesture();
        session.save_polygons().await.unwrap();

        let reloaded = EditorSession::load(open(root.path(), None).await, &options).await;
        let polygons = reloaded.surface().styled_polygons();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].1, triangle());
        assert_eq!(polygons[0].2, PolygonStyle::default());

        let stored = read_json(&reloaded.gateway().layout().polygons_path);
        assert_eq!(stored["features"][0]["properties"]["stroke-width"], json!(2));
    }

    /// Malformed payloads are reported and storage stays as it was
    #[tokio::test]
    async fn test_malformed_payload_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let gateway = open(root.path(), None).await;
        gateway
            .save_pois(&FeatureCollection::new(vec![poi("Dom", 51.15, 11.80)]))
            .await;
        let before = std::fs::read_to_string(&gateway.layout().pois_path).unwrap();

        for payload in ["not json", r#"{"type": "Feature"}"#, r#"{"features": 3}"#] {
            let outcome = gateway.save_pois_json(payload).await;
            assert!(!outcome.is_ok(), "accepted {payload}");
            assert!(outcome.message().starts_with("Error saving POIs"));
        }
        let outcome = gateway.save_polygons_json("[]").await;
        assert!(outcome.message().starts_with("Error saving polygons"));

        let after = std::fs::read_to_string(&gateway.layout().pois_path).unwrap();
        assert_eq!(before, after);

        let outcome = gateway
            .save_pois_json(r#"{"type": "FeatureCollection", "features": []}"#)
            .await;
        assert!(outcome.is_ok());
    }

    /// Write failures come back as a message, not an error
    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let gateway = open(root.path(), None).await;
        let pois_path = gateway.layout().pois_path.clone();
        std::fs::remove_file(&pois_path).unwrap();
        std::fs::create_dir_all(pois_path.join("blocked")).unwrap();

        let outcome = gateway.save_pois(&FeatureCollection::empty()).await;
        assert!(!outcome.is_ok());
        assert!(outcome.message().starts_with("Error saving POIs: "));
        assert!(pois_path.is_dir());
    }

    /// The start view replaces only `start` in the config
    #[tokio::test]
    async fn test_start_view_merge() {
        let root = tempfile::tempdir().unwrap();
        let gateway = open(root.path(), None).await;
        let config_path = gateway.layout().config_path.clone();
        std::fs::write(
            &config_path,
            r#"{"start": {"lat": 1.0, "lon": 2.0, "zoom": 3}, "startEraIndex": 2, "eras": ["A", "B", "C"], "title": "Naumburg"}"#,
        )
        .unwrap();

        let outcome = gateway.save_start_view(StartView::new(51.2, 11.9, 15)).await;
        assert_eq!(outcome, SaveOutcome::Saved("Start view saved.".into()));

        let config = read_json(&config_path);
        assert_eq!(config["start"], json!({"lat": 51.2, "lon": 11.9, "zoom": 15}));
        assert_eq!(config["startEraIndex"], json!(2));
        assert_eq!(config["eras"], json!(["A", "B", "C"]));
        assert_eq!(config["title"], json!("Naumburg"));
    }

    /// Importing a colliding file name picks the next free suffix
    #[tokio::test]
    async fn test_image_import_collision() {
        let root = tempfile::tempdir().unwrap();
        let source_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("foto.jpg");
        std::fs::write(&source, b"new photo").unwrap();

        let gateway = open(root.path(), Some(source.clone())).await;
        let images = gateway.layout().images_dir.clone();
        std::fs::write(images.join("foto.jpg"), b"original").unwrap();

        let import = gateway.import_image().await;
        assert_eq!(import, ImageImport::Imported("assets/images/foto_1.jpg".into()));
        assert_eq!(std::fs::read(images.join("foto.jpg")).unwrap(), b"original");
        assert_eq!(std::fs::read(images.join("foto_1.jpg")).unwrap(), b"new photo");

        let import = gateway.import_image().await;
        assert_eq!(import.to_wire(), "assets/images/foto_2.jpg");
    }

    /// Cancelled picker and unreadable source
    #[tokio::test]
    async fn test_image_import_cancel_and_failure() {
        let root = tempfile::tempdir().unwrap();
        let gateway = open(root.path(), None).await;
        assert_eq!(gateway.import_image().await, ImageImport::Cancelled);

        let missing = root.path().join("does-not-exist.png");
        let gateway = open(root.path(), Some(missing)).await;
        match gateway.import_image().await {
            ImageImport::Failed(msg) => assert!(!msg.is_empty()),
            other => panic!("unexpected import result {:?}", other),
        }
    }
}
