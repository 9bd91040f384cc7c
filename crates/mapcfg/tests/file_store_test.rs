use std::fs;

use mapcfg::api::MapcfgApi;
use mapcfg::config::MapcfgConfig;
use mapcfg::store::fs::FileStore;
use mapcfg::store::DocumentStore;
use tempfile::tempdir;

const CANDIDATES: &str = r#"{
    "wmslayers": [
        {"id": 12, "caption": "Roads", "url": "https://example.org/wms"},
        {"id": "13", "internalLayerName": "rivers"}
    ]
}"#;

#[test]
fn test_document_survives_process_boundaries() {
    let dir = tempdir().unwrap();
    let doc_path = dir.path().join("mapcfg.json");
    let candidates = dir.path().join("layers.json");
    fs::write(&candidates, CANDIDATES).unwrap();

    let store = || FileStore::new(&doc_path).with_candidates(Some(candidates.clone()));

    let mut api = MapcfgApi::new(store(), MapcfgConfig::default());
    api.insert_layer("12", None, None).unwrap();
    api.insert_tool("coordinates", None, None).unwrap();
    api.toggle("search", &["13"]).unwrap();

    let api = MapcfgApi::new(store(), MapcfgConfig::default());
    let names: Vec<String> = api
        .flatten(None, None, None)
        .unwrap()
        .items
        .into_iter()
        .map(|i| i.display_name)
        .collect();
    assert_eq!(names, vec!["Roads"]);

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&doc_path).unwrap()).unwrap();
    assert_eq!(raw["revision"], 3);
    assert!(raw["updatedAt"].is_string());
    assert_eq!(raw["tools"][0]["type"], "coordinates");
    assert_eq!(raw["tools"][0]["options"]["target"], "right");
    assert_eq!(raw["pickers"]["search"][0]["id"], "13");
}

#[test]
fn test_hand_edited_document_is_normalized_on_save() {
    let dir = tempdir().unwrap();
    let doc_path = dir.path().join("mapcfg.json");
    fs::write(
        &doc_path,
        r#"{
            "revision": 10,
            "layerMenu": {"id": "root", "layers": [{"id": 5, "visibleForGroups": " a ,, b "}]},
            "tools": [
                {"type": "print", "index": 30, "options": {"target": "left", "paper": "A4"}},
                {"type": "measure", "index": 10, "options": {"target": "left"}}
            ]
        }"#,
    )
    .unwrap();

    let mut api = MapcfgApi::new(FileStore::new(&doc_path), MapcfgConfig::default());
    let (_, report) = api.doctor(false).unwrap();
    assert_eq!(report.unnormalized_scopes, 1);
    assert_eq!(report.unindexed_slots, vec!["left"]);

    api.doctor(true).unwrap();
    let doc = FileStore::new(&doc_path).load().unwrap();
    assert_eq!(doc.revision, 11);
    assert_eq!(doc.layer_menu.layers[0].visible_for_groups, vec!["a", "b"]);
    let order: Vec<(&str, i64)> = doc
        .tools
        .iter()
        .map(|t| (t.tool_type.as_str(), t.index))
        .collect();
    assert_eq!(order, vec![("measure", 0), ("print", 1)]);
    assert_eq!(doc.tools[1].options.extra["paper"], "A4");
}

#[test]
fn test_missing_candidates_file_is_an_error() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().join("mapcfg.json"))
        .with_candidates(Some(dir.path().join("absent.json")));
    let api = MapcfgApi::new(store, MapcfgConfig::default());
    assert!(api.flatten(None, None, None).is_err());
}
