use mapcfg::config::MapcfgConfig;
use mapcfg::session::EditorSession;
use mapcfg::zones::ZoneRegistry;

#[test]
fn test_default_config_round_trips_through_toml() {
    let text = toml::to_string(&MapcfgConfig::default()).unwrap();
    let parsed: MapcfgConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, MapcfgConfig::default());
}

#[test]
fn test_custom_slots_drive_the_zone_set() {
    let config: MapcfgConfig = toml::from_str(
        r#"
        document = "viewer/config.json"
        layer_menu_zone = "menu"
        layer_menu_root = "top"
        tool_targets = ["header", "footer"]
        default_tool_target = "footer"
        exclusive_tool_targets = false
        pickers = ["search", "print"]
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    let zones = ZoneRegistry::standard(&config).unwrap();
    let ids: Vec<&str> = zones.zones().iter().map(|z| z.id()).collect();
    assert_eq!(ids, vec!["menu", "header", "footer"]);
    assert!(zones.exclusive_with("header").unwrap().is_empty());

    let session = EditorSession::new(&config).unwrap();
    assert_eq!(session.picker_names(), vec!["print", "search"]);
    assert_eq!(session.layer_menu().unwrap().root_id().as_str(), "top");
}

#[test]
fn test_invalid_default_target_is_rejected_by_session() {
    let config = MapcfgConfig {
        default_tool_target: "nowhere".into(),
        ..Default::default()
    };
    assert!(EditorSession::new(&config).is_err());
}
