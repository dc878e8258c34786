// Invariants of the bundled data (default player names, pointInfo layout).
// Native-friendly: no wasm/browser APIs.

use std::collections::HashSet;
use std::sync::Arc;

use find_meow::config::DEFAULT_PLAYER_NAMES;
use find_meow::{GameConfig, GameRng, ImageCatalog, TurnController, validate_player_name};

#[test]
fn default_player_names_are_unique_and_valid() {
    let mut seen = HashSet::new();
    for name in DEFAULT_PLAYER_NAMES {
        assert!(seen.insert(*name), "duplicate default name '{}'", name);
        assert!(validate_player_name(name).is_ok(), "default name '{}' fails validation", name);
    }
    assert_eq!(DEFAULT_PLAYER_NAMES.len(), GameConfig::default().max_players);
}

#[test]
fn catalog_respects_configured_image_limit() {
    let json: String = {
        let body: Vec<String> = (1..=80)
            .map(|i| format!(r#""channel{i:04}.jpg": {{ "cats": [ {{ "x": 0.5, "y": 0.5 }} ] }}"#))
            .collect();
        format!("{{ {} }}", body.join(", "))
    };
    let config = GameConfig::default();
    let catalog = ImageCatalog::from_point_info_json(&json, Some(config.max_channel_images)).unwrap();
    assert_eq!(catalog.len(), 72);
    assert_eq!(catalog.ids().last(), Some("channel0072.jpg"));

    let controller = TurnController::new(config, Arc::new(catalog), GameRng::seeded(1)).unwrap();
    assert_eq!(controller.catalog().len(), 72);
}

#[test]
fn config_json_overrides_timings() {
    let cfg = GameConfig::from_json(r#"{ "scan_duration_ms": 3000, "default_total_players": 4 }"#).unwrap();
    assert_eq!(cfg.scan_duration_ms, 3000);
    assert_eq!(cfg.default_total_players, 4);
    assert!(GameConfig::from_json(r#"{ "default_total_players": 30 }"#).is_err());
}
