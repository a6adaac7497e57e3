#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_lookup_gives_defaults() {
    let cfg = CanvasConfig::from_lookup(lookup(&[])).expect("config");
    assert_eq!(cfg, CanvasConfig::default());
    assert_eq!(cfg.item_width, 100.0);
    assert_eq!(cfg.icon_size, 64.0);
}

#[test]
fn overrides_are_applied() {
    let cfg = CanvasConfig::from_lookup(lookup(&[
        ("FLOWCANVAS_VIEWPORT_WIDTH", "1920"),
        ("FLOWCANVAS_VIEWPORT_HEIGHT", " 1080 "),
        ("FLOWCANVAS_ICON_SIZE", "32.5"),
        ("FLOWCANVAS_ICON_BASE", "https://cdn.example.com/icons/"),
    ]))
    .expect("config");
    assert_eq!(cfg.viewport_width, 1920.0);
    assert_eq!(cfg.viewport_height, 1080.0);
    assert_eq!(cfg.icon_size, 32.5);
    assert_eq!(cfg.icon_base, "https://cdn.example.com/icons");
}

#[test]
fn unparseable_number_falls_back_to_default() {
    let cfg = CanvasConfig::from_lookup(lookup(&[("FLOWCANVAS_ITEM_WIDTH", "wide")])).expect("config");
    assert_eq!(cfg.item_width, 100.0);
}

#[test]
fn non_positive_size_is_rejected() {
    let err = CanvasConfig::from_lookup(lookup(&[("FLOWCANVAS_ITEM_HEIGHT", "0")])).expect_err("should fail");
    assert_eq!(err, ConfigError::NotPositive { key: "FLOWCANVAS_ITEM_HEIGHT", value: 0.0 });

    let err = CanvasConfig::from_lookup(lookup(&[("FLOWCANVAS_VIEWPORT_WIDTH", "-5")])).expect_err("should fail");
    assert!(matches!(err, ConfigError::NotPositive { key: "FLOWCANVAS_VIEWPORT_WIDTH", .. }));
}

#[test]
fn infinite_size_is_rejected() {
    let err = CanvasConfig::from_lookup(lookup(&[("FLOWCANVAS_ICON_SIZE", "inf")])).expect_err("should fail");
    assert!(matches!(err, ConfigError::NotPositive { key: "FLOWCANVAS_ICON_SIZE", .. }));
}

#[test]
fn empty_icon_base_is_rejected() {
    let err = CanvasConfig::from_lookup(lookup(&[("FLOWCANVAS_ICON_BASE", "/")])).expect_err("should fail");
    assert_eq!(err, ConfigError::Empty { key: "FLOWCANVAS_ICON_BASE" });
}

#[test]
fn icon_url_joins_base_and_handle() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.icon_url("mail"), "images/mail.png");
}
