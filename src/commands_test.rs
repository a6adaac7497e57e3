#![allow(clippy::float_cmp)]

use std::path::PathBuf;

use canvas::ConfigError;
use canvas::engine::RoutingEngine;

use super::*;

const DIAGRAM: &str = r#"{
    "items": [
        {"handle": "exclusivechoice", "id": "choice", "top": 10, "left": 20},
        {"handle": "mail", "id": "mail", "top": 200, "left": 40, "overlay": true},
        {"handle": "db", "id": "db", "top": 200, "left": 300}
    ],
    "connections": [["choice", 0, "mail", -1], ["choice", 1, "db", -1]]
}"#;

fn rebuilt() -> Canvas<MemoryEngine> {
    rebuild(DIAGRAM.as_bytes(), Format::Json, CanvasConfig::default()).expect("rebuild")
}

#[test]
fn format_follows_extension() {
    assert_eq!(Format::from_path(Path::new("a/diagram.json")), Some(Format::Json));
    assert_eq!(Format::from_path(Path::new("diagram.pb")), Some(Format::Proto));
    assert_eq!(Format::from_path(Path::new("diagram.txt")), None);
    assert_eq!(Format::from_path(Path::new("diagram")), None);
}

#[test]
fn explicit_format_wins() {
    let path = PathBuf::from("diagram.json");
    assert_eq!(resolve_format(&path, Some(Format::Proto)).expect("format"), Format::Proto);
    assert!(matches!(resolve_format(Path::new("x.yaml"), None), Err(CliError::UnknownFormat(_))));
}

#[test]
fn missing_file_is_a_read_error() {
    let err = read(Path::new("/definitely/not/here.json")).expect_err("should fail");
    assert!(matches!(err, CliError::Read { .. }));
}

#[test]
fn rebuild_replays_items_and_connections() {
    let canvas = rebuilt();
    assert_eq!(canvas.len(), 3);
    assert_eq!(canvas.engine().connections().len(), 2);
    assert!(canvas.item("mail").expect("mail").has_overlay());
}

#[test]
fn rebuild_rejects_dangling_reference() {
    let text = r#"{"items":[{"handle":"mail","id":"m","top":0,"left":0}],"connections":[["ghost",0,"m",-1]]}"#;
    let err = rebuild(text.as_bytes(), Format::Json, CanvasConfig::default()).expect_err("should fail");
    assert!(matches!(err, CliError::Snapshot(canvas::SnapshotError::DanglingItem(ref id)) if id == "ghost"));
}

#[test]
fn non_utf8_json_is_reported() {
    let err = decode(&[0xff, 0xfe, 0x00], Format::Json).expect_err("should fail");
    assert!(matches!(err, CliError::Utf8(_)));
}

#[test]
fn garbage_proto_is_a_codec_error() {
    let err = decode(&[0xff, 0xff, 0xff], Format::Proto).expect_err("should fail");
    assert!(matches!(err, CliError::Codec(_)));
}

#[test]
fn convert_to_proto_and_back_preserves_graph() {
    let canvas = rebuilt();
    let bytes = encode(&canvas, Format::Proto).expect("encode");
    let again = rebuild(&bytes, Format::Proto, CanvasConfig::default()).expect("rebuild");

    let before = listing(&canvas).expect("listing");
    let after = listing(&again).expect("listing");
    assert!(before.is_isomorphic(&after));
    assert_eq!(after.connections.len(), 2);
}

#[test]
fn json_output_is_pretty() {
    let bytes = encode(&rebuilt(), Format::Json).expect("encode");
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.contains('\n'));
    assert!(text.contains("\"handle\": \"exclusivechoice\""));
}

#[test]
fn describe_lists_items_then_connections() {
    let text = describe(&rebuilt()).expect("describe");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "choice exclusivechoice @ (10, 20) in=1 out=2");
    assert_eq!(lines[1], "mail mail @ (200, 40) in=0 out=0 target overlay");
    assert_eq!(lines[3], "choice[0] -> mail");
    assert_eq!(lines[5], "3 items, 2 connections");
}

#[test]
fn check_accepts_consistent_snapshot() {
    assert_eq!(check(DIAGRAM.as_bytes(), Format::Json, CanvasConfig::default()).expect("check"), 3);
}

#[test]
fn check_reports_rebuild_failures() {
    let text = r#"{"items":[{"handle":"spaceship","id":"s","top":0,"left":0}],"connections":[]}"#;
    let err = check(text.as_bytes(), Format::Json, CanvasConfig::default()).expect_err("should fail");
    assert!(matches!(err, CliError::Snapshot(canvas::SnapshotError::UnknownHandle(_))));
}

#[test]
fn flags_override_environment() {
    let env = |key: &str| match key {
        "FLOWCANVAS_VIEWPORT_WIDTH" => Some("800".to_owned()),
        "FLOWCANVAS_VIEWPORT_HEIGHT" => Some("600".to_owned()),
        _ => None,
    };
    let config = layered_config(Some(1280.0), None, Some("icons/".into()), env).expect("config");
    assert_eq!(config.viewport_width, 1280.0);
    assert_eq!(config.viewport_height, 600.0);
    assert_eq!(config.icon_base, "icons");
}

#[test]
fn invalid_flags_are_rejected() {
    for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let err = layered_config(Some(bad), None, None, |_| None).expect_err("should fail");
        assert!(matches!(
            err,
            CliError::Config(ConfigError::NotPositive { key: "FLOWCANVAS_VIEWPORT_WIDTH", .. })
        ));
    }
    let err = layered_config(None, Some(-1.0), None, |_| None).expect_err("should fail");
    assert!(matches!(err, CliError::Config(ConfigError::NotPositive { key: "FLOWCANVAS_VIEWPORT_HEIGHT", .. })));
    let err = layered_config(None, None, Some("/".into()), |_| None).expect_err("should fail");
    assert!(matches!(err, CliError::Config(ConfigError::Empty { .. })));
}

#[test]
fn snapshot_errors_carry_their_code() {
    let err = CliError::from(canvas::SnapshotError::UnknownHandle("x".into()));
    assert!(err.to_string().starts_with("E_"));
}
