//! CLI integration tests for the `pixed` binary.
//!
//! Each test works in its own temp directory holding a small `pixed.toml`,
//! so discovery never reaches a user config.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Path to the pixed binary built for this test run.
fn pixed_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pixed"))
}

/// Run pixed in `dir` and return (stdout, stderr, exit code).
fn run(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(pixed_binary())
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute pixed");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

/// Temp project dir with 4x4 sprites, 10 of them, 4 colours and a 3x2 map.
fn setup() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("pixed.toml"),
        r#"
[project]
sprite_size = 4
bank_size = 10
palette_size = 4

[map]
width = 3
height = 2

[export]
columns = 4
"#,
    )
    .unwrap();
    dir
}

fn new_project(dir: &Path) {
    let (_, stderr, code) = run(dir, &["new"]);
    assert_eq!(code, 0, "new failed: {}", stderr);
}

fn stored_document(dir: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(dir.join(".pixed").join("project.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ============================================================================
// Project lifecycle
// ============================================================================

#[test]
fn test_new_creates_project_slot() {
    let dir = setup();
    new_project(dir.path());

    let doc = stored_document(dir.path());
    assert_eq!(doc["size"], 4);
    assert_eq!(doc["sprites"].as_array().unwrap().len(), 10);
    assert_eq!(doc["sprites"][3]["name"], "Sprite 3");
    assert_eq!(doc["palette"].as_array().unwrap().len(), 4);
    assert_eq!(doc["map"].as_array().unwrap().len(), 6);
    assert_eq!(doc["transparent"], false);
}

#[test]
fn test_new_refuses_to_overwrite_without_force() {
    let dir = setup();
    new_project(dir.path());

    let (_, stderr, code) = run(dir.path(), &["new"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--force"));

    let (_, _, code) = run(dir.path(), &["new", "--force", "--sprite-size", "8"]);
    assert_eq!(code, 0);
    assert_eq!(stored_document(dir.path())["size"], 8);
}

#[test]
fn test_commands_without_project_fail() {
    let dir = setup();
    let (_, stderr, code) = run(dir.path(), &["info"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("pixed new"));
}

#[test]
fn test_info_json() {
    let dir = setup();
    new_project(dir.path());

    let (stdout, _, code) = run(dir.path(), &["info", "--json"]);
    assert_eq!(code, 0);
    let info: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(info["sprites"], 10);
    assert_eq!(info["map_width"], 3);
    assert_eq!(info["placed_tiles"], 0);
}

#[test]
fn test_erase_requires_confirmation() {
    let dir = setup();
    new_project(dir.path());

    let (_, _, code) = run(dir.path(), &["erase"]);
    assert_eq!(code, 2);
    assert!(dir.path().join(".pixed/project.json").exists());

    let (_, _, code) = run(dir.path(), &["erase", "--yes"]);
    assert_eq!(code, 0);
    assert!(!dir.path().join(".pixed/project.json").exists());
}

#[test]
fn test_export_project_then_import_roundtrip() {
    let dir = setup();
    new_project(dir.path());
    run(dir.path(), &["draw", "--sprite", "2", "--set", "1,1"]);

    let (_, _, code) = run(dir.path(), &["export-project", "-o", "backup/project.json"]);
    assert_eq!(code, 0);
    let before = stored_document(dir.path());

    run(dir.path(), &["new", "--force"]);
    assert_ne!(stored_document(dir.path()), before);

    let (_, stderr, code) = run(dir.path(), &["import", "backup/project.json"]);
    assert_eq!(code, 0, "import failed: {}", stderr);
    assert_eq!(stored_document(dir.path()), before);
}

#[test]
fn test_import_rejects_size_mismatch() {
    let dir = setup();
    new_project(dir.path());
    let before = stored_document(dir.path());

    let bad = r##"{"size": 2, "sprites": [{"name": "x", "size": 2, "data": [[0, 0]]}], "palette": ["#FFFFFF"], "selected": 0}"##;
    std::fs::write(dir.path().join("bad.json"), bad).unwrap();

    let (_, stderr, code) = run(dir.path(), &["import", "bad.json"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"));
    assert_eq!(stored_document(dir.path()), before);
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_draw_set_line_and_tool() {
    let dir = setup();
    new_project(dir.path());

    let (_, stderr, code) = run(
        dir.path(),
        &["draw", "--sprite", "1", "--colour", "2", "--line", "0,0,3,3", "--tool", "flip-x"],
    );
    assert_eq!(code, 0, "draw failed: {}", stderr);

    let doc = stored_document(dir.path());
    let data = &doc["sprites"][1]["data"];
    for i in 0..4 {
        assert_eq!(data[i][3 - i], 2, "anti-diagonal cell {}", i);
    }
    assert!(data[0][0].is_null());
    assert_eq!(doc["selected"], 1);
}

#[test]
fn test_draw_out_of_bounds_is_invalid_args() {
    let dir = setup();
    new_project(dir.path());

    let (_, stderr, code) = run(dir.path(), &["draw", "--set", "4,0"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("outside"));
}

#[test]
fn test_draw_unknown_tool_rejected_by_parser() {
    let dir = setup();
    new_project(dir.path());

    let (_, _, code) = run(dir.path(), &["draw", "--tool", "spin"]);
    assert_eq!(code, 2);
}

#[test]
fn test_preview_writes_scaled_png() {
    let dir = setup();
    new_project(dir.path());

    let (_, stderr, code) = run(dir.path(), &["preview", "--cell-size", "5", "-o", "view.png"]);
    assert_eq!(code, 0, "preview failed: {}", stderr);
    let img = image::open(dir.path().join("view.png")).unwrap();
    assert_eq!((img.width(), img.height()), (20, 20));
}

// ============================================================================
// Palette, map and sprites
// ============================================================================

#[test]
fn test_palette_set_and_show() {
    let dir = setup();
    new_project(dir.path());

    let (_, _, code) = run(dir.path(), &["palette", "set", "1", "#00ff7f"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run(dir.path(), &["palette", "show", "--bulk"]);
    assert_eq!(stdout.lines().nth(1), Some("00FF7F"));

    let (_, _, code) = run(dir.path(), &["palette", "set", "1", "fff"]);
    assert_eq!(code, 2);
}

#[test]
fn test_palette_edit_substitutes_invalid_lines() {
    let dir = setup();
    new_project(dir.path());
    std::fs::write(dir.path().join("colours.txt"), "fff\n#000000\nzzzzzz\n").unwrap();

    let (_, stderr, code) = run(dir.path(), &["palette", "edit", "colours.txt"]);
    assert_eq!(code, 0);
    assert_eq!(stderr.matches("Warning:").count(), 2);

    let doc = stored_document(dir.path());
    for i in 0..3 {
        assert_eq!(doc["palette"][i], "#000000");
    }
}

#[test]
fn test_map_place_clear_and_render() {
    let dir = setup();
    new_project(dir.path());

    assert_eq!(run(dir.path(), &["map", "place", "4", "7"]).2, 0);
    assert_eq!(stored_document(dir.path())["map"][4], 7);

    let (stdout, _, _) = run(dir.path(), &["map", "show"]);
    assert_eq!(stdout.lines().nth(1).map(|l| l.split_whitespace().collect::<Vec<_>>()), Some(vec![".", "7", "."]));

    let (_, _, code) = run(dir.path(), &["map", "render", "-o", "map.png"]);
    assert_eq!(code, 0);
    let img = image::open(dir.path().join("map.png")).unwrap();
    assert_eq!((img.width(), img.height()), (12, 8));

    let (_, _, code) = run(dir.path(), &["map", "render", "-o", "big.png", "--scale", "3"]);
    assert_eq!(code, 0);
    let img = image::open(dir.path().join("big.png")).unwrap();
    assert_eq!((img.width(), img.height()), (36, 24));

    let (_, _, code) = run(dir.path(), &["map", "render", "--scale", "0"]);
    assert_eq!(code, 2);

    assert_eq!(run(dir.path(), &["map", "clear", "4"]).2, 0);
    assert_eq!(stored_document(dir.path())["map"][4], -1);

    let (_, _, code) = run(dir.path(), &["map", "place", "6", "0"]);
    assert_eq!(code, 1);
}

#[test]
fn test_shrinking_map_config_keeps_placed_tiles() {
    let dir = setup();
    new_project(dir.path());
    assert_eq!(run(dir.path(), &["map", "place", "5", "3"]).2, 0);

    let config = std::fs::read_to_string(dir.path().join("pixed.toml")).unwrap();
    std::fs::write(dir.path().join("pixed.toml"), config.replace("height = 2", "height = 1"))
        .unwrap();
    assert_eq!(run(dir.path(), &["palette", "set", "0", "#123456"]).2, 0);

    let map = stored_document(dir.path())["map"].clone();
    assert_eq!(map.as_array().unwrap().len(), 6);
    assert_eq!(map[5], 3);
}

#[test]
fn test_sprite_rename_and_copy() {
    let dir = setup();
    new_project(dir.path());
    run(dir.path(), &["draw", "--sprite", "0", "--set", "2,3"]);

    assert_eq!(run(dir.path(), &["sprite", "rename", "0", "hero"]).2, 0);
    assert_eq!(run(dir.path(), &["sprite", "copy", "0", "5"]).2, 0);

    let doc = stored_document(dir.path());
    assert_eq!(doc["sprites"][5]["name"], "hero");
    assert_eq!(doc["sprites"][5]["data"][3][2], 0);

    let (stdout, _, _) = run(dir.path(), &["sprite", "show", "5"]);
    assert!(stdout.starts_with("5 \"hero\""));
}

#[test]
fn test_transparent_toggle() {
    let dir = setup();
    new_project(dir.path());
    assert_eq!(run(dir.path(), &["transparent", "on"]).2, 0);
    assert_eq!(stored_document(dir.path())["transparent"], true);
    assert_eq!(run(dir.path(), &["transparent", "off"]).2, 0);
    assert_eq!(stored_document(dir.path())["transparent"], false);
}

// ============================================================================
// Sheet export and config
// ============================================================================

#[test]
fn test_export_sheet_uses_config_columns() {
    let dir = setup();
    new_project(dir.path());
    run(dir.path(), &["draw", "--sprite", "9", "--set", "0,0", "--set", "3,3"]);

    let (stdout, stderr, code) = run(dir.path(), &["export", "--compact"]);
    assert_eq!(code, 0, "export failed: {}", stderr);
    assert!(stdout.contains("sprites.png"));

    let img = image::open(dir.path().join("build/sprites.png")).unwrap();
    assert_eq!((img.width(), img.height()), (16, 12));

    let meta_text = std::fs::read_to_string(dir.path().join("build/sprites.json")).unwrap();
    assert!(!meta_text.trim_end().contains('\n'));
    let meta: serde_json::Value = serde_json::from_str(&meta_text).unwrap();
    assert_eq!(meta["count"], 10);
    assert_eq!(meta["sprites"][9]["x"], 4);
    assert_eq!(meta["sprites"][9]["y"], 8);
    assert_eq!(meta["sprites"][9]["paletteIndex"], 0);
    assert!(meta["sprites"][0]["paletteIndex"].is_null());
}

#[test]
fn test_export_flags_override_config() {
    let dir = setup();
    new_project(dir.path());

    let (_, _, code) =
        run(dir.path(), &["export", "-o", "out", "--name", "tiles", "--columns", "10"]);
    assert_eq!(code, 0);
    let img = image::open(dir.path().join("out/tiles.png")).unwrap();
    assert_eq!((img.width(), img.height()), (40, 4));

    let (_, _, code) = run(dir.path(), &["export", "--columns", "0"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_found_from_subdirectory() {
    let dir = setup();
    let sub = dir.path().join("art");
    std::fs::create_dir_all(&sub).unwrap();

    let (_, _, code) = run(&sub, &["new"]);
    assert_eq!(code, 0);
    // Storage resolves against the directory holding pixed.toml
    assert!(dir.path().join(".pixed/project.json").exists());
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("pixed.toml"), "[map]\nwidth = 0\n").unwrap();
    let (_, stderr, code) = run(dir.path(), &["new"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("map.width"));
}
