//! Script replay integration tests.
//!
//! Runs complete toolbar and gesture scripts against a real album directory.

use canvas_core::{CanvasConfig, CanvasStore, Element, ElementKind, Notice, Permission, Transform};
use canvas_renderer::{AlbumDirectory, ExportPipeline, RasterCapture};
use canvas_studio::{load_script, parse_script, ScriptRunner, StudioError};

fn runner(
    root: &std::path::Path,
    permission: Permission,
) -> ScriptRunner<RasterCapture, AlbumDirectory> {
    let store = CanvasStore::new(CanvasConfig {
        width: 160.0,
        height: 120.0,
        ..CanvasConfig::default()
    });
    let album = AlbumDirectory::new(root).with_permission(permission);
    ScriptRunner::new(store, ExportPipeline::new(RasterCapture::default(), album))
}

// ============================================================================
// Editing scripts
// ============================================================================

#[tokio::test]
async fn test_rectangle_gesture_script() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut runner = runner(dir.path(), Permission::Granted);
    let script = parse_script(
        r#"[
            {"command": "add_rectangle"},
            {"command": "pan", "target": "last", "phase": "begin"},
            {"command": "pinch", "target": "last", "phase": "begin"},
            {"command": "pan", "target": "last", "phase": "update", "dx": 50, "dy": -20},
            {"command": "pinch", "target": "last", "phase": "update", "scale": 1.5},
            {"command": "pan", "target": "last", "phase": "end"},
            {"command": "pinch", "target": "last", "phase": "end"}
        ]"#,
    )
    .expect("parse");

    runner.run(&script).await;

    let registry = runner.store().registry();
    let rect = registry.elements().next().expect("rectangle");
    assert_eq!(rect.transform, Transform::new(50.0, -20.0, 1.5));
}

#[tokio::test]
async fn test_text_edit_script() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut runner = runner(dir.path(), Permission::Granted);
    let script = parse_script(
        r#"[
            {"command": "add_text"},
            {"command": "tap", "target": "last"},
            {"command": "edit", "text": "Hello"},
            {"command": "blur"}
        ]"#,
    )
    .expect("parse");

    runner.run(&script).await;

    let registry = runner.store().registry();
    let text = registry.elements().next().expect("text");
    assert_eq!(text.label(), Some("Hello"));
}

#[tokio::test]
async fn test_remove_selected_script() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut runner = runner(dir.path(), Permission::Granted);
    let script = parse_script(
        r#"[
            {"command": "add_circle"},
            {"command": "add_image", "source": "file:///photos/cat.png"},
            {"command": "tap", "target": "last"},
            {"command": "remove_selected"},
            {"command": "remove_selected"}
        ]"#,
    )
    .expect("parse");

    runner.run(&script).await;

    let registry = runner.store().registry();
    let kinds: Vec<_> = registry.elements().map(|e| e.kind.clone()).collect();
    assert_eq!(kinds, vec![ElementKind::Circle]);
    assert_eq!(runner.store().selected(), None);
}

#[tokio::test]
async fn test_stale_targets_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut runner = runner(dir.path(), Permission::Granted);
    let script = parse_script(
        r#"[
            {"command": "tap", "target": "last"},
            {"command": "pan", "target": 42, "phase": "begin"},
            {"command": "pan", "target": 42, "phase": "end"},
            {"command": "edit", "text": "nobody is editing"},
            {"command": "add_rectangle"}
        ]"#,
    )
    .expect("parse");

    runner.run(&script).await;

    let registry = runner.store().registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.elements().next().map(|e| e.transform),
        Some(Transform::default())
    );
    assert!(runner.notices().is_empty());
}

// ============================================================================
// Permissions and export
// ============================================================================

#[tokio::test]
async fn test_media_permission_denied_raises_notice() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut runner = runner(dir.path(), Permission::Granted);
    let script = parse_script(
        r#"[
            {"command": "add_image", "source": "file:///a.png", "permission": "denied"},
            {"command": "add_image"}
        ]"#,
    )
    .expect("parse");

    runner.run(&script).await;

    assert!(runner.store().registry().is_empty());
    assert_eq!(
        runner.notices(),
        &[Notice::new("Permission required", "Cannot access gallery.")]
    );
}

#[tokio::test]
async fn test_export_script_writes_album() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut runner = runner(dir.path(), Permission::Granted);
    let script = parse_script(
        r#"[
            {"command": "add_circle"},
            {"command": "add_text"},
            {"command": "export"}
        ]"#,
    )
    .expect("parse");

    runner.run(&script).await;

    assert_eq!(runner.notices(), &[Notice::saved()]);
    let files: Vec<_> = std::fs::read_dir(dir.path().join("DesignExports"))
        .expect("album")
        .collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_export_denied_keeps_canvas() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut runner = runner(dir.path(), Permission::Denied);
    let script = parse_script(r#"[{"command": "add_rectangle"}, {"command": "export"}]"#)
        .expect("parse");

    runner.run(&script).await;

    assert_eq!(runner.notices(), &[Notice::gallery_permission_required()]);
    assert_eq!(runner.store().registry().len(), 1);
    assert!(!dir.path().join("DesignExports").exists());
}

// ============================================================================
// Script loading
// ============================================================================

#[tokio::test]
async fn test_load_script_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("script.json");
    std::fs::write(&path, r#"[{"command": "add_text"}]"#).expect("write");

    let commands = load_script(&path).await.expect("load");
    assert_eq!(commands.len(), 1);

    let missing = load_script(&dir.path().join("missing.json")).await;
    assert!(matches!(missing, Err(StudioError::Io(_))));

    std::fs::write(&path, "not json").expect("write");
    assert!(matches!(
        load_script(&path).await,
        Err(StudioError::Parse(_))
    ));
}

#[test]
fn test_registry_dump_is_loadable() {
    let store = CanvasStore::new(CanvasConfig::default());
    store.add(ElementKind::text());
    store.add(ElementKind::image("data:image/png;base64,AAAA"));
    let json = store.registry().to_json().expect("json");

    let restored = canvas_core::Registry::from_json(&json).expect("restore");
    let labels: Vec<_> = restored.elements().filter_map(Element::label).collect();
    assert_eq!(labels, vec!["New Text"]);
    assert_eq!(restored.len(), 2);
}
