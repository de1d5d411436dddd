use std::path::Path;

use paintboard_core::error::CoreError;
use paintboard_core::filters::{self, TileGrid};
use paintboard_core::pixel::{Resample, Rgb};
use paintboard_core::stroke::Point;
use paintboard_test_harness::assertions::{
    assert_dark_at, assert_dimensions, assert_gray, assert_history_consistent, assert_uniform,
};
use paintboard_test_harness::builders::{EditorBuilder, PixelBufferBuilder};
use paintboard_test_harness::fixtures::MemoryStore;

#[test]
fn test_default_editor_is_blank_512() {
    let editor = EditorBuilder::new().build();
    assert_dimensions(editor.current_image(), 512, 512);
    assert_uniform(editor.current_image(), Rgb::WHITE);
    assert_eq!(editor.history_len(), 1);
    assert_history_consistent(&editor);
}

#[test]
fn test_negative_then_undo_scenario() {
    let mut editor = EditorBuilder::new().size(4, 4).build();

    editor.apply_negative().unwrap();
    assert_uniform(editor.current_image(), Rgb::BLACK);
    assert_eq!(editor.history_len(), 2);
    assert!(editor.can_undo());
    assert!(editor.has_changes());
    assert_eq!(editor.undo_description(), Some("Negative"));

    editor.undo();
    assert_uniform(editor.current_image(), Rgb::WHITE);
    assert_eq!(editor.history_len(), 1);
    assert_history_consistent(&editor);

    // Undo at the base snapshot is a no-op.
    let top = editor.undo().clone();
    assert_uniform(&top, Rgb::WHITE);
    assert_eq!(editor.history_len(), 1);
    assert!(!editor.can_undo());
}

#[test]
fn test_stroke_commit_scenario() {
    let mut editor = EditorBuilder::new().size(4, 4).build();

    editor
        .add_stroke(Point::new(0, 0), Point::new(3, 0), 1, Rgb::BLACK)
        .unwrap();
    assert_eq!(editor.pending_strokes().len(), 1);
    // Nothing is drawn until commit.
    assert_uniform(editor.current_image(), Rgb::WHITE);

    let top = editor.commit_strokes().clone();
    for x in 0..4 {
        assert_dark_at(&top, x, 0, 10);
    }
    assert_eq!(top.get(0, 1), Rgb::WHITE);
    assert_eq!(editor.history_len(), 2);
    assert!(editor.pending_strokes().is_empty());
    assert_eq!(editor.undo_description(), Some("Strokes"));
    assert_history_consistent(&editor);
}

#[test]
fn test_commit_with_no_strokes_keeps_history() {
    let mut editor = EditorBuilder::new().size(4, 4).build();
    editor.commit_strokes();
    assert_eq!(editor.history_len(), 1);

    editor.apply_negative().unwrap();
    editor.commit_strokes();
    assert_eq!(editor.history_len(), 2);
}

#[test]
fn test_many_strokes_form_one_snapshot() {
    let mut editor = EditorBuilder::new().size(8, 8).build();
    for y in 0..4 {
        editor
            .add_stroke(Point::new(0, y), Point::new(7, y), 1, Rgb::new(200, 0, 0))
            .unwrap();
    }
    editor.commit_strokes();
    assert_eq!(editor.history_len(), 2);
    editor.undo();
    assert_uniform(editor.current_image(), Rgb::WHITE);
}

#[test]
fn test_invalid_stroke_leaves_state_untouched() {
    let mut editor = EditorBuilder::new().size(4, 4).build();
    editor
        .add_stroke(Point::new(0, 0), Point::new(1, 1), 2, Rgb::BLACK)
        .unwrap();

    let err = editor
        .add_stroke(Point::new(0, 0), Point::new(1, 1), 0, Rgb::BLACK)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidParameter(_)));
    assert_eq!(editor.pending_strokes().len(), 1);
    assert_eq!(editor.history_len(), 1);
}

#[test]
fn test_filters_push_one_snapshot_each() {
    let mut editor = EditorBuilder::new().size(8, 8).build();
    editor
        .add_stroke(Point::new(0, 0), Point::new(7, 7), 2, Rgb::new(30, 120, 210))
        .unwrap();
    editor.commit_strokes();

    editor.apply_grayscale().unwrap();
    assert_gray(editor.current_image());
    editor.apply_global_equalize().unwrap();
    editor
        .apply_adaptive_equalize(TileGrid::new(2, 2), 2.0)
        .unwrap();
    editor.apply_contrast_brightness(1.2, 5.0).unwrap();
    assert_eq!(editor.history_len(), 6);
    assert_dimensions(editor.current_image(), 8, 8);
    assert_eq!(editor.undo_description(), Some("Contrast/brightness"));
}

#[test]
fn test_rejected_filter_parameters_leave_history() {
    let mut editor = EditorBuilder::new().size(4, 4).build();
    editor.apply_negative().unwrap();
    let before = editor.current_image().clone();

    assert!(matches!(
        editor.apply_adaptive_equalize(TileGrid::new(0, 2), 2.0),
        Err(CoreError::InvalidParameter(_))
    ));
    assert!(matches!(
        editor.apply_adaptive_equalize(TileGrid::new(2, 2), 0.0),
        Err(CoreError::InvalidParameter(_))
    ));
    assert!(matches!(
        editor.apply_contrast_brightness(0.0, 10.0),
        Err(CoreError::InvalidParameter(_))
    ));
    assert!(matches!(
        editor.apply_contrast_brightness(-2.0, 10.0),
        Err(CoreError::InvalidParameter(_))
    ));

    assert_eq!(editor.history_len(), 2);
    assert_eq!(editor.current_image(), &before);
}

#[test]
fn test_adaptive_on_flat_gray_is_unchanged() {
    let mut editor = EditorBuilder::new()
        .size(16, 16)
        .background(Rgb::new(128, 128, 128))
        .build();
    let before = editor.current_image().clone();
    editor
        .apply_adaptive_equalize(TileGrid::new(2, 2), 2.0)
        .unwrap();
    assert_eq!(editor.current_image(), &before);
    assert_eq!(editor.history_len(), 2);
}

#[test]
fn test_load_resizes_and_resets() {
    let source = PixelBufferBuilder::new(2, 2).fill(Rgb::new(40, 80, 120)).build();
    let store = MemoryStore::new().with_file("/pics/a.png", source);
    let mut editor = EditorBuilder::new().size(6, 6).store(store).build();

    editor
        .add_stroke(Point::new(0, 0), Point::new(5, 5), 1, Rgb::BLACK)
        .unwrap();
    editor.commit_strokes();
    editor.apply_negative().unwrap();
    editor
        .add_stroke(Point::new(0, 5), Point::new(5, 0), 1, Rgb::BLACK)
        .unwrap();

    editor.load(Path::new("/pics/a.png")).unwrap();
    assert_eq!(editor.history_len(), 1);
    assert!(editor.pending_strokes().is_empty());
    assert_dimensions(editor.current_image(), 6, 6);
    assert_uniform(editor.current_image(), Rgb::new(40, 80, 120));
    assert!(!editor.has_changes());
    assert_history_consistent(&editor);
}

#[test]
fn test_load_nearest_resample() {
    let source = PixelBufferBuilder::new(2, 1)
        .fill(Rgb::BLACK)
        .pixel(1, 0, Rgb::WHITE)
        .build();
    let store = MemoryStore::new().with_file("/pics/bw.png", source);
    let mut editor = EditorBuilder::new()
        .size(4, 2)
        .resample(Resample::Nearest)
        .store(store)
        .build();

    let img = editor.load(Path::new("/pics/bw.png")).unwrap().clone();
    assert_eq!(img.get(1, 1), Rgb::BLACK);
    assert_eq!(img.get(2, 0), Rgb::WHITE);
}

#[test]
fn test_failed_load_changes_nothing() {
    let mut editor = EditorBuilder::new().size(4, 4).build();
    editor.apply_negative().unwrap();
    editor
        .add_stroke(Point::new(0, 0), Point::new(3, 3), 1, Rgb::WHITE)
        .unwrap();

    let err = editor.load(Path::new("/missing.png")).unwrap_err();
    assert!(matches!(err, CoreError::Decode(_)));
    assert_eq!(editor.history_len(), 2);
    assert_eq!(editor.pending_strokes().len(), 1);
    assert_uniform(editor.current_image(), Rgb::BLACK);
}

#[test]
fn test_save_writes_top_snapshot() {
    let mut editor = EditorBuilder::new().size(4, 4).build();
    editor.apply_negative().unwrap();
    editor.save(Path::new("/out/neg.png")).unwrap();

    let saved = editor.store().get(Path::new("/out/neg.png")).unwrap();
    assert_eq!(&saved, editor.current_image());
    assert_eq!(editor.history_len(), 2);
}

#[test]
fn test_failed_save_changes_nothing() {
    let mut editor = EditorBuilder::new()
        .size(4, 4)
        .store(MemoryStore::failing_encoder())
        .build();
    editor.apply_negative().unwrap();

    let err = editor.save(Path::new("/out/x.png")).unwrap_err();
    assert!(matches!(err, CoreError::Encode(_)));
    assert_eq!(editor.history_len(), 2);
    assert!(editor.store().is_empty());
}

#[test]
fn test_new_canvas_resets_everything() {
    let mut editor = EditorBuilder::new()
        .size(5, 3)
        .background(Rgb::new(1, 2, 3))
        .build();
    editor.apply_negative().unwrap();
    editor
        .add_stroke(Point::new(0, 0), Point::new(4, 2), 1, Rgb::WHITE)
        .unwrap();

    editor.new_canvas();
    assert_eq!(editor.history_len(), 1);
    assert!(editor.pending_strokes().is_empty());
    assert_uniform(editor.current_image(), Rgb::new(1, 2, 3));
}

#[test]
fn test_pending_strokes_survive_undo() {
    let mut editor = EditorBuilder::new().size(4, 4).build();
    editor.apply_negative().unwrap();
    editor
        .add_stroke(Point::new(0, 3), Point::new(3, 3), 1, Rgb::new(9, 9, 9))
        .unwrap();

    editor.undo();
    assert_eq!(editor.pending_strokes().len(), 1);
    let top = editor.commit_strokes().clone();
    // Drawn over the restored white canvas.
    assert_eq!(top.get(0, 0), Rgb::WHITE);
    assert_eq!(top.get(2, 3), Rgb::new(9, 9, 9));
}

#[test]
fn test_editor_filter_matches_engine() {
    let source = PixelBufferBuilder::new(12, 12).gradient().build();
    let store = MemoryStore::new().with_file("/g.png", source.clone());
    let mut editor = EditorBuilder::new().size(12, 12).store(store).build();
    editor.load(Path::new("/g.png")).unwrap();

    let expected = filters::adaptive_equalize(&source, TileGrid::new(3, 3), 2.0).unwrap();
    let got = editor
        .apply_adaptive_equalize(TileGrid::new(3, 3), 2.0)
        .unwrap();
    assert_eq!(got, &expected);
}

#[test]
fn test_invalid_config_rejected() {
    let result = paintboard_core::editor::Editor::new(
        paintboard_core::config::EditorConfig::with_size(0, 4),
        MemoryStore::new(),
    );
    assert!(matches!(result, Err(CoreError::InvalidParameter(_))));
}
