//! Property tests for the editor's history invariants and the filter algebra.

use std::path::Path;

use paintboard_core::filters::{self, TileGrid};
use paintboard_core::pixel::{PixelBuffer, Rgb};
use paintboard_core::stroke::Point;
use paintboard_test_harness::builders::{EditorBuilder, PixelBufferBuilder};
use paintboard_test_harness::fixtures::MemoryStore;
use proptest::prelude::*;

const LOAD_PATH: &str = "/mem/source.png";

#[derive(Debug, Clone)]
enum Op {
    AddStroke { x1: i32, y1: i32, x2: i32, y2: i32, width: u32 },
    Commit,
    Undo,
    Load,
    Grayscale,
    Negative,
    Equalize,
    Adaptive { rows: u32, cols: u32, clip: f64 },
    Contrast { alpha: f64, beta: f64 },
    NewCanvas,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-4i32..12, -4i32..12, -4i32..12, -4i32..12, 0u32..4).prop_map(
            |(x1, y1, x2, y2, width)| Op::AddStroke { x1, y1, x2, y2, width }
        ),
        Just(Op::Commit),
        Just(Op::Undo),
        Just(Op::Undo),
        Just(Op::Load),
        Just(Op::Grayscale),
        Just(Op::Negative),
        Just(Op::Equalize),
        (0u32..4, 0u32..4, -1.0f64..4.0)
            .prop_map(|(rows, cols, clip)| Op::Adaptive { rows, cols, clip }),
        (-1.0f64..3.0, -300.0f64..300.0).prop_map(|(alpha, beta)| Op::Contrast { alpha, beta }),
        Just(Op::NewCanvas),
    ]
}

fn image_strategy() -> impl Strategy<Value = PixelBuffer> {
    (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
            .prop_map(move |data| PixelBuffer::from_rgb_vec(w, h, data).unwrap())
    })
}

proptest! {
    #[test]
    fn history_predicates_hold_after_every_op(
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let source = PixelBufferBuilder::new(5, 3).gradient().build();
        let store = MemoryStore::new().with_file(LOAD_PATH, source);
        let mut editor = EditorBuilder::new().size(8, 8).store(store).build();

        for op in &ops {
            let len_before = editor.history_len();
            let pending_before = editor.pending_strokes().len();
            match *op {
                Op::AddStroke { x1, y1, x2, y2, width } => {
                    let result = editor.add_stroke(
                        Point::new(x1, y1),
                        Point::new(x2, y2),
                        width,
                        Rgb::BLACK,
                    );
                    prop_assert_eq!(result.is_ok(), width >= 1);
                    let expected = pending_before + usize::from(width >= 1);
                    prop_assert_eq!(editor.pending_strokes().len(), expected);
                    prop_assert_eq!(editor.history_len(), len_before);
                }
                Op::Commit => {
                    editor.commit_strokes();
                    let expected = len_before + usize::from(pending_before > 0);
                    prop_assert_eq!(editor.history_len(), expected);
                    prop_assert!(editor.pending_strokes().is_empty());
                }
                Op::Undo => {
                    editor.undo();
                    prop_assert_eq!(editor.history_len(), len_before.saturating_sub(1).max(1));
                }
                Op::Load => {
                    editor.load(Path::new(LOAD_PATH)).unwrap();
                    prop_assert_eq!(editor.history_len(), 1);
                    prop_assert!(editor.pending_strokes().is_empty());
                }
                Op::NewCanvas => {
                    editor.new_canvas();
                    prop_assert_eq!(editor.history_len(), 1);
                    prop_assert!(editor.pending_strokes().is_empty());
                }
                Op::Grayscale | Op::Negative | Op::Equalize => {
                    let result = match op {
                        Op::Grayscale => editor.apply_grayscale().map(|_| ()),
                        Op::Negative => editor.apply_negative().map(|_| ()),
                        _ => editor.apply_global_equalize().map(|_| ()),
                    };
                    prop_assert!(result.is_ok());
                    prop_assert_eq!(editor.history_len(), len_before + 1);
                }
                Op::Adaptive { rows, cols, clip } => {
                    let valid = rows >= 1 && cols >= 1 && clip > 0.0;
                    let result = editor.apply_adaptive_equalize(TileGrid::new(rows, cols), clip);
                    prop_assert_eq!(result.is_ok(), valid);
                    prop_assert_eq!(editor.history_len(), len_before + usize::from(valid));
                }
                Op::Contrast { alpha, beta } => {
                    let valid = alpha > 0.0;
                    let result = editor.apply_contrast_brightness(alpha, beta);
                    prop_assert_eq!(result.is_ok(), valid);
                    prop_assert_eq!(editor.history_len(), len_before + usize::from(valid));
                }
            }

            let len = editor.history_len();
            prop_assert!(len >= 1);
            prop_assert_eq!(editor.can_undo(), len > 1);
            prop_assert_eq!(editor.has_changes(), len > 1);
            prop_assert_eq!(editor.current_image().width(), 8);
            prop_assert_eq!(editor.current_image().height(), 8);
        }
    }

    #[test]
    fn negative_is_involutive(img in image_strategy()) {
        prop_assert_eq!(filters::negative(&filters::negative(&img)), img);
    }

    #[test]
    fn grayscale_channels_equal(img in image_strategy()) {
        let gray = filters::grayscale(&img);
        for px in gray.as_raw().chunks_exact(3) {
            prop_assert!(px[0] == px[1] && px[1] == px[2], "pixel {:?} not gray", px);
        }
    }

    #[test]
    fn identity_remap_is_identity(img in image_strategy()) {
        prop_assert_eq!(filters::adjust_contrast_brightness(&img, 1.0, 0.0).unwrap(), img);
    }

    #[test]
    fn single_tile_adaptive_matches_global(img in image_strategy()) {
        // A clip limit of 256 caps bins at the tile pixel count, which never binds.
        let adaptive = filters::adaptive_equalize(&img, TileGrid::new(1, 1), 256.0).unwrap();
        prop_assert_eq!(adaptive, filters::global_equalize(&img));
    }

    #[test]
    fn equalization_preserves_shape(
        img in image_strategy(),
        rows in 1u32..6,
        cols in 1u32..6,
        clip in 0.1f64..8.0,
    ) {
        let global = filters::global_equalize(&img);
        let adaptive = filters::adaptive_equalize(&img, TileGrid::new(rows, cols), clip).unwrap();
        for out in [&global, &adaptive] {
            prop_assert!(out.same_dimensions(&img));
            prop_assert_eq!(out.channels(), 3);
            prop_assert_eq!(out.as_raw().len(), img.as_raw().len());
        }
    }

    #[test]
    fn flat_images_survive_equalization(
        w in 1u32..20,
        h in 1u32..20,
        v in any::<u8>(),
        rows in 1u32..5,
        cols in 1u32..5,
    ) {
        let img = PixelBuffer::of_size(w, h, Rgb::new(v, v, v));
        prop_assert_eq!(&filters::global_equalize(&img), &img);
        prop_assert_eq!(
            &filters::adaptive_equalize(&img, TileGrid::new(rows, cols), 2.0).unwrap(),
            &img
        );
    }
}
