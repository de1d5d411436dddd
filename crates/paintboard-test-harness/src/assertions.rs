use paintboard_core::editor::Editor;
use paintboard_core::pixel::{PixelBuffer, Rgb};
use paintboard_core::store::ImageStore;

/// Assert the undo predicates agree with each other and with the history length.
pub fn assert_history_consistent<S: ImageStore>(editor: &Editor<S>) {
    let len = editor.history_len();
    assert!(len >= 1, "history must never be empty");
    assert_eq!(
        editor.can_undo(),
        len > 1,
        "can_undo() disagrees with history length {len}"
    );
    assert_eq!(
        editor.has_changes(),
        editor.can_undo(),
        "has_changes() and can_undo() diverged at history length {len}"
    );
}

/// Assert every pixel of `img` is `color`.
pub fn assert_uniform(img: &PixelBuffer, color: Rgb) {
    for y in 0..img.height() {
        for x in 0..img.width() {
            let got = img.get(x, y);
            assert_eq!(got, color, "pixel ({x}, {y}) is {got:?}, expected {color:?}");
        }
    }
}

/// Assert R == G == B at every pixel.
pub fn assert_gray(img: &PixelBuffer) {
    for y in 0..img.height() {
        for x in 0..img.width() {
            let p = img.get(x, y);
            assert!(
                p.r == p.g && p.g == p.b,
                "pixel ({x}, {y}) is not gray: {p:?}"
            );
        }
    }
}

/// Assert `img` is `width`x`height`.
pub fn assert_dimensions(img: &PixelBuffer, width: u32, height: u32) {
    assert_eq!(
        (img.width(), img.height()),
        (width, height),
        "image is {}x{}, expected {width}x{height}",
        img.width(),
        img.height()
    );
}

/// Assert no channel of the pixel at (x, y) exceeds `max`.
pub fn assert_dark_at(img: &PixelBuffer, x: u32, y: u32, max: u8) {
    let p = img.get(x, y);
    assert!(
        p.r <= max && p.g <= max && p.b <= max,
        "pixel ({x}, {y}) is {p:?}, expected every channel <= {max}"
    );
}
