//! Assertion helpers for tests.

use bitdither::PixelBuffer;
use pretty_assertions::assert_eq;

/// Assert every channel of every pixel is 0 or 255
pub fn assert_binary(image: &PixelBuffer) {
    for (i, p) in image.pixels().iter().enumerate() {
        for c in p.to_bytes() {
            assert!(c == 0 || c == 255, "pixel {i} has channel value {c}");
        }
    }
}

/// Assert every pixel has r == g == b
pub fn assert_gray(image: &PixelBuffer) {
    assert!(
        image.is_grayscale(),
        "expected a grayscale image, first pixel is {:?}",
        image.get(0, 0)
    );
}

/// Assert two images have the same size and pixels
pub fn assert_same_image(actual: &PixelBuffer, expected: &PixelBuffer) {
    assert_eq!(
        (actual.width(), actual.height()),
        (expected.width(), expected.height()),
        "image dimensions differ"
    );
    assert_eq!(actual.pixels(), expected.pixels());
}
