use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;
use tcg_grader::measurement::{BorderBoundaries, CenteringMeasurements, Rect};
use tempfile::NamedTempFile;

pub const BACKGROUND: u8 = 30;
pub const CARD: u8 = 230;

/// Frame size used by most detection tests (portrait, matches the working size)
pub const FRAME_WIDTH: u32 = 480;
pub const FRAME_HEIGHT: u32 = 640;

/// Card placed in the standard frame: x, y, width, height
pub const CARD_RECT: (i32, i32, u32, u32) = (140, 180, 200, 280);

/// A bright card on a dark table.
pub fn card_frame(width: u32, height: u32, card: (i32, i32, u32, u32)) -> DynamicImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([BACKGROUND]));
    let (x, y, w, h) = card;
    draw_filled_rect_mut(&mut img, PixelRect::at(x, y).of_size(w, h), Luma([CARD]));
    DynamicImage::ImageLuma8(img)
}

pub fn standard_card_frame() -> DynamicImage {
    card_frame(FRAME_WIDTH, FRAME_HEIGHT, CARD_RECT)
}

/// Same scene as [`standard_card_frame`] at twice the resolution.
pub fn large_card_frame() -> DynamicImage {
    let (x, y, w, h) = CARD_RECT;
    card_frame(FRAME_WIDTH * 2, FRAME_HEIGHT * 2, (x * 2, y * 2, w * 2, h * 2))
}

pub fn blank_frame() -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, Luma([BACKGROUND])))
}

/// Normalized corners of [`CARD_RECT`] in the standard frame.
pub fn expected_card_corners() -> [(f64, f64); 4] {
    let (x, y, w, h) = CARD_RECT;
    let (fw, fh) = (FRAME_WIDTH as f64, FRAME_HEIGHT as f64);
    let (left, top) = (x as f64 / fw, y as f64 / fh);
    let (right, bottom) = ((x as f64 + w as f64) / fw, (y as f64 + h as f64) / fh);
    [(left, top), (right, top), (right, bottom), (left, bottom)]
}

/// Saves an image to a temporary PNG file, removed when dropped.
pub fn save_temp_png(img: &DynamicImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// The outer rectangle used by the end-to-end centering scenarios.
pub const SCENARIO_OUTER: Rect = Rect::new(0.0, 400.0, 0.0, 300.0);

pub fn boundaries_with_inner(inner: Rect) -> BorderBoundaries {
    BorderBoundaries::new(SCENARIO_OUTER, inner).expect("Invalid test boundaries")
}

/// Boundaries whose border widths are given directly.
pub fn boundaries_with_borders(left: f64, right: f64, top: f64, bottom: f64) -> BorderBoundaries {
    boundaries_with_inner(Rect::new(
        SCENARIO_OUTER.top + top,
        SCENARIO_OUTER.bottom - bottom,
        SCENARIO_OUTER.left + left,
        SCENARIO_OUTER.right - right,
    ))
}

/// Centering whose larger shares sit `lr` and `tb` above 50.
pub fn centering_with_deviation(lr: f64, tb: f64) -> CenteringMeasurements {
    CenteringMeasurements::new(50.0 + lr, 50.0 - lr, 50.0 - tb, 50.0 + tb)
}
