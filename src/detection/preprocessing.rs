use image::{DynamicImage, GrayImage, Luma};
use image::imageops::FilterType;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::{box_filter, gaussian_blur_f32};
use imageproc::morphology::{close, dilate};

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Size that fits `(width, height)` inside the working box, keeping the
/// aspect ratio. The box is rotated to match the frame orientation and
/// frames are never enlarged.
pub fn working_size(width: u32, height: u32, box_width: u32, box_height: u32) -> (u32, u32) {
    let (short_box, long_box) = (box_width.min(box_height), box_width.max(box_height));
    let (max_w, max_h) = if width > height {
        (long_box, short_box)
    } else {
        (short_box, long_box)
    };

    let scale = (max_w as f64 / width as f64)
        .min(max_h as f64 / height as f64)
        .min(1.0);
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Downscale to the working resolution.
pub fn downscale(img: &DynamicImage, box_width: u32, box_height: u32) -> DynamicImage {
    let (w, h) = working_size(img.width(), img.height(), box_width, box_height);
    if (w, h) == (img.width(), img.height()) {
        return img.clone();
    }
    img.resize_exact(w, h, FilterType::Triangle)
}

/// Local-mean binarization: pixels noticeably darker than their
/// neighbourhood become foreground (255).
pub fn adaptive_threshold(img: &GrayImage, block_radius: u32, offset: i16) -> GrayImage {
    let mean = box_filter(img, block_radius, block_radius);
    let mut out = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let local = mean.get_pixel(x, y)[0] as i32;
        let value = if (pixel[0] as i32) < local - offset as i32 { 255 } else { 0 };
        out.put_pixel(x, y, Luma([value]));
    }
    out
}

/// Morphological closing to bridge small gaps in the foreground.
pub fn close_gaps(img: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return img.clone();
    }
    close(img, Norm::LInf, radius)
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return img.clone();
    }
    gaussian_blur_f32(img, sigma)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Dilate edge pixels so that small breaks in an outline do not open it up.
pub fn thicken_edges(edges: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return edges.clone();
    }
    dilate(edges, Norm::LInf, radius)
}

/// Fraction of pixels set in a binary image.
pub fn foreground_ratio(img: &GrayImage) -> f32 {
    let total = (img.width() as u64 * img.height() as u64).max(1);
    let set = img.pixels().filter(|p| p[0] > 0).count() as u64;
    set as f32 / total as f32
}
