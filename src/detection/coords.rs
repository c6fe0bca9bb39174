use crate::models::{CardCorners, Point};

/// Ratio between the original frame and the working image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    pub fn between(original: (u32, u32), working: (u32, u32)) -> Self {
        Self {
            x: original.0 as f64 / working.0.max(1) as f64,
            y: original.1 as f64 / working.1.max(1) as f64,
        }
    }

    /// Working-image pixel to original-frame pixel
    pub fn to_original(&self, p: Point) -> Point {
        p.scale(self.x, self.y)
    }
}

/// Working-image corners to coordinates normalized by the original frame.
pub fn normalize_corners(
    corners: &CardCorners,
    scale: ScaleFactors,
    original: (u32, u32),
) -> CardCorners {
    let (w, h) = (original.0.max(1) as f64, original.1.max(1) as f64);
    corners.map(|p| {
        let p = scale.to_original(p);
        Point::new(p.x / w, p.y / h)
    })
}

/// Maps frame-normalized points onto a preview that fills the display by
/// cropping the frame (aspect-fill), centred on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    frame_width: f64,
    frame_height: f64,
    display_width: f64,
    display_height: f64,
}

impl DisplayMapping {
    pub fn new(frame: (u32, u32), display: (u32, u32)) -> Self {
        Self {
            frame_width: frame.0.max(1) as f64,
            frame_height: frame.1.max(1) as f64,
            display_width: display.0.max(1) as f64,
            display_height: display.1.max(1) as f64,
        }
    }

    /// Part of the frame that stays visible, as `(left, top, width, height)`
    /// in frame pixels.
    pub fn visible_region(&self) -> (f64, f64, f64, f64) {
        let frame_aspect = self.frame_height / self.frame_width;
        let display_aspect = self.display_height / self.display_width;

        if frame_aspect < display_aspect {
            // Frame is relatively wider: left and right are cropped
            let visible_width = self.frame_height / display_aspect;
            let left = (self.frame_width - visible_width) / 2.0;
            (left, 0.0, visible_width, self.frame_height)
        } else {
            let visible_height = self.frame_width * display_aspect;
            let top = (self.frame_height - visible_height) / 2.0;
            (0.0, top, self.frame_width, visible_height)
        }
    }

    /// Frame-normalized point to display-normalized point. Points inside the
    /// cropped margins land outside [0, 1].
    pub fn frame_to_display(&self, p: Point) -> Point {
        let (left, top, width, height) = self.visible_region();
        Point::new(
            (p.x * self.frame_width - left) / width,
            (p.y * self.frame_height - top) / height,
        )
    }

    pub fn display_to_frame(&self, p: Point) -> Point {
        let (left, top, width, height) = self.visible_region();
        Point::new(
            (p.x * width + left) / self.frame_width,
            (p.y * height + top) / self.frame_height,
        )
    }

    pub fn corners_to_display(&self, corners: &CardCorners) -> CardCorners {
        corners.map(|p| self.frame_to_display(p))
    }

    /// Display pixel position of a frame-normalized point.
    pub fn to_display_pixels(&self, p: Point) -> Point {
        self.frame_to_display(p).scale(self.display_width, self.display_height)
    }
}
