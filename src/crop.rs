use serde::{Deserialize, Serialize};

use crate::render_config::Alignment;

// @module: Aspect-ratio crop geometry

/// Crop window in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRectangle {
    /// Whether the rectangle lies inside a `frame_w` x `frame_h` frame
    pub fn fits_within(&self, frame_w: u32, frame_h: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(frame_w)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(frame_h)
    }
}

/// Computes the largest crop of a frame matching a target aspect ratio
pub struct AspectCropper;

impl AspectCropper {
    /// Compute the crop rectangle for a frame.
    ///
    /// A frame wider than the target loses width and honors `alignment`.
    /// A taller (or equal) frame loses height and is always centered
    /// vertically; alignment has no vertical counterpart.
    ///
    /// Centering uses integer halves, `frame/2 - side/2`, so an odd side on
    /// an even frame sits one pixel right of `(frame - side)/2`. A target too
    /// extreme for the frame still keeps at least one pixel per side.
    pub fn crop(
        frame_w: u32,
        frame_h: u32,
        target_w: f64,
        target_h: f64,
        alignment: Alignment,
    ) -> CropRectangle {
        let (fw, fh) = (f64::from(frame_w), f64::from(frame_h));

        // Cross-multiplied so integer inputs compare and truncate exactly
        if fw * target_h > target_w * fh {
            let new_w = ((fh * target_w / target_h) as u32).clamp(1, frame_w.max(1));
            let x = match alignment {
                Alignment::Left => 0,
                Alignment::Right => frame_w.saturating_sub(new_w),
                Alignment::None => (frame_w / 2).saturating_sub(new_w / 2),
            };
            CropRectangle {
                x,
                y: 0,
                width: new_w,
                height: frame_h,
            }
        } else {
            let new_h = ((fw * target_h / target_w) as u32).clamp(1, frame_h.max(1));
            CropRectangle {
                x: 0,
                y: (frame_h / 2).saturating_sub(new_h / 2),
                width: frame_w,
                height: new_h,
            }
        }
    }
}
