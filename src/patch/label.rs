// file: src/patch/label.rs
// description: defect fraction of mask patches and OK/KO classification

use image::{DynamicImage, ImageBuffer, Pixel, Primitive, Rgb};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DefectLabel {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "KO")]
    Ko,
}

impl DefectLabel {
    /// Strictly above the threshold is defective; exactly at it is not.
    pub fn classify(defect_fraction: f64, threshold: f64) -> Self {
        if defect_fraction > threshold {
            DefectLabel::Ko
        } else {
            DefectLabel::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefectLabel::Ok => "OK",
            DefectLabel::Ko => "KO",
        }
    }
}

impl fmt::Display for DefectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share of mask pixels with any nonzero colour channel, at the mask's own bit
/// depth. Alpha is ignored.
pub fn defect_fraction(mask_patch: &DynamicImage) -> f64 {
    let total = mask_patch.width() as usize * mask_patch.height() as usize;
    if total == 0 {
        return 0.0;
    }

    let defective = match mask_patch {
        DynamicImage::ImageLuma8(buffer) => count_defective(buffer),
        DynamicImage::ImageLumaA8(buffer) => count_defective(buffer),
        DynamicImage::ImageRgb8(buffer) => count_defective(buffer),
        DynamicImage::ImageRgba8(buffer) => count_defective(buffer),
        DynamicImage::ImageLuma16(buffer) => count_defective(buffer),
        DynamicImage::ImageLumaA16(buffer) => count_defective(buffer),
        DynamicImage::ImageRgb16(buffer) => count_defective(buffer),
        DynamicImage::ImageRgba16(buffer) => count_defective(buffer),
        DynamicImage::ImageRgb32F(buffer) => count_defective(buffer),
        DynamicImage::ImageRgba32F(buffer) => count_defective(buffer),
        other => count_defective(&other.to_rgba32f()),
    };
    defective as f64 / total as f64
}

fn count_defective<P: Pixel>(buffer: &ImageBuffer<P, Vec<P::Subpixel>>) -> usize
where
    Rgb<P::Subpixel>: Pixel<Subpixel = P::Subpixel>,
{
    let background = <P::Subpixel as Primitive>::DEFAULT_MIN_VALUE;
    buffer
        .pixels()
        .filter(|pixel| pixel.to_rgb().channels().iter().any(|&c| c != background))
        .count()
}
