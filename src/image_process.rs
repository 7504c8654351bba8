//! Pixel stages of the pipeline: grayscale, box blur, sobel edges and binary threshold.
//! Every stage returns a new image of the input's size and leaves the input alone.

use image::{ GrayImage, Luma, Rgb, RgbImage };

use crate::utils::is_inside;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

// row offset first, column offset second
const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1],
                                [-2, 0, 2],
                                [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1],
                                [ 0,  0,  0],
                                [ 1,  2,  1]];

/// How the three color channels fold into one intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrayscaleWeights {
    /// 0.299 r + 0.587 g + 0.114 b
    Luminance,
    /// (r + g + b) / 3
    Average,
}

impl Default for GrayscaleWeights {
    fn default() -> Self {
        Self::Luminance
    }
}

impl GrayscaleWeights {

    /// Truncates, never rounds.
    pub fn intensity(self, pixel: &Rgb<u8>) -> u8 {
        let [r, g, b] = pixel.0;
        match self {
            Self::Luminance => (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) as u8,
            Self::Average => ((r as f32 + g as f32 + b as f32) / 3.0) as u8,
        }
    }
}

pub fn grayscale(img: &RgbImage, weights: GrayscaleWeights) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        Luma([weights.intensity(img.get_pixel(x, y))])
    })
}

/// Mean over a `size`x`size` window. Near the border only the pixels inside
/// the image are averaged, so the divisor shrinks instead of padding with zeros.
pub fn box_blur(img: &GrayImage, size: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    let offset = (size / 2) as i64;
    GrayImage::from_fn(width, height, |x, y| {
        let mut sum = 0u32;
        let mut count = 0u32;
        for dy in -offset..=offset {
            for dx in -offset..=offset {
                let row = y as i64 + dy;
                let col = x as i64 + dx;
                if is_inside(row, col, img) {
                    sum += img.get_pixel(col as u32, row as u32).0[0] as u32;
                    count += 1;
                }
            }
        }
        Luma([(sum / count) as u8])
    })
}

/// Gradient magnitude clamped to 255. The outermost ring of pixels is always 0.
pub fn sobel_edge(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut edge = GrayImage::new(width, height);
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for dy in 0..3 {
                for dx in 0..3 {
                    let pixel = img.get_pixel(x + dx - 1, y + dy - 1).0[0] as i32;
                    gx += SOBEL_X[dy as usize][dx as usize] * pixel;
                    gy += SOBEL_Y[dy as usize][dx as usize] * pixel;
                }
            }
            let magnitude = ((gx * gx + gy * gy) as f64).sqrt() as i32;
            edge.put_pixel(x, y, Luma([magnitude.min(255) as u8]));
        }
    }
    edge
}

/// `FOREGROUND` where the pixel is strictly above `t`, `BACKGROUND` otherwise.
pub fn threshold_binary(img: &GrayImage, t: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        if img.get_pixel(x, y).0[0] <= t {
            Luma([BACKGROUND])
        } else {
            Luma([FOREGROUND])
        }
    })
}
