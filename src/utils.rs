use flexi_logger::{ Logger, LoggerHandle };
use image::{ GenericImageView, Rgb, RgbImage };
use imageproc::{ drawing, rect::Rect };
use rusttype::{ Font, Scale };

use std::fs;
use std::path::Path;

use crate::error::{ LprError, LprErrorKind };
use crate::geometry::BoundingBox;


/// Start logging to stderr. `RUST_LOG` wins over `level` when it is set.
/// Keep the returned handle alive for as long as the process logs.
pub fn setup_logging(level: &str) -> Result<LoggerHandle, LprError> {
    let handle = Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .start()?;
    Ok(handle)
}

/// Whether (row, col) lies inside `img`. Signed so neighbour offsets may go negative.
pub fn is_inside<I: GenericImageView>(row: i64, col: i64, img: &I) -> bool {
    let (width, height) = img.dimensions();
    row >= 0 && row < height as i64 && col >= 0 && col < width as i64
}

/// Draw a hollow rectangle `thickness` pixels wide, growing inwards from `b`.
pub fn draw_box(canvas: &mut RgbImage, b: &BoundingBox, color: Rgb<u8>, thickness: u32) {
    for t in 0..thickness as i32 {
        let width = b.width() - 2 * t;
        let height = b.height() - 2 * t;
        if width <= 0 || height <= 0 {
            break;
        }
        let rect = Rect::at(b.x_min + t, b.y_min + t).of_size(width as u32, height as u32);
        drawing::draw_hollow_rect_mut(canvas, rect, color);
    }
}

pub fn load_font(path: impl AsRef<Path>) -> Result<Font<'static>, LprError> {
    let data = fs::read(path)?;
    Font::try_from_vec(data).ok_or(LprError::from(LprErrorKind::FontError))
}

/// Write `text` just above `b`, or inside it when the box touches the top edge.
pub fn draw_label(canvas: &mut RgbImage, b: &BoundingBox, text: &str, font: &Font, color: Rgb<u8>) {
    let scale = Scale::uniform(24.0);
    let x = b.x_min.max(0) as u32;
    let y = if b.y_min >= 26 { b.y_min - 26 } else { b.y_min.max(0) + 2 };
    drawing::draw_text_mut(canvas, color, x, y as u32, scale, font, text);
}
