use crate::error::LprError;

use std::cmp::{max, min};
use std::fmt;
use std::str::FromStr;

/// Axis aligned box in pixel coordinates, x is the column and y the row.
/// Both min and max are inclusive.
///
/// `BoundingBox::default()` (all zero) is what the detector returns when
/// nothing passes the plate filter. It is still a valid box of area 1, so
/// check `is_sentinel` instead of the area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {

    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// box of a single pixel, grown later with `expand_to_include`
    pub fn at(x: i32, y: i32) -> Self {
        Self::new(x, y, x, y)
    }

    pub fn expand_to_include(&mut self, x: i32, y: i32) {
        self.x_min = min(self.x_min, x);
        self.x_max = max(self.x_max, x);
        self.y_min = min(self.y_min, y);
        self.y_max = max(self.y_max, y);
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min + 1
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min + 1
    }

    pub fn area(&self) -> i32 {
        area(self)
    }

    pub fn aspect(&self) -> f32 {
        aspect(self)
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        compute_iou(self, other)
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::default()
    }
}

/// Inclusive pixel count. An inverted box gives a negative number, nothing is clamped.
pub fn area(b: &BoundingBox) -> i32 {
    b.width() * b.height()
}

pub fn aspect(b: &BoundingBox) -> f32 {
    b.width() as f32 / b.height() as f32
}

/// Intersection over union of two boxes, in `[0, 1]`.
pub fn compute_iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let x_a = max(a.x_min, b.x_min);
    let y_a = max(a.y_min, b.y_min);
    let x_b = min(a.x_max, b.x_max);
    let y_b = min(a.y_max, b.y_max);

    let inter_width = max(0, x_b - x_a + 1);
    let inter_height = max(0, y_b - y_a + 1);
    let inter_area = inter_width * inter_height;

    let union_area = area(a) + area(b) - inter_area;
    inter_area as f32 / union_area as f32
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

/// parses `xmin,ymin,xmax,ymax`, the same order `Display` writes
impl FromStr for BoundingBox {
    type Err = LprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<i32>())
            .collect::<Result<Vec<i32>, _>>()
            .map_err(|_| LprError::parse_box(s))?;
        match values[..] {
            [x_min, y_min, x_max, y_max] if x_min <= x_max && y_min <= y_max => {
                Ok(Self::new(x_min, y_min, x_max, y_max))
            }
            _ => Err(LprError::parse_box(s)),
        }
    }
}
