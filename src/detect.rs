use image::{ GrayImage, Luma };
use log::{ debug, trace };

use std::collections::VecDeque;

use crate::geometry::BoundingBox;
use crate::image_process::FOREGROUND;
use crate::utils::is_inside;

pub const MIN_ASPECT: f32 = 2.0;
pub const MAX_ASPECT: f32 = 7.0;
/// `x_max - x_min` has to exceed this
pub const MIN_WIDTH_SPAN: i32 = 50;
/// `y_max - y_min` has to exceed this
pub const MIN_HEIGHT_SPAN: i32 = 15;

// up, down, left, right as (row, col) offsets
const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const VISITED: u8 = 1;

/// Shape a connected component must have to count as a plate candidate.
/// The defaults are tuned for photos where a plate is a few hundred pixels wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateFilter {
    pub min_aspect: f32,
    pub max_aspect: f32,
    pub min_width_span: i32,
    pub min_height_span: i32,
}

impl Default for PlateFilter {
    fn default() -> Self {
        Self {
            min_aspect: MIN_ASPECT,
            max_aspect: MAX_ASPECT,
            min_width_span: MIN_WIDTH_SPAN,
            min_height_span: MIN_HEIGHT_SPAN,
        }
    }
}

impl PlateFilter {

    /// All bounds are exclusive.
    pub fn accepts(&self, b: &BoundingBox) -> bool {
        let aspect = b.aspect();
        aspect > self.min_aspect
            && aspect < self.max_aspect
            && b.x_max - b.x_min > self.min_width_span
            && b.y_max - b.y_min > self.min_height_span
    }
}

/// One 4-connected foreground region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    pub bbox: BoundingBox,
    pub pixel_count: u32,
}

/// Find the plate in a binary (0/255) image.
///
/// Every 4-connected foreground component is measured and the largest one, by
/// bounding box area, that `filter` accepts wins. On equal area the one found
/// first in row-major order is kept. Returns `BoundingBox::default()` when no
/// component passes.
pub fn detect_plate(binary: &GrayImage, filter: &PlateFilter) -> BoundingBox {
    let (width, height) = binary.dimensions();
    let mut visited = GrayImage::new(width, height);
    let mut best = BoundingBox::default();
    let mut max_area = 0;

    for y in 0..height {
        for x in 0..width {
            if binary.get_pixel(x, y).0[0] != FOREGROUND || visited.get_pixel(x, y).0[0] != 0 {
                continue;
            }
            let component = flood_fill(binary, &mut visited, x, y);
            let b = component.bbox;
            let area = b.area();
            if area > max_area && filter.accepts(&b) {
                trace!("accepted component {} ({} px, aspect {:.2})", b, component.pixel_count, b.aspect());
                max_area = area;
                best = b;
            } else {
                trace!("rejected component {} ({} px, aspect {:.2})", b, component.pixel_count, b.aspect());
            }
        }
    }

    if best.is_sentinel() {
        debug!("no component passed the plate filter");
    }
    best
}

/// Breadth first fill from (x, y) over unvisited foreground pixels.
/// Pixels are marked in `visited` as they are queued, so none is queued twice.
fn flood_fill(binary: &GrayImage, visited: &mut GrayImage, x: u32, y: u32) -> Component {
    let mut bbox = BoundingBox::at(x as i32, y as i32);
    let mut pixel_count = 0;
    let mut queue = VecDeque::new();

    visited.put_pixel(x, y, Luma([VISITED]));
    queue.push_back((y, x));

    while let Some((row, col)) = queue.pop_front() {
        pixel_count += 1;
        bbox.expand_to_include(col as i32, row as i32);

        for (dr, dc) in NEIGHBOURS.iter() {
            let nr = row as i64 + dr;
            let nc = col as i64 + dc;
            if !is_inside(nr, nc, binary) {
                continue;
            }
            let (nr, nc) = (nr as u32, nc as u32);
            if binary.get_pixel(nc, nr).0[0] == FOREGROUND && visited.get_pixel(nc, nr).0[0] == 0 {
                visited.put_pixel(nc, nr, Luma([VISITED]));
                queue.push_back((nr, nc));
            }
        }
    }

    Component { bbox, pixel_count }
}


#[cfg(test)]
mod test {

    use image::{ GrayImage, Luma };

    use super::{ detect_plate, flood_fill, PlateFilter };
    use crate::geometry::BoundingBox;

    fn fill(img: &mut GrayImage, b: &BoundingBox) {
        for y in b.y_min..=b.y_max {
            for x in b.x_min..=b.x_max {
                img.put_pixel(x as u32, y as u32, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_image_gives_sentinel() {
        let img = GrayImage::new(120, 80);
        let b = detect_plate(&img, &PlateFilter::default());
        assert!(b.is_sentinel());
        assert_eq!(b, BoundingBox::new(0, 0, 0, 0));
    }

    #[test]
    fn single_rectangle_is_found_exactly() {
        let mut img = GrayImage::new(200, 100);
        // 101 wide, 30 high
        let plate = BoundingBox::new(40, 20, 140, 49);
        fill(&mut img, &plate);
        assert!((plate.aspect() - 101.0 / 30.0).abs() < 1e-6);
        assert_eq!(detect_plate(&img, &PlateFilter::default()), plate);
    }

    #[test]
    fn block_at_rows_5_to_24() {
        let mut img = GrayImage::new(80, 40);
        fill(&mut img, &BoundingBox::new(5, 5, 64, 24));
        let b = detect_plate(&img, &PlateFilter::default());
        assert_eq!(b, BoundingBox::new(5, 5, 64, 24));
        assert_eq!(b.area(), 1200);
    }

    #[test]
    fn bigger_candidate_wins() {
        let mut img = GrayImage::new(300, 200);
        fill(&mut img, &BoundingBox::new(10, 10, 80, 35));
        fill(&mut img, &BoundingBox::new(100, 100, 260, 150));
        assert_eq!(detect_plate(&img, &PlateFilter::default()), BoundingBox::new(100, 100, 260, 150));
    }

    #[test]
    fn first_found_wins_a_tie() {
        let mut img = GrayImage::new(200, 120);
        let upper = BoundingBox::new(100, 10, 179, 39);
        let lower = BoundingBox::new(5, 60, 84, 89);
        fill(&mut img, &lower);
        fill(&mut img, &upper);
        assert_eq!(upper.area(), lower.area());
        assert_eq!(detect_plate(&img, &PlateFilter::default()), upper);
    }

    #[test]
    fn shape_filter_rejects() {
        let filter = PlateFilter::default();
        let cases = [
            // square
            BoundingBox::new(10, 10, 89, 89),
            // too thin, aspect above 7
            BoundingBox::new(0, 0, 159, 19),
            // x span of exactly 50
            BoundingBox::new(10, 10, 60, 25),
            // y span of exactly 15
            BoundingBox::new(10, 10, 70, 25),
            // aspect exactly 2
            BoundingBox::new(0, 0, 79, 39),
        ];
        for b in cases.iter() {
            let mut img = GrayImage::new(200, 120);
            fill(&mut img, b);
            assert!(detect_plate(&img, &filter).is_sentinel(), "{} should be rejected", b);
        }
    }

    #[test]
    fn filter_can_be_loosened() {
        let mut img = GrayImage::new(64, 32);
        let small = BoundingBox::new(2, 2, 21, 9);
        fill(&mut img, &small);
        assert!(detect_plate(&img, &PlateFilter::default()).is_sentinel());

        let loose = PlateFilter { min_width_span: 5, min_height_span: 3, ..PlateFilter::default() };
        assert_eq!(detect_plate(&img, &loose), small);
    }

    #[test]
    fn diagonal_pixels_are_not_connected() {
        // two blocks that only touch at a corner
        let mut img = GrayImage::new(200, 100);
        fill(&mut img, &BoundingBox::new(0, 0, 59, 19));
        fill(&mut img, &BoundingBox::new(60, 20, 119, 39));
        assert_eq!(detect_plate(&img, &PlateFilter::default()), BoundingBox::new(0, 0, 59, 19));
    }

    #[test]
    fn component_touching_image_edges() {
        let mut img = GrayImage::new(90, 25);
        let whole = BoundingBox::new(0, 0, 89, 24);
        fill(&mut img, &whole);
        assert_eq!(detect_plate(&img, &PlateFilter::default()), whole);
    }

    #[test]
    fn ring_bbox_and_count() {
        // hollow 70x20 outline, one pixel thick
        let mut img = GrayImage::new(100, 40);
        let outer = BoundingBox::new(10, 10, 79, 29);
        fill(&mut img, &outer);
        for y in 11..29 {
            for x in 11..79 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        let mut visited = GrayImage::new(100, 40);
        let component = flood_fill(&img, &mut visited, 10, 10);
        assert_eq!(component.bbox, outer);
        assert_eq!(component.pixel_count, 2 * 70 + 2 * 18);
        assert_eq!(visited.pixels().filter(|p| p.0[0] != 0).count(), 176);
    }

    #[test]
    fn non_255_values_are_background() {
        let mut img = GrayImage::from_pixel(100, 40, Luma([254]));
        fill(&mut img, &BoundingBox::new(10, 10, 79, 29));
        assert_eq!(detect_plate(&img, &PlateFilter::default()), BoundingBox::new(10, 10, 79, 29));
    }
}
