use image::{ DynamicImage, GrayImage, GenericImageView, Rgb, RgbImage };
use log::{ debug, info };
use rusttype::Font;

use std::fs;
use std::path::Path;
use std::time::Instant;

use error::LprError;
use geometry::BoundingBox;
use detect::PlateFilter;
use image_process::GrayscaleWeights;

pub mod utils;
pub mod error;
pub mod geometry;
pub mod image_process;
pub mod detect;

pub use detect::detect_plate;
pub use geometry::{ area, aspect, compute_iou };
pub use image_process::{ box_blur, grayscale, sobel_edge, threshold_binary };


pub const BLUR_SIZE: u32 = 5;
pub const EDGE_THRESHOLD: u8 = 100;
pub const BOX_THICKNESS: u32 = 3;

const REFERENCE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const PLATE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LprConfig {
    pub weights: GrayscaleWeights,
    /// side of the box blur window, odd
    pub blur_size: u32,
    /// edge magnitude a pixel must exceed to be foreground
    pub edge_threshold: u8,
    pub filter: PlateFilter,
}

impl Default for LprConfig {
    fn default() -> Self {
        Self {
            weights: GrayscaleWeights::default(),
            blur_size: BLUR_SIZE,
            edge_threshold: EDGE_THRESHOLD,
            filter: PlateFilter::default(),
        }
    }
}

impl LprConfig {

    pub fn validate(&self) -> Result<(), LprError> {
        if self.blur_size == 0 || self.blur_size % 2 == 0 {
            return Err(LprError::invalid_config(format!("blur size must be odd, got {}", self.blur_size)));
        }
        let filter = &self.filter;
        if !(filter.min_aspect < filter.max_aspect) {
            return Err(LprError::invalid_config(format!(
                "aspect band {}..{} is empty", filter.min_aspect, filter.max_aspect
            )));
        }
        Ok(())
    }
}

/// Every intermediate image of one run, plus the plate found in `binary`.
pub struct Stages {
    pub gray: GrayImage,
    pub blurred: GrayImage,
    pub edge: GrayImage,
    pub binary: GrayImage,
    pub plate: BoundingBox,
}

impl Stages {

    /// Write gray.png, blurred.png, edge.png and binary.png into `dir`.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(), LprError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let images = [
            ("gray", &self.gray),
            ("blurred", &self.blurred),
            ("edge", &self.edge),
            ("binary", &self.binary),
        ];
        for (name, img) in images.iter() {
            let path = dir.join(format!("{}.png", name));
            img.save(&path)?;
            debug!("wrote {}", path.display());
        }
        Ok(())
    }
}

pub struct Recognition {
    /// `None` when nothing passed the plate filter
    pub plate: Option<BoundingBox>,
    /// set when a reference box was given
    pub iou: Option<f32>,
    pub annotated: RgbImage,
}

pub struct Lpr {
    config: LprConfig,
}

impl Lpr {

    pub fn new(config: LprConfig) -> Result<Self, LprError> {
        config.validate()?;
        Ok(Lpr { config })
    }

    pub fn config(&self) -> &LprConfig {
        &self.config
    }

    /// Run every stage on `img`, keeping the intermediate images.
    pub fn stages(&self, img: &DynamicImage) -> Result<Stages, LprError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(error::LprErrorKind::EmptyImage.into());
        }
        let config = &self.config;
        let rgb = img.to_rgb8();

        let start = Instant::now();
        let gray = grayscale(&rgb, config.weights);
        debug!("grayscale {}x{} in {:?}", width, height, start.elapsed());

        let start = Instant::now();
        let blurred = box_blur(&gray, config.blur_size);
        debug!("box blur size {} in {:?}", config.blur_size, start.elapsed());

        let start = Instant::now();
        let edge = sobel_edge(&blurred);
        debug!("sobel in {:?}", start.elapsed());

        let start = Instant::now();
        let binary = threshold_binary(&edge, config.edge_threshold);
        debug!("threshold at {} in {:?}", config.edge_threshold, start.elapsed());

        let start = Instant::now();
        let plate = detect_plate(&binary, &config.filter);
        debug!("plate search in {:?}", start.elapsed());

        Ok(Stages { gray, blurred, edge, binary, plate })
    }

    /// The plate box, `BoundingBox::default()` if there is none.
    pub fn detect(&self, img: &DynamicImage) -> Result<BoundingBox, LprError> {
        let plate = self.stages(img)?.plate;
        if plate.is_sentinel() {
            info!("no plate found");
        } else {
            info!("plate at {}", plate);
        }
        Ok(plate)
    }

    /// `detect` followed by `annotate`.
    pub fn recognize(&self, img: &DynamicImage, reference: Option<BoundingBox>, font: Option<&Font>) -> Result<Recognition, LprError> {
        let detected = self.detect(img)?;
        Ok(annotate(img, detected, reference, font))
    }
}

/// Draw `detected` on a copy of `img` in red and `reference` in green. The
/// sentinel box is not drawn. With a reference the IoU is computed too, and
/// written next to the box when a font is given.
pub fn annotate(img: &DynamicImage, detected: BoundingBox, reference: Option<BoundingBox>, font: Option<&Font>) -> Recognition {
    let plate = if detected.is_sentinel() { None } else { Some(detected) };
    // a missing plate scores against the sentinel box, as the detector reports it
    let iou = reference.map(|r| compute_iou(&r, &detected));

    let mut annotated = img.to_rgb8();
    if let Some(r) = &reference {
        utils::draw_box(&mut annotated, r, REFERENCE_COLOR, BOX_THICKNESS);
    }
    if let Some(p) = &plate {
        utils::draw_box(&mut annotated, p, PLATE_COLOR, BOX_THICKNESS);
    }
    if let (Some(font), Some(iou)) = (font, iou) {
        let anchor = plate.or(reference).unwrap_or_default();
        let text = format!("IoU: {:.3}", iou);
        utils::draw_label(&mut annotated, &anchor, &text, font, PLATE_COLOR);
    }
    if let Some(iou) = iou {
        info!("IoU against reference: {:.4}", iou);
    }

    Recognition { plate, iou, annotated }
}
