use clap::{Arg, App};
use log::error;

use std::error::Error;

use lpr_classic::{ Lpr, LprConfig };
use lpr_classic::geometry::BoundingBox;
use lpr_classic::image_process::GrayscaleWeights;
use lpr_classic::utils;


fn main() -> Result<(), Box<dyn Error>>{
    let matches = App::new("lpr-classic")
                    .version("0.1.0")
                    .author("kingrong")
                    .about("Locate a license plate with edge detection and connected components")
                    .arg(Arg::with_name("INPUT")
                        .help("image file with license plate")
                        .required(true)
                        .index(1))
                    .arg(Arg::with_name("reference")
                        .long("reference")
                        .short("r")
                        .takes_value(true)
                        .value_name("XMIN,YMIN,XMAX,YMAX")
                        .help("hand labelled plate box to score the detection against"))
                    .arg(Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .value_name("FILE")
                        .help("write the input with the boxes drawn on it"))
                    .arg(Arg::with_name("stages")
                        .long("stages")
                        .takes_value(true)
                        .value_name("DIR")
                        .help("write every intermediate image into DIR"))
                    .arg(Arg::with_name("blur")
                        .long("blur")
                        .takes_value(true)
                        .default_value("5")
                        .help("box blur window size, odd"))
                    .arg(Arg::with_name("threshold")
                        .long("threshold")
                        .short("t")
                        .takes_value(true)
                        .default_value("100")
                        .help("edge strength a pixel must exceed to be foreground"))
                    .arg(Arg::with_name("gray")
                        .long("gray")
                        .takes_value(true)
                        .possible_values(&["luminance", "average"])
                        .default_value("luminance")
                        .help("how color channels are folded into intensity"))
                    .arg(Arg::with_name("font")
                        .long("font")
                        .takes_value(true)
                        .value_name("TTF")
                        .help("font for the IoU label on the output image"))
                    .arg(Arg::with_name("log-level")
                        .long("log-level")
                        .takes_value(true)
                        .default_value("info")
                        .help("log spec, overridden by RUST_LOG"))
                    .get_matches();

    let _logger = utils::setup_logging(matches.value_of("log-level").unwrap_or("info"))?;

    let file_name = matches.value_of("INPUT").ok_or("image is required")?;
    let weights = match matches.value_of("gray") {
        Some("average") => GrayscaleWeights::Average,
        _ => GrayscaleWeights::Luminance,
    };
    let config = LprConfig {
        weights,
        blur_size: matches.value_of("blur").unwrap_or("5").parse()?,
        edge_threshold: matches.value_of("threshold").unwrap_or("100").parse()?,
        ..LprConfig::default()
    };
    let reference = match matches.value_of("reference") {
        Some(s) => Some(s.parse::<BoundingBox>()?),
        None => None,
    };
    let font = match matches.value_of("font") {
        Some(path) => Some(utils::load_font(path)?),
        None => None,
    };

    let lpr = Lpr::new(config)?;
    let img = image::open(file_name).map_err(|e| {
        error!("cannot open {}: {}", file_name, e);
        e
    })?;

    let res = match matches.value_of("stages") {
        Some(dir) => {
            let stages = lpr.stages(&img)?;
            stages.save(dir)?;
            lpr_classic::annotate(&img, stages.plate, reference, font.as_ref())
        }
        None => lpr.recognize(&img, reference, font.as_ref())?,
    };
    match (res.iou, res.plate) {
        (Some(iou), _) => println!("Result: {}", iou),
        (None, Some(plate)) => println!("plate: {}", plate),
        (None, None) => println!("no plate found"),
    }

    if let Some(output) = matches.value_of("output") {
        res.annotated.save(output)?;
    }

    Ok(())
}
