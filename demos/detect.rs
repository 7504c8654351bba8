use std::error::Error;
use std::env::args;
use std::process;

use lpr_classic::{ Lpr, LprConfig };
use lpr_classic::geometry::BoundingBox;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = args();
    args.next();
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: detect <image> [xmin,ymin,xmax,ymax]");
            process::exit(1);
        }
    };
    let reference = match args.next() {
        Some(s) => Some(s.parse::<BoundingBox>()?),
        None => None,
    };

    let lpr = Lpr::new(LprConfig::default())?;
    let img = image::open(&path)?;
    let res = lpr.recognize(&img, reference, None)?;
    match res.plate {
        Some(plate) => println!("plate: {} area {} aspect {:.2}", plate, plate.area(), plate.aspect()),
        None => println!("no plate found"),
    }
    if let Some(iou) = res.iou {
        println!("Result: {}", iou);
    }
    res.annotated.save("detect_result.png")?;
    Ok(())
}
