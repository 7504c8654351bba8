use std::error::Error;
use std::env::args;
use std::process;
use std::time::Instant;
use std::fs;

use lpr_classic::{ Lpr, LprConfig };

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = args();
    args.next();
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("didn't get a directory from args");
            process::exit(1);
        }
    };
    let lpr = Lpr::new(LprConfig::default())?;
    let dir = fs::read_dir(path)?;

    let mut speeds = Vec::new();
    let mut total_amount = 0;
    let mut found = 0;
    for entry in dir.flatten() {
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "jpg") {
            continue;
        }
        let start = Instant::now();
        let img = image::open(&path)?;
        let plate = lpr.detect(&img)?;
        let speed = start.elapsed().as_millis();
        total_amount += 1;
        speeds.push(speed);
        if !plate.is_sentinel() {
            found += 1;
        }
        println!("file: {:?}, plate: {}, speed: {}ms", path, plate, speed);
    }
    if total_amount == 0 {
        println!("no jpg files found");
        return Ok(());
    }
    let average_speed = speeds.iter().sum::<u128>() / speeds.len() as u128;
    println!("total_amount: {}, found: {}, average_speed: {}ms", total_amount, found, average_speed);
    Ok(())
}
