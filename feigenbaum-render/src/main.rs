extern crate argparse;
extern crate serde_json;
extern crate time;

extern crate feigenbaum;

use std::cmp::max;
use std::io;
use std::io::Write;

use argparse::{ArgumentParser, Store, StoreTrue};

use feigenbaum::fixed::FixedPoint;
use feigenbaum::logistic::{render_sweep, SamplePoint, SweepConf};
use feigenbaum::ppm;

fn main() -> io::Result<()> {
    let mut width: u32 = 1024;
    let mut height: u32 = 1024;
    let mut warmup: u32 = 10000;
    let mut points: u32 = 100;
    let mut k_start: f64 = 0.0;
    let mut k_end: f64 = 4.0;
    let mut use_float = false;
    let mut dump_samples = false;
    let mut output_fname = String::new();
    {
        let mut argparse = ArgumentParser::new();
        argparse.set_description(
            "Render the bifurcation diagram of the logistic map as PGM and PNG",
        );
        argparse.refer(&mut width).add_option(
            &["--width"],
            Store,
            "Width in pixels of the output image, one k value per column (default 1024)",
        );
        argparse.refer(&mut height).add_option(
            &["--height"],
            Store,
            "Height in pixels of the output image (default 1024)",
        );
        argparse.refer(&mut warmup).add_option(
            &["--warmup"],
            Store,
            "Iterations discarded per column while settling to the attractor (default 10000)",
        );
        argparse.refer(&mut points).add_option(
            &["--points"],
            Store,
            "Iterations plotted per column after warmup (default 100)",
        );
        argparse.refer(&mut k_start).add_option(
            &["--k-start"],
            Store,
            "Lower bound of the k sweep (default 0)",
        );
        argparse.refer(&mut k_end).add_option(
            &["--k-end"],
            Store,
            "Upper bound of the k sweep, at most 4 (default 4)",
        );
        argparse.refer(&mut use_float).add_option(
            &["--float"],
            StoreTrue,
            "Iterate with native f64 instead of the fixed-point backend",
        );
        argparse.refer(&mut dump_samples).add_option(
            &["--dump"],
            StoreTrue,
            "Write every sampled point to stdout as a JSON line instead of progress output",
        );
        argparse.refer(&mut output_fname).add_option(
            &["-o", "--output"],
            Store,
            "Path of the output PGM (default is a timestamped name)",
        );
        argparse.parse_args_or_exit();
    }
    if output_fname.is_empty() {
        output_fname = time::strftime("feigenbaum%Y-%m-%d_%H:%M:%S.pgm", &time::now()).unwrap();
    }

    let conf = SweepConf {
        k_start: k_start,
        k_end: k_end,
        width: width,
        height: height,
        warmup: warmup,
        points: points,
    };
    let backend = if use_float { "f64" } else { "fixed-point" };
    println!(
        "Rendering {}x{} bifurcation diagram, k in [{}, {}), {} backend",
        width, height, k_start, k_end, backend
    );

    let mut img = ppm::Img::new(height as i64, width as i64);
    {
        let progress_every = max(width / 100, 1);
        let mut last_column = None;
        let mut plot = |p: SamplePoint| {
            if dump_samples {
                println!("{}", serde_json::to_string(&p).unwrap());
            } else if last_column != Some(p.column) {
                last_column = Some(p.column);
                if p.column % progress_every == 0 {
                    print!("{}%\r", ((p.column as f64 / width as f64) * 100.0) as u32);
                    io::stdout().flush().unwrap();
                }
            }
            img.incr_px(p.column as i64, p.row as i64);
        };
        if use_float {
            render_sweep::<f64, _>(&conf, &mut plot);
        } else {
            render_sweep::<FixedPoint, _>(&conf, &mut plot);
        }
    }
    if !dump_samples {
        println!("");
    }
    println!("Finished coming up with pixel values");

    ppm::write_pgm(&img, output_fname.clone())?;

    let parts: Vec<&str> = output_fname.split(".").collect();
    let pngname = if parts.len() > 1 {
        parts[0..parts.len() - 1].join(".") + ".png"
    } else {
        output_fname.clone() + ".png"
    };
    ppm::write_png(&img, pngname.clone())?;

    println!("Wrote {} and {}", output_fname, pngname);
    Ok(())
}
