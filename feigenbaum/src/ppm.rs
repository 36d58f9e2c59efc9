use std;
use std::f64::consts;
use std::fs::File;
use std::io;
use std::io::Write;

use image;

/// The Img struct is the simplest possible implementation of an image: a two
/// dimensional array of pixels, each pixel a single integer counting how
/// many sampled trajectory points landed on it. A bifurcation diagram is
/// monochrome, so one channel is all there is; brightness comes from the
/// hit counts, which show how densely the attractor visits each row.
#[derive(Clone)]
pub struct Img {
    height: i64,
    width: i64,
    maximum: i64,
    pixels: Vec<i64>,
}

// This fexp scaling function is taken from here: https://www.brodie-tyrrell.org/bbrot/
pub fn fexp(x: f64, factor: f64) -> f64 {
    1.0 - (consts::E.powf(-factor * x))
}

impl Img {
    pub fn new(h: i64, w: i64) -> Img {
        Img {
            height: h,
            width: w,
            maximum: 1,
            pixels: vec![0; (h * w) as usize],
        }
    }
    pub fn width(&self) -> i64 {
        self.width
    }
    pub fn height(&self) -> i64 {
        self.height
    }
    pub fn incr_px(&mut self, x: i64, y: i64) {
        if x < self.width && x >= 0 {
            if y < self.height && y >= 0 {
                let px = self.pixels[((self.width * y) + x) as usize] + 1;
                if px > self.maximum {
                    self.maximum = px
                }
                self.pixels[((self.width * y) + x) as usize] = px;
            }
        }
    }
    pub fn pix_val(&self, x: i64, y: i64) -> i64 {
        self.pixels[((self.width * y) + x) as usize]
    }
    /// Returns the pixel specified scaled to a u8 by passing the raw value of
    /// the pixel and the maximum pixel value within the image to delegate.
    /// `delegate` must return a floating point value between 0.0 and 1.0,
    /// inclusive.
    pub fn scaled_pix_delegate<F>(&self, x: i64, y: i64, delegate: F) -> u8
    where
        F: Fn(f64, f64) -> f64,
    {
        let val = self.pixels[((self.width * y) + x) as usize] as f64;
        (delegate(val, self.maximum as f64) * 255.0) as u8
    }
    pub fn scaled_pix_val(&self, x: i64, y: i64) -> u8 {
        self.scaled_pix_delegate(x, y, |val, mx| fexp(val, 0.050) / fexp(mx, 0.050))
    }
}

// write_pgm writes a plain Portable Graymap (P2) with the raw hit counts,
// the exact-reproducibility output: identical sweeps give byte-identical
// files.
pub fn write_pgm(img: &Img, fname: String) -> io::Result<()> {
    let mut pgm = std::io::BufWriter::new(File::create(fname.as_str())?);

    write!(pgm, "P2\n# Created by feigenbaum\n")?;
    write!(pgm, "{} {}\n", img.width, img.height)?;
    write!(pgm, "{}\n", img.maximum)?;
    for y in 0..img.height {
        for x in 0..img.width {
            write!(pgm, "{} ", img.pix_val(x, y))?;
        }
        write!(pgm, "\n")?;
    }
    Ok(())
}

// write_scaled_png writes the image as a grayscale PNG with each pixel's
// brightness scaled by `scale_func`, which maps (value, maximum) to [0, 1].
pub fn write_scaled_png<F>(img: &Img, fname: String, scale_func: F) -> io::Result<()>
where
    F: Fn(f64, f64) -> f64,
{
    let mut imgbuf = image::GrayImage::new(img.width as u32, img.height as u32);
    for (x, y, pixel) in imgbuf.enumerate_pixels_mut() {
        *pixel = image::Luma([img.scaled_pix_delegate(x as i64, y as i64, &scale_func)]);
    }
    imgbuf
        .save(fname.as_str())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

pub fn write_png(img: &Img, fname: String) -> io::Result<()> {
    write_scaled_png(img, fname, |val, mx| fexp(val, 0.050) / fexp(mx, 0.050))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_counts_accumulate_and_track_the_maximum() {
        let mut img = Img::new(4, 8);
        img.incr_px(3, 2);
        img.incr_px(3, 2);
        img.incr_px(0, 0);
        assert_eq!(img.pix_val(3, 2), 2);
        assert_eq!(img.pix_val(0, 0), 1);
        assert_eq!(img.pix_val(1, 1), 0);
        // The brightest pixel scales to full white.
        assert_eq!(img.scaled_pix_val(3, 2), 255);
        assert_eq!(img.scaled_pix_val(1, 1), 0);
    }

    #[test]
    fn out_of_range_hits_are_dropped() {
        let mut img = Img::new(4, 8);
        img.incr_px(-1, 0);
        img.incr_px(8, 0);
        img.incr_px(0, 4);
        for y in 0..4 {
            for x in 0..8 {
                assert_eq!(img.pix_val(x, y), 0);
            }
        }
    }

    #[test]
    fn fexp_scaling_is_monotonic_and_bounded() {
        let mut prev = fexp(0.0, 0.05);
        assert_eq!(prev, 0.0);
        for v in 1..100 {
            let cur = fexp(v as f64, 0.05);
            assert!(cur > prev && cur < 1.0);
            prev = cur;
        }
    }
}
