//! `logistic` is the module driving the bifurcation sweep: it iterates the
//! logistic map x[n+1] = k * x[n] * (1 - x[n]) for each pixel column of the
//! diagram and converts the steady-state iterates into pixel coordinates.
//! The driver is generic over the arithmetic backend so the exact
//! fixed-point renderer and the plain floating-point renderer share all of
//! this code.

use std::ops::{Add, Mul, Sub};

use fixed::FixedPoint;

/// The arithmetic capability set the sweep needs from a numeric backend:
/// the three map operators, division by a small integer for the k step
/// size, and conversion of an x in [0, 1) into a pixel offset.
///
/// Valid inputs are k in [0, 4) and x in [0, 1); outside that domain the
/// logistic map leaves [0, 1) and the fixed-point backend's range checks
/// will abort the run. The driver does not re-check the domain itself.
pub trait Arith
where
    Self: Copy + PartialEq + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>,
{
    fn one() -> Self;
    fn half() -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    /// `self / n`, truncating.
    fn div_int(self, n: u32) -> Self;
    /// `self * scale`, truncated to a plain integer. For x in [0, 1) the
    /// result is always in [0, scale).
    fn to_pixel(self, scale: u32) -> u32;
}

impl Arith for FixedPoint {
    fn one() -> FixedPoint {
        FixedPoint::ONE
    }
    fn half() -> FixedPoint {
        FixedPoint::HALF
    }
    fn from_f64(v: f64) -> FixedPoint {
        FixedPoint::from_f64(v)
    }
    fn to_f64(self) -> f64 {
        FixedPoint::to_f64(self)
    }
    fn div_int(self, n: u32) -> FixedPoint {
        self / n
    }
    fn to_pixel(self, scale: u32) -> u32 {
        self * scale
    }
}

impl Arith for f64 {
    fn one() -> f64 {
        1.0
    }
    fn half() -> f64 {
        0.5
    }
    fn from_f64(v: f64) -> f64 {
        v
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn div_int(self, n: u32) -> f64 {
        self / n as f64
    }
    fn to_pixel(self, scale: u32) -> u32 {
        (self * scale as f64) as u32
    }
}

/// A lazy, unbounded sequence of successive logistic-map iterates for one
/// parameter value k. The caller decides how many steps to consume; a fresh
/// trajectory restarts from its seed.
pub struct Trajectory<T: Arith> {
    k: T,
    x: T,
}

impl<T: Arith> Trajectory<T> {
    pub fn new(k: T, x0: T) -> Trajectory<T> {
        Trajectory { k: k, x: x0 }
    }

    /// One map step: x <- k * x * (1 - x). Returns the new x.
    pub fn advance(&mut self) -> T {
        self.x = self.k * self.x * (T::one() - self.x);
        self.x
    }
}

impl<T: Arith> Iterator for Trajectory<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> {
        Some(self.advance())
    }
}

/// Sweep parameters. `k_start`/`k_end` bound the parameter axis, `width`
/// columns are rendered across it, and each column discards `warmup`
/// iterates before emitting `points` sampled ones.
#[derive(Copy, Clone, Debug)]
pub struct SweepConf {
    pub k_start: f64,
    pub k_end: f64,
    pub width: u32,
    pub height: u32,
    pub warmup: u32,
    pub points: u32,
}

/// One sampled point of the diagram. `column`/`row` address the canvas;
/// the k and x that produced them ride along (as floats, losing nothing a
/// JSON consumer would care about) so dumped samples are self-describing.
#[derive(Serialize, Deserialize, Copy, Clone, Debug)]
pub struct SamplePoint {
    pub column: u32,
    pub row: u32,
    pub k: f64,
    pub x: f64,
}

/// Run the full sweep, handing every sampled point to `emit` in
/// column-major, then-iteration order.
///
/// Per column: the trajectory restarts from x0 = 1/2, runs `warmup` steps
/// to settle toward the attractor, then `points` more steps are sampled and
/// mapped to rows with row 0 at the top (so larger x plots higher). After
/// each column k advances by `(k_end - k_start) / width`, computed in the
/// backend's own arithmetic so the two backends sweep identical grids up to
/// their representation.
pub fn render_sweep<T, F>(conf: &SweepConf, mut emit: F)
where
    T: Arith,
    F: FnMut(SamplePoint),
{
    assert!(conf.width > 0, "sweep needs at least one column");
    assert!(conf.height > 0, "sweep needs at least one row");
    assert!(conf.k_start < conf.k_end, "empty k range");

    let start = T::from_f64(conf.k_start);
    let end = T::from_f64(conf.k_end);
    let step = (end - start).div_int(conf.width);

    let mut k = start;
    for column in 0..conf.width {
        let mut traj = Trajectory::new(k, T::half());
        for _ in 0..conf.warmup {
            traj.advance();
        }
        for _ in 0..conf.points {
            let x = traj.advance();
            let row = (conf.height - 1) - x.to_pixel(conf.height);
            emit(SamplePoint {
                column: column,
                row: row,
                k: k.to_f64(),
                x: x.to_f64(),
            });
        }
        k = k + step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::FixedPoint;

    fn sweep_samples<T: Arith>(conf: &SweepConf) -> Vec<SamplePoint> {
        let mut samples = Vec::new();
        render_sweep::<T, _>(conf, |p| samples.push(p));
        samples
    }

    #[test]
    fn trajectory_iterates_the_map_lazily() {
        // k = 2, x0 = 0.1: 2 * 0.1 * 0.9 = 0.18, then 2 * 0.18 * 0.82 = 0.2952.
        let xs: Vec<f64> = Trajectory::new(2.0f64, 0.1f64).take(2).collect();
        assert!((xs[0] - 0.18).abs() < 1e-12);
        assert!((xs[1] - 0.2952).abs() < 1e-12);
    }

    #[test]
    fn four_column_sweep_emits_known_values() {
        // start=0, end=4, width=4, warmup=0, points=1, x0=1/2 visits
        // k = 0, 1, 2, 3 and yields x = 0, 1/4, 1/2, 3/4 exactly.
        let conf = SweepConf {
            k_start: 0.0,
            k_end: 4.0,
            width: 4,
            height: 4,
            warmup: 0,
            points: 1,
        };
        for samples in [
            sweep_samples::<FixedPoint>(&conf),
            sweep_samples::<f64>(&conf),
        ]
        .iter()
        {
            let xs: Vec<f64> = samples.iter().map(|p| p.x).collect();
            assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75]);
            let pixels: Vec<(u32, u32)> = samples.iter().map(|p| (p.column, p.row)).collect();
            assert_eq!(pixels, vec![(0, 3), (1, 2), (2, 1), (3, 0)]);
        }
    }

    #[test]
    fn backends_agree_in_the_periodic_regime() {
        // At k = 3.2 the map settles onto a stable 2-cycle, so truncation
        // differences between the backends contract instead of compounding.
        // Both backends start from bit-identical k and x0 (3.2 and 1/2 are
        // exactly representable in 61 fractional bits).
        let mut exact = Trajectory::new(FixedPoint::from_f64(3.2), FixedPoint::HALF);
        let mut float = Trajectory::new(3.2f64, 0.5f64);
        let mut xe = 0.0;
        let mut xf = 0.0;
        for _ in 0..10000 {
            xe = exact.advance().to_f64();
            xf = float.advance();
        }
        assert!((xe - xf).abs() < 1e-6, "fixed {} vs float {}", xe, xf);
    }

    #[test]
    fn backends_agree_over_a_short_chaotic_run() {
        // In the chaotic regime truncation error compounds by up to |k(1-2x)|
        // per iterate, so only a short run can be compared, and loosely.
        let mut exact = Trajectory::new(FixedPoint::from_f64(3.9), FixedPoint::HALF);
        let mut float = Trajectory::new(3.9f64, 0.5f64);
        for step in 0..20 {
            let xe = exact.advance().to_f64();
            let xf = float.advance();
            assert!((xe - xf).abs() < 1e-6, "diverged at step {}: {} vs {}", step, xe, xf);
        }
    }

    #[test]
    fn rows_stay_on_the_canvas_near_the_chaotic_edge() {
        let conf = SweepConf {
            k_start: 3.5,
            k_end: 4.0,
            width: 16,
            height: 64,
            warmup: 50,
            points: 50,
        };
        for p in sweep_samples::<FixedPoint>(&conf) {
            assert!(p.row < conf.height, "row {} for k {}", p.row, p.k);
            assert!(p.column < conf.width);
        }
    }

    #[test]
    fn identical_sweeps_are_bit_identical() {
        let conf = SweepConf {
            k_start: 2.8,
            k_end: 4.0,
            width: 32,
            height: 128,
            warmup: 500,
            points: 20,
        };
        let first: Vec<(u32, u32)> = sweep_samples::<FixedPoint>(&conf)
            .iter()
            .map(|p| (p.column, p.row))
            .collect();
        let second: Vec<(u32, u32)> = sweep_samples::<FixedPoint>(&conf)
            .iter()
            .map(|p| (p.column, p.row))
            .collect();
        assert_eq!(first, second);
    }
}
