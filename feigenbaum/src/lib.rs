extern crate image;
extern crate serde;

#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate num;

pub mod fixed;
pub mod logistic;
pub mod ppm;
