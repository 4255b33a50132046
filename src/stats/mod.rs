//! Statistics module - relationship between the two measures

mod calculator;

pub use calculator::{Correlation, StatsCalculator};
