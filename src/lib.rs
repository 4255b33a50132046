//! Health Scatter - poverty vs. healthcare scatter chart
//!
//! Loads a per-state CSV, lays out a responsive scatter chart and renders it
//! through interchangeable backends: an interactive egui window, SVG and PNG.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;
