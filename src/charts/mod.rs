//! Charts module - Chart series and rendering

mod plotter;

pub use plotter::{ChartPlotter, ChartSeries};
