//! Chart Plotter Module
//! Projects numeric columns into chart series and draws them with egui_plot.

use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot};
use polars::prelude::*;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Fraction of each row slot covered by bars
const GROUP_WIDTH: f64 = 0.8;

/// Values of one column, one entry per table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub column: String,
    pub values: Vec<Option<f64>>,
}

/// Creates bar charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Project the selected columns of `df` into chart series.
    ///
    /// Series follow table column order. Names not present in the table are
    /// skipped; column types are not checked.
    pub fn series_for(df: &DataFrame, columns: &[String]) -> PolarsResult<Vec<ChartSeries>> {
        let mut series = Vec::with_capacity(columns.len());

        for column in df.get_columns() {
            let name = column.name().as_str();
            if !columns.iter().any(|c| c == name) {
                continue;
            }

            let values = column.cast(&DataType::Float64)?;
            series.push(ChartSeries {
                column: name.to_string(),
                values: values.as_materialized_series().f64()?.into_iter().collect(),
            });
        }

        Ok(series)
    }

    /// Get color for the series at `index`.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw grouped bars: X-axis row index, one bar per series.
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, series: &[ChartSeries]) {
        let bar_width = GROUP_WIDTH / series.len().max(1) as f64;

        Plot::new(format!("bar_chart_{}", id))
            .height(300.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Row")
            .y_axis_label("Value")
            .show(ui, |plot_ui| {
                for (idx, s) in series.iter().enumerate() {
                    let offset = -GROUP_WIDTH / 2.0 + bar_width * (idx as f64 + 0.5);
                    let color = Self::series_color(idx);

                    let bars: Vec<Bar> = s
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(row, value)| {
                            value.map(|v| {
                                Bar::new(row as f64 + offset, v)
                                    .width(bar_width)
                                    .fill(color)
                            })
                        })
                        .collect();

                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(&s.column));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataFrame {
        df!(
            "a" => [Some(1i64), None, Some(3)],
            "label" => ["x", "y", "z"],
            "b" => [0.5f64, 1.5, 2.5]
        )
        .unwrap()
    }

    #[test]
    fn projects_selected_columns_in_table_order() {
        let selection = vec!["b".to_string(), "a".to_string()];
        let series = ChartPlotter::series_for(&table(), &selection).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].column, "a");
        assert_eq!(series[0].values, vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(series[1].column, "b");
        assert_eq!(series[1].values.len(), 3);
    }

    #[test]
    fn empty_selection_yields_no_series() {
        let series = ChartPlotter::series_for(&table(), &[]).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn unknown_names_are_skipped() {
        let selection = vec!["missing".to_string()];
        let series = ChartPlotter::series_for(&table(), &selection).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn colors_cycle_through_palette() {
        assert_eq!(ChartPlotter::series_color(0), PALETTE[0]);
        assert_eq!(ChartPlotter::series_color(PALETTE.len() + 1), PALETTE[1]);
    }
}
