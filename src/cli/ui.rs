use crate::core::Trend;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Headline,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Headline => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Colours a percentage badge by trend and appends an arrow.
pub fn trend_badge(text: &str, trend: Trend) -> String {
    match trend {
        Trend::Up => style(format!("({text} ▲)")).green().to_string(),
        Trend::Down => style(format!("({text} ▼)")).red().to_string(),
        Trend::Flat => style(format!("({text})")).dim().to_string(),
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn amount_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// A right-aligned green cell, used for cashback earned.
pub fn earned_cell(text: String) -> Cell {
    Cell::new(text)
        .fg(Color::Green)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64, message: &str) -> ProgressBar {
    let template = "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}";
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders a series as a one-line sparkline, scaled between its min and max.
pub fn sparkline(values: &[Decimal]) -> String {
    let points: Vec<f64> = values.iter().filter_map(|v| v.to_f64()).collect();
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    points
        .iter()
        .map(|v| {
            if span <= 0.0 {
                SPARK_LEVELS[0]
            } else {
                let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_scales_between_min_and_max() {
        let values: Vec<Decimal> = [0, 2, 7].iter().map(|v| Decimal::from(*v)).collect();
        assert_eq!(sparkline(&values), "▁▃█");
    }

    #[test]
    fn test_sparkline_flat_and_empty() {
        let values = vec![Decimal::from(5), Decimal::from(5)];
        assert_eq!(sparkline(&values), "▁▁");
        assert_eq!(sparkline(&[]), "");
    }
}
