//! Renders panel snapshots for the terminal.
//!
//! Only `PanelSnapshot` values reach this module; it never sees backend JSON.

use super::ui;
use crate::core::format::{format_currency, format_date, format_percentage, format_units};
use crate::core::{DerivedMetrics, PanelDetail, PanelSnapshot, PanelStatus};
use crate::panels::PanelKind;
use comfy_table::Cell;

pub fn render_panel(kind: PanelKind, snapshot: Option<&PanelSnapshot>, symbol: &str) -> String {
    let mut output = format!("{}\n\n", ui::style_text(kind.title(), ui::StyleType::Title));

    let Some(snapshot) = snapshot else {
        output.push_str(&ui::style_text("Not loaded", ui::StyleType::Subtle));
        return output;
    };

    match (snapshot.status(), snapshot.data(), snapshot.error_message()) {
        (PanelStatus::Ready, Some(metrics), _) => {
            output.push_str(&render_metrics(metrics, symbol));
        }
        (PanelStatus::Failed, _, Some(message)) => {
            output.push_str(&ui::style_text(message, ui::StyleType::Error));
        }
        _ => output.push_str(&ui::style_text("Loading...", ui::StyleType::Subtle)),
    }
    output
}

fn headline(metrics: &DerivedMetrics, symbol: &str) -> String {
    let amount = ui::style_text(
        &format_currency(metrics.primary_amount, symbol),
        ui::StyleType::Headline,
    );
    match format_percentage(metrics.change_percentage) {
        Some(change) => format!("{amount} {}", ui::trend_badge(&change, metrics.trend)),
        None => amount,
    }
}

fn render_metrics(metrics: &DerivedMetrics, symbol: &str) -> String {
    let money = |amount| format_currency(amount, symbol);

    match &metrics.detail {
        PanelDetail::Balance {
            available_credit,
            rewards_cash,
        } => {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Current Balance"),
                ui::header_cell("Available Credit"),
                ui::header_cell("Rewards Cash"),
            ]);
            table.add_row(vec![
                ui::amount_cell(money(metrics.primary_amount)),
                ui::amount_cell(money(*available_credit)),
                ui::earned_cell(money(*rewards_cash)),
            ]);
            table.to_string()
        }
        PanelDetail::Rewards => format!("Reward Cash: {}", headline(metrics, symbol)),
        PanelDetail::Portfolio { baseline, series } => {
            let values: Vec<_> = series.iter().map(|p| p.value).collect();
            let mut output = format!("Current Value: {}\n", headline(metrics, symbol));
            output.push_str(&format!(
                "Baseline: {}\n",
                ui::style_text(&money(*baseline), ui::StyleType::Subtle)
            ));
            if let (Some(first), Some(last)) = (series.first(), series.last()) {
                output.push_str(&format!(
                    "\n{}  {}  {}",
                    format_date(first.date),
                    ui::sparkline(&values),
                    format_date(last.date)
                ));
            }
            output
        }
        PanelDetail::Transactions {
            total_cashback,
            rows,
        } => {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Transaction Date"),
                ui::header_cell("Amount"),
                ui::header_cell("Description"),
                ui::header_cell("Cashback Earned"),
            ]);
            for row in rows {
                table.add_row(vec![
                    Cell::new(format_date(row.record.date)),
                    ui::amount_cell(money(row.record.amount)),
                    Cell::new(&row.record.description),
                    ui::earned_cell(money(row.cashback)),
                ]);
            }
            format!(
                "{table}\n\nTotal Spent: {}\nTotal Cashback: {}",
                headline(metrics, symbol),
                ui::style_text(&money(*total_cashback), ui::StyleType::Headline)
            )
        }
        PanelDetail::Investments { total_units, rows } => {
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell("Date"),
                ui::header_cell("Amount"),
                ui::header_cell("Index"),
                ui::header_cell("Units"),
                ui::header_cell("Price / Unit"),
            ]);
            for row in rows {
                table.add_row(vec![
                    Cell::new(format_date(row.date)),
                    ui::amount_cell(money(row.amount_invested)),
                    Cell::new(&row.index_purchased),
                    ui::amount_cell(format_units(row.units_purchased)),
                    ui::amount_cell(money(row.price_per_unit)),
                ]);
            }
            format!(
                "{table}\n\nTotal Invested: {} ({} units)",
                headline(metrics, symbol),
                format_units(*total_units)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::{PanelDetail, Trend};
    use crate::core::records::PortfolioPoint;
    use crate::core::{FetchError, PanelError, Resource};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_render_balance() {
        let metrics = DerivedMetrics {
            primary_amount: dec("12450.00"),
            change_percentage: None,
            trend: Trend::Flat,
            detail: PanelDetail::Balance {
                available_credit: dec("5300.00"),
                rewards_cash: dec("220.50"),
            },
        };
        let snapshot = PanelSnapshot::ready(1, metrics);
        let output = render_panel(PanelKind::Balance, Some(&snapshot), "$");
        assert!(output.contains("Account Overview"));
        assert!(output.contains("$12,450.00"));
        assert!(output.contains("$5,300.00"));
        assert!(output.contains("$220.50"));
    }

    #[test]
    fn test_render_portfolio_with_and_without_badge() {
        let series = vec![
            PortfolioPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                value: dec("500"),
            },
            PortfolioPoint {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                value: dec("592"),
            },
        ];
        let mut metrics = DerivedMetrics {
            primary_amount: dec("592"),
            change_percentage: Some(dec("18.40")),
            trend: Trend::Up,
            detail: PanelDetail::Portfolio {
                baseline: dec("500"),
                series,
            },
        };
        let output = render_panel(
            PanelKind::Portfolio,
            Some(&PanelSnapshot::ready(1, metrics.clone())),
            "$",
        );
        assert!(output.contains("$592.00"));
        assert!(output.contains("18.40%"));
        assert!(output.contains("Jan 1, 2024"));

        metrics.change_percentage = None;
        metrics.trend = Trend::Flat;
        let output = render_panel(
            PanelKind::Portfolio,
            Some(&PanelSnapshot::ready(2, metrics)),
            "$",
        );
        assert!(output.contains("$592.00"));
        assert!(!output.contains('%'));
    }

    #[test]
    fn test_render_failed_and_loading() {
        let err = PanelError::from(FetchError::EmptyResult {
            resource: Resource::Transactions,
        });
        let failed = PanelSnapshot::failed(1, &err);
        let output = render_panel(PanelKind::Transactions, Some(&failed), "$");
        assert!(output.contains("No transactions found"));

        let loading = PanelSnapshot::loading(1);
        let output = render_panel(PanelKind::Transactions, Some(&loading), "$");
        assert!(output.contains("Loading..."));

        let output = render_panel(PanelKind::Transactions, None, "$");
        assert!(output.contains("Not loaded"));
    }
}
