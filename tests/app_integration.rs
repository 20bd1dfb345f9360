use finpanel::core::config::AppConfig;
use finpanel::core::{PanelSnapshot, PanelStatus, Trend};
use finpanel::panels::PanelKind;
use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const CREDIT_CARD: &str =
        r#"[{"current_balance": 12450.00, "available_credit": 5300.00, "rewards_cash": 220.50}]"#;
    pub const PORTFOLIO: &str = r#"{"investment_history": [
        {"x": "2024-01-01", "y": 500},
        {"x": "2024-02-01", "y": 592}
    ]}"#;
    pub const WEEKLY_PORTFOLIO: &str = r#"[
        {"week": "2024-01-07", "portfolio_value": 380},
        {"week": "2024-01-14", "portfolio_value": 350}
    ]"#;
    pub const INVESTMENTS: &str = r#"[
        {"id": 1, "date": "2024-01-01T00:00:00", "index_purchased": "S&P 500", "units_purchased": 0.02, "price_per_unit": 5000, "amount_invested": 100},
        {"id": 2, "date": "2024-01-02T00:00:00", "index_purchased": "S&P 500", "units_purchased": 0.04, "price_per_unit": 5000, "amount_invested": 200},
        {"id": 3, "date": "2024-01-03T00:00:00", "index_purchased": "S&P 500", "units_purchased": 0.0184, "price_per_unit": 5000, "amount_invested": 92}
    ]"#;
    pub const TRANSACTIONS: &str = r#"[
        {"id": "a1", "transaction_date": "2024-02-01", "amount": 150.75, "description": "Groceries", "cashback": 4.52},
        {"id": "a2", "transaction_date": "2024-02-02", "amount": 85.20, "description": "Fashion"}
    ]"#;

    pub async fn mount_json(server: &MockServer, url_path: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    /// A backend answering every panel endpoint successfully.
    pub async fn create_backend() -> MockServer {
        let server = MockServer::start().await;
        mount_json(&server, "/credit_card", 200, CREDIT_CARD).await;
        mount_json(&server, "/portfolio", 200, PORTFOLIO).await;
        mount_json(&server, "/investments", 200, INVESTMENTS).await;
        mount_json(&server, "/transactions", 200, TRANSACTIONS).await;
        server
    }

    pub fn write_config(base_url: &str, extra: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
backend:
  base_url: "{base_url}"
  timeout_secs: 5
{extra}
"#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn snapshot_for(
    results: &[(PanelKind, Option<Arc<PanelSnapshot>>)],
    kind: PanelKind,
) -> Arc<PanelSnapshot> {
    results
        .iter()
        .find(|(k, _)| *k == kind)
        .and_then(|(_, s)| s.clone())
        .unwrap_or_else(|| panic!("No snapshot for {kind}"))
}

#[test_log::test(tokio::test)]
async fn test_full_dashboard_flow_with_mock() {
    let server = test_utils::create_backend().await;
    let config_file = test_utils::write_config(&server.uri(), "");

    let result = finpanel::run_command(
        finpanel::AppCommand::Dashboard,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Dashboard failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_all_panels_ready() {
    let server = test_utils::create_backend().await;
    let config_file = test_utils::write_config(&server.uri(), "");
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let results = finpanel::load_panels(&config, &PanelKind::ALL).await.unwrap();
    info!(count = results.len(), "Loaded panels");

    let balance = snapshot_for(&results, PanelKind::Balance);
    assert_eq!(balance.status(), PanelStatus::Ready);
    assert_eq!(balance.data().unwrap().primary_amount, dec("12450.00"));

    let portfolio = snapshot_for(&results, PanelKind::Portfolio);
    let metrics = portfolio.data().unwrap();
    assert_eq!(metrics.primary_amount, dec("592.00"));
    assert_eq!(metrics.change_percentage, Some(dec("18.40")));
    assert_eq!(metrics.trend, Trend::Up);

    let rewards = snapshot_for(&results, PanelKind::Rewards);
    assert_eq!(rewards.data().unwrap().primary_amount, dec("220.50"));

    let transactions = snapshot_for(&results, PanelKind::Transactions);
    assert_eq!(transactions.data().unwrap().primary_amount, dec("235.95"));

    let investments = snapshot_for(&results, PanelKind::Investments);
    assert_eq!(investments.data().unwrap().primary_amount, dec("392"));
}

#[test_log::test(tokio::test)]
async fn test_amount_invested_baseline() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_json(&server, "/portfolio", 200, test_utils::WEEKLY_PORTFOLIO).await;
    test_utils::mount_json(&server, "/investments", 200, test_utils::INVESTMENTS).await;
    let config_file = test_utils::write_config(
        &server.uri(),
        "portfolio:\n  baseline: amount_invested",
    );
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let results = finpanel::load_panels(&config, &[PanelKind::Portfolio])
        .await
        .unwrap();
    let portfolio = snapshot_for(&results, PanelKind::Portfolio);
    let metrics = portfolio.data().unwrap();
    assert_eq!(metrics.primary_amount, dec("350"));
    assert_eq!(metrics.change_percentage, Some(dec("-10.71")));
    assert_eq!(metrics.trend, Trend::Down);
}

#[test_log::test(tokio::test)]
async fn test_failing_source_only_fails_its_panel() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_json(&server, "/credit_card", 200, test_utils::CREDIT_CARD).await;
    test_utils::mount_json(&server, "/portfolio", 200, test_utils::WEEKLY_PORTFOLIO).await;
    test_utils::mount_json(&server, "/investments", 500, "").await;
    test_utils::mount_json(&server, "/transactions", 200, "[]").await;
    let config_file = test_utils::write_config(
        &server.uri(),
        "portfolio:\n  baseline: amount_invested",
    );
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let results = finpanel::load_panels(&config, &PanelKind::ALL).await.unwrap();

    assert_eq!(
        snapshot_for(&results, PanelKind::Balance).status(),
        PanelStatus::Ready
    );
    assert_eq!(
        snapshot_for(&results, PanelKind::Rewards).status(),
        PanelStatus::Ready
    );

    // Valuation series resolved but the invested total did not
    let portfolio = snapshot_for(&results, PanelKind::Portfolio);
    assert_eq!(portfolio.status(), PanelStatus::Failed);
    assert!(portfolio.data().is_none());
    assert_eq!(portfolio.error_message(), Some("HTTP error: 500"));

    let transactions = snapshot_for(&results, PanelKind::Transactions);
    assert_eq!(transactions.status(), PanelStatus::Failed);
    assert_eq!(transactions.error_message(), Some("No transactions found"));

    // Panel failures are rendered, not propagated
    let result = finpanel::run_command(
        finpanel::AppCommand::Dashboard,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Dashboard failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_zero_baseline_panel_is_ready() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_json(
        &server,
        "/portfolio",
        200,
        r#"[{"x": "2024-01-01", "y": 0}, {"x": "2024-02-01", "y": 592}]"#,
    )
    .await;
    let config_file = test_utils::write_config(&server.uri(), "");
    let config = AppConfig::load_from_path(config_file.path()).unwrap();

    let results = finpanel::load_panels(&config, &[PanelKind::Portfolio])
        .await
        .unwrap();
    let portfolio = snapshot_for(&results, PanelKind::Portfolio);
    assert_eq!(portfolio.status(), PanelStatus::Ready);
    let metrics = portfolio.data().unwrap();
    assert_eq!(metrics.change_percentage, None);
    assert_eq!(metrics.trend, Trend::Flat);
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");

    let result = finpanel::run_command(
        finpanel::AppCommand::Panel(PanelKind::Balance),
        Some(missing.to_str().unwrap()),
    )
    .await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
    assert!(!fs::exists(&missing).unwrap());
}
