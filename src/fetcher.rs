use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::{Config, DATA_AVAILABLE_FROM};
use crate::error::{AppError, Result};
use crate::page::{extract_events, Extraction};
use crate::types::QueryPeriod;

/// Full calendar URL for one query window.
pub fn calendar_url(base_url: &str, period: &QueryPeriod) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/calendar?{}", period.query_string())
}

/// Reject windows that start before the site's earliest data.
pub fn ensure_available(period: &QueryPeriod) -> Result<()> {
    if period.first_day() < DATA_AVAILABLE_FROM {
        return Err(AppError::NoDataAvailable(DATA_AVAILABLE_FROM));
    }
    Ok(())
}

pub fn build_client(cfg: &Config) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.http_timeout_secs))
        .user_agent(cfg.user_agent.clone())
        .build()?)
}

/// GET the calendar page for `period`. No retries.
pub async fn fetch_page(client: &reqwest::Client, cfg: &Config, period: &QueryPeriod) -> Result<String> {
    let url = calendar_url(&cfg.base_url, period);
    debug!("[FETCH] GET {url}");

    let resp = client.get(&url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        warn!("[FETCH] {url} returned {status}");
        return Err(AppError::HttpStatus { status: status.as_u16(), url });
    }
    let body = resp.text().await?;
    debug!(bytes = body.len(), "[FETCH] fetched {url}");
    Ok(body)
}

/// Fetch one window and extract its events.
pub async fn load_period(cfg: &Config, period: QueryPeriod) -> Result<Extraction> {
    ensure_available(&period)?;
    let client = build_client(cfg)?;
    let html = fetch_page(&client, cfg, &period).await?;

    let extraction = extract_events(&html, period)?;
    info!(
        period = %period,
        tz_offset = extraction.tz_offset,
        events = extraction.events.len(),
        skipped = extraction.stats.skipped.len(),
        "[FETCH] {period}: {} events (GMT {:+})",
        extraction.events.len(),
        extraction.tz_offset,
    );
    Ok(extraction)
}

pub async fn load_daily_data(cfg: &Config, date: NaiveDate) -> Result<Extraction> {
    load_period(cfg, QueryPeriod::day(date)).await
}

/// Any date in the week; the window starts on the preceding Sunday.
pub async fn load_weekly_data(cfg: &Config, date: NaiveDate) -> Result<Extraction> {
    load_period(cfg, QueryPeriod::week_of(date)).await
}

pub async fn load_monthly_data(cfg: &Config, year: i32, month: u32) -> Result<Extraction> {
    load_period(cfg, QueryPeriod::month(year, month)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, BASE_URL};

    fn test_config(base_url: String) -> Config {
        Config {
            base_url,
            log_level: "debug".to_string(),
            user_agent: "test".to_string(),
            http_timeout_secs: 5,
            period: QueryPeriod::day(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()),
            output_format: OutputFormat::Csv,
            output_path: None,
            output_append: false,
        }
    }

    #[test]
    fn url_joins_base_and_query() {
        let p = QueryPeriod::month(2024, 2).unwrap();
        assert_eq!(
            calendar_url(BASE_URL, &p),
            "https://www.forexfactory.com/calendar?month=feb.2024"
        );
        assert_eq!(
            calendar_url("http://localhost:8080", &p),
            "http://localhost:8080/calendar?month=feb.2024"
        );
    }

    #[test]
    fn windows_before_history_are_rejected() {
        let early = QueryPeriod::day(NaiveDate::from_ymd_opt(2006, 12, 31).unwrap());
        assert!(matches!(ensure_available(&early), Err(AppError::NoDataAvailable(_))));
        let first = QueryPeriod::month(2007, 1).unwrap();
        assert!(ensure_available(&first).is_ok());
    }

    #[tokio::test]
    async fn early_window_fails_before_any_request() {
        // Unroutable base URL: reaching the network would yield an Http error instead.
        let cfg = test_config("http://127.0.0.1:9".to_string());
        let err = load_monthly_data(&cfg, 2006, 5).await.unwrap_err();
        assert!(matches!(err, AppError::NoDataAvailable(_)));
    }
}
