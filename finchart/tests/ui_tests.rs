//! UI tests using iced_test Simulator.
//!
//! These tests drive the header, the dashboard and the whole application
//! view without opening a window.

use iced_test::simulator;

use finchart::app::{FinChart, Page};
use finchart::demo::portfolio_chart;
use finchart::message::Message;
use finchart::view::chart::ChartView;
use finchart::view::dashboard::dashboard_view;
use finchart::view::header::header_view;

use finchart_common::{AppConfig, ChartModel, Datum, SeriesSpec, VisibilityState, resolve_series};

fn two_series() -> Vec<finchart_common::ResolvedSeries> {
    resolve_series(&[
        SeriesSpec::new("primaryValue", "Asset A"),
        SeriesSpec::new("secondaryValue", "Asset B"),
    ])
}

/// Test that the header renders title, description and one button per series.
#[test]
fn test_header_shows_title_and_series() {
    let series = two_series();
    let visibility = VisibilityState::new(&series);
    let mut ui = simulator(header_view(
        Some("Portfolio Comparison"),
        Some("Two assets"),
        &series,
        &visibility,
    ));

    assert!(ui.find("Portfolio Comparison").is_ok());
    assert!(ui.find("Two assets").is_ok());
    assert!(ui.find("Asset A").is_ok());
    assert!(ui.find("Asset B").is_ok());
}

/// Test that clicking a series button emits its toggle message.
#[test]
fn test_click_series_button() {
    let series = two_series();
    let visibility = VisibilityState::new(&series);
    let mut ui = simulator(header_view(None, None, &series, &visibility));

    let _ = ui.click("Asset B");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert_eq!(
        messages,
        vec![Message::ToggleSeries("secondaryValue".to_string())]
    );
}

/// Test that a hidden series keeps its button so it can be shown again.
#[test]
fn test_hidden_series_keeps_button() {
    let series = two_series();
    let mut visibility = VisibilityState::new(&series);
    visibility.toggle("primaryValue");
    let mut ui = simulator(header_view(None, None, &series, &visibility));

    let _ = ui.click("Asset A");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert_eq!(
        messages,
        vec![Message::ToggleSeries("primaryValue".to_string())]
    );
}

/// Test that a header without title, description or series renders nothing.
#[test]
fn test_empty_header() {
    let visibility = VisibilityState::default();
    let mut ui = simulator(header_view(None, None, &[], &visibility));

    assert!(ui.find("Asset A").is_err());
}

/// Test that the dashboard shows page navigation and the chart header.
#[test]
fn test_dashboard_renders_chart() {
    let chart = ChartView::new(portfolio_chart(&AppConfig::default()));
    let pages = [Page::Portfolio, Page::PageViews];
    let mut ui = simulator(dashboard_view(Page::Portfolio, &pages, &chart));

    assert!(ui.find("Portfolio").is_ok());
    assert!(ui.find("Page Views").is_ok());
    assert!(ui.find("Portfolio Comparison").is_ok());
    assert!(ui.find("Asset A").is_ok());
}

/// Test that clicking a page button emits the page message.
#[test]
fn test_dashboard_navigation() {
    let chart = ChartView::new(portfolio_chart(&AppConfig::default()));
    let pages = [Page::Portfolio, Page::PageViews];
    let mut ui = simulator(dashboard_view(Page::Portfolio, &pages, &chart));

    let _ = ui.click("Page Views");

    let messages: Vec<Message> = ui.into_messages().collect();
    assert_eq!(messages, vec![Message::SelectPage(Page::PageViews)]);
}

/// Test that a chart without data still renders its header.
#[test]
fn test_empty_chart() {
    let chart: ChartView<Datum> = ChartView::new(
        ChartModel::new(Vec::new(), vec![SeriesSpec::new("close", "Close")]).with_title("Empty"),
    );
    let pages = [Page::Portfolio];
    let mut ui = simulator(dashboard_view(Page::Portfolio, &pages, &chart));

    assert!(ui.find("Empty").is_ok());
    assert!(ui.find("Close").is_ok());
}

/// Test the full application view after switching page.
#[test]
fn test_app_page_switch() {
    let mut app = FinChart::new(AppConfig::default(), None);
    let _ = app.update(Message::SelectPage(Page::PageViews));

    let mut ui = simulator(app.view());

    assert!(ui.find("Page Views").is_ok());
    assert!(ui.find("uv").is_ok());
    assert!(ui.find("pv").is_ok());
    // The third series is not plotted.
    assert!(ui.find("amt").is_err());
}
