//! FinChart Iced application.

use std::fmt;

use iced::{Element, Task, Theme};

use finchart_common::{AppConfig, Datum};

use crate::custom::custom_chart;
use crate::demo::{page_views_chart, portfolio_chart};
use crate::message::Message;
use crate::view::chart::ChartView;
use crate::view::dashboard::dashboard_view;
use crate::view::theme::iced_theme;

/// A dashboard page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    /// Two-asset portfolio comparison.
    #[default]
    Portfolio,
    /// Page views by page name.
    PageViews,
    /// Records loaded with `--data`.
    Custom,
}

impl Page {
    /// Navigation label.
    pub fn label(&self) -> &'static str {
        match self {
            Page::Portfolio => "Portfolio",
            Page::PageViews => "Page Views",
            Page::Custom => "Custom",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The main FinChart application.
pub struct FinChart {
    /// Loaded configuration.
    config: AppConfig,
    /// Page on screen.
    page: Page,
    /// Pages offered in the navigation bar.
    pages: Vec<Page>,
    portfolio: ChartView<Datum>,
    page_views: ChartView<Datum>,
    /// Only present when a data file was given.
    custom: Option<ChartView<Datum>>,
}

impl FinChart {
    /// Build the application state.
    pub fn new(config: AppConfig, data: Option<Vec<Datum>>) -> Self {
        let custom = data.map(|records| ChartView::new(custom_chart(&config, records)));

        let mut pages = vec![Page::Portfolio, Page::PageViews];
        if custom.is_some() {
            pages.push(Page::Custom);
        }

        Self {
            portfolio: ChartView::new(portfolio_chart(&config)),
            page_views: ChartView::new(page_views_chart(&config)),
            custom,
            page: Page::default(),
            pages,
            config,
        }
    }

    /// Boot the FinChart application (called by iced::application).
    pub fn boot(config: AppConfig, data: Option<Vec<Datum>>) -> (Self, Task<Message>) {
        (Self::new(config, data), Task::none())
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        format!("FinChart - {}", self.page)
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectPage(page) => {
                if self.pages.contains(&page) {
                    tracing::info!(page = %page, "Switched page");
                    self.page = page;
                } else {
                    tracing::warn!(page = %page, "Page not available");
                }
            }

            Message::ToggleSeries(key) => {
                let page = self.page;
                if let Some(chart) = self.active_chart_mut() {
                    chart.toggle_series(&key);
                    tracing::debug!(
                        page = %page,
                        series = %key,
                        visible = chart.model().is_visible(&key),
                        "Toggled series"
                    );
                }
            }

            Message::BrushChanged { start, end } => {
                if let Some(chart) = self.active_chart_mut() {
                    chart.set_brush(start, end);
                    tracing::debug!(start, end, "Brush moved");
                }
            }

            Message::ResetBrush => {
                if let Some(chart) = self.active_chart_mut() {
                    chart.reset_brush();
                    tracing::debug!("Brush reset");
                }
            }
        }

        Task::none()
    }

    /// Render the current view.
    pub fn view(&self) -> Element<'_, Message> {
        let chart = self.active_chart().unwrap_or(&self.portfolio);
        dashboard_view(self.page, &self.pages, chart)
    }

    /// Get the application theme.
    pub fn theme(&self) -> Theme {
        iced_theme(self.config.theme)
    }

    /// Page on screen.
    pub fn page(&self) -> Page {
        self.page
    }

    /// Pages offered in the navigation bar.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Chart shown on a page.
    pub fn chart(&self, page: Page) -> Option<&ChartView<Datum>> {
        match page {
            Page::Portfolio => Some(&self.portfolio),
            Page::PageViews => Some(&self.page_views),
            Page::Custom => self.custom.as_ref(),
        }
    }

    fn active_chart(&self) -> Option<&ChartView<Datum>> {
        self.chart(self.page)
    }

    fn active_chart_mut(&mut self) -> Option<&mut ChartView<Datum>> {
        match self.page {
            Page::Portfolio => Some(&mut self.portfolio),
            Page::PageViews => Some(&mut self.page_views),
            Page::Custom => self.custom.as_mut(),
        }
    }
}
