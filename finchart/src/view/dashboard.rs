//! Dashboard page: navigation bar above the active chart.

use iced::widget::{Row, button, column, container, row, rule, scrollable, text};
use iced::{Alignment, Element, Length, Theme};

use finchart_common::Record;

use crate::app::Page;
use crate::message::Message;
use crate::view::chart::{ChartView, chart_view};

/// Render the dashboard for `page`.
pub fn dashboard_view<'a, R: Record + 'a>(
    page: Page,
    pages: &'a [Page],
    chart: &'a ChartView<R>,
) -> Element<'a, Message> {
    let nav = pages.iter().fold(
        Row::new().spacing(8).align_y(Alignment::Center),
        |row, p| row.push(page_button(*p, *p == page)),
    );

    let header = row![text("FinChart").size(24), nav]
        .spacing(24)
        .align_y(Alignment::Center);

    let content = column![header, rule::horizontal(1), chart_view(chart)]
        .spacing(16)
        .padding(32);

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn page_button(page: Page, active: bool) -> Element<'static, Message> {
    let style: fn(&Theme, button::Status) -> button::Style = if active {
        button::primary
    } else {
        button::secondary
    };

    button(text(page.label()).size(14))
        .on_press(Message::SelectPage(page))
        .style(style)
        .into()
}
