//! Chart header: title, description and series toggle buttons.

use iced::widget::{Column, Row, button, column, container, row, rule, text};
use iced::{Alignment, Border, Element, Length, Theme};

use finchart_common::{ResolvedSeries, VisibilityState};

use super::theme::colors;
use crate::message::Message;

/// Render the chart header.
///
/// Empty when there is no title, no description and no series.
pub fn header_view<'a>(
    title: Option<&'a str>,
    description: Option<&'a str>,
    series: &'a [ResolvedSeries],
    visibility: &VisibilityState,
) -> Element<'a, Message> {
    if title.is_none() && description.is_none() && series.is_empty() {
        return Column::new().into();
    }

    let mut heading = Column::new().spacing(4).width(Length::Fill);
    if let Some(title) = title {
        heading = heading.push(text(title).size(18));
    }
    if let Some(description) = description {
        heading = heading.push(
            text(description)
                .size(12)
                .style(|theme: &Theme| text::Style {
                    color: Some(colors(theme).text_muted()),
                }),
        );
    }

    let toggles = series.iter().fold(
        Row::new().spacing(8).align_y(Alignment::Center),
        |row, s| row.push(series_button(s, visibility.is_visible(&s.key))),
    );

    column![
        row![heading, toggles]
            .spacing(12)
            .align_y(Alignment::Start),
        rule::horizontal(1),
    ]
    .spacing(12)
    .into()
}

/// Toggle button with a color dot; hidden series render flat.
fn series_button(series: &ResolvedSeries, active: bool) -> Element<'_, Message> {
    let color = series.color;

    let dot = container(text(""))
        .width(Length::Fixed(10.0))
        .height(Length::Fixed(10.0))
        .style(move |theme: &Theme| container::Style {
            background: Some(colors(theme).series(color).into()),
            border: Border {
                radius: 5.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        });

    let label = text(&series.label).size(12);

    let style: fn(&Theme, button::Status) -> button::Style = if active {
        button::secondary
    } else {
        button::text
    };

    button(row![dot, label].spacing(6).align_y(Alignment::Center))
        .on_press(Message::ToggleSeries(series.key.clone()))
        .padding([4, 10])
        .style(style)
        .into()
}
