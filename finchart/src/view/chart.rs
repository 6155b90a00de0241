//! Dual-axis time-series chart using Iced canvas.

use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, LineDash, Path, Stroke, Text};
use iced::widget::{column, container};
use iced::{Border, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use finchart_common::brush::{fraction_of, position_at};
use finchart_common::{
    AxisLayout, AxisSide, BrushHandle, BrushRange, ChartModel, Record, Tick, Tooltip,
};

use super::header::header_view;
use super::theme::colors;
use crate::message::Message;

/// Space above the plot area.
const PADDING_TOP: f32 = 12.0;
/// Outer horizontal margin.
const EDGE: f32 = 8.0;
/// Height of the X tick label band.
const X_LABEL_HEIGHT: f32 = 24.0;
/// Height of the brush track.
const BRUSH_HEIGHT: f32 = 24.0;
/// Gap between the X labels and the brush.
const BRUSH_GAP: f32 = 8.0;
/// Width of a brush traveller (and its hit zone).
const TRAVELLER_WIDTH: f32 = 8.0;
/// Number of Y ticks per axis.
const Y_TICKS: usize = 5;
/// Rough width of one label character relative to the font size.
const CHAR_WIDTH: f32 = 0.6;

const GRID_DASH: LineDash<'static> = LineDash {
    segments: &[3.0, 3.0],
    offset: 0,
};

const CURSOR_DASH: LineDash<'static> = LineDash {
    segments: &[4.0, 4.0],
    offset: 0,
};

/// A chart model plus its cached geometry.
#[derive(Debug)]
pub struct ChartView<R> {
    model: ChartModel<R>,
    cache: Cache,
}

impl<R: Record> ChartView<R> {
    /// Wrap a chart model.
    pub fn new(model: ChartModel<R>) -> Self {
        Self {
            model,
            cache: Cache::new(),
        }
    }

    /// The underlying model.
    pub fn model(&self) -> &ChartModel<R> {
        &self.model
    }

    /// Flip a series' visibility.
    pub fn toggle_series(&mut self, key: &str) {
        if self.model.toggle_series(key).is_some() {
            self.cache.clear();
        }
    }

    /// Move the brush window.
    pub fn set_brush(&mut self, start: usize, end: usize) {
        if self.model.brush() != BrushRange::new(start, end, self.model.len()) {
            self.model.set_brush(start, end);
            self.cache.clear();
        }
    }

    /// Show the full range again.
    pub fn reset_brush(&mut self) {
        self.model.reset_brush();
        self.cache.clear();
    }

    /// Replace the records.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.model.set_data(data);
        self.cache.clear();
    }
}

/// Regions of the chart canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// Where lines are plotted.
    pub plot: Rectangle,
    /// The brush track, when shown.
    pub brush: Option<Rectangle>,
}

/// Split the canvas into plot area and brush track.
///
/// Hidden Y axes take no horizontal space.
pub fn chart_layout(size: Size, axes: &AxisLayout, show_brush: bool) -> ChartLayout {
    let left = EDGE + axes.left.width();
    let right = size.width - EDGE - axes.right.width();
    let brush_space = if show_brush {
        BRUSH_HEIGHT + BRUSH_GAP
    } else {
        0.0
    };
    let bottom = size.height - X_LABEL_HEIGHT - brush_space;

    let plot = Rectangle {
        x: left,
        y: PADDING_TOP,
        width: (right - left).max(0.0),
        height: (bottom - PADDING_TOP).max(0.0),
    };

    let brush = show_brush.then(|| Rectangle {
        x: plot.x,
        y: size.height - BRUSH_HEIGHT,
        width: plot.width,
        height: BRUSH_HEIGHT,
    });

    ChartLayout { plot, brush }
}

/// Which brush handle sits under `x` on the track, if any.
pub fn hit_test(track: Rectangle, brush: BrushRange, len: usize, x: f32) -> Option<BrushHandle> {
    let start_x = track.x + fraction_of(brush.start(), len) * track.width;
    let end_x = track.x + fraction_of(brush.end(), len) * track.width;

    if (x - start_x).abs() <= TRAVELLER_WIDTH {
        Some(BrushHandle::start_of(brush))
    } else if (x - end_x).abs() <= TRAVELLER_WIDTH {
        Some(BrushHandle::end_of(brush))
    } else if x > start_x && x < end_x {
        let anchor = position_at((x - track.x) / track.width, len);
        Some(BrushHandle::Window {
            anchor,
            origin: brush,
        })
    } else {
        None
    }
}

/// Map a value in `domain` onto `[start, start + length]`.
fn scale(value: f64, (min, max): (f64, f64), start: f32, length: f32) -> f32 {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return start + length / 2.0;
    }
    start + ((value - min) / range) as f32 * length
}

/// Inverse of [`scale`].
fn unscale(pixel: f32, (min, max): (f64, f64), start: f32, length: f32) -> f64 {
    if length <= 0.0 {
        return min;
    }
    min + ((pixel - start) / length) as f64 * (max - min)
}

fn text_width(content: &str, size: f32) -> f32 {
    content.chars().count() as f32 * size * CHAR_WIDTH
}

/// Canvas interaction state.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    /// Brush handle being dragged.
    drag: Option<BrushHandle>,
}

/// Canvas program drawing one chart.
struct ChartProgram<'a, R> {
    view: &'a ChartView<R>,
}

impl<'a, R: Record> canvas::Program<Message> for ChartProgram<'a, R> {
    type State = ChartInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            canvas::Event::Mouse(mouse_event) => {
                self.handle_mouse(interaction, mouse_event, bounds, cursor)
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        interaction: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let chart = self.view.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_chart(frame, bounds.size(), theme);
        });

        let mut overlay = Frame::new(renderer, bounds.size());
        self.draw_overlay(&mut overlay, bounds, cursor, interaction, theme);

        vec![chart, overlay.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if interaction.drag.is_some() {
            return mouse::Interaction::Grabbing;
        }

        let model = self.view.model();
        let layout = chart_layout(bounds.size(), &model.axis_layout(), model.show_brush());
        let (Some(track), Some(brush), Some(pos)) =
            (layout.brush, model.brush(), cursor.position_in(bounds))
        else {
            return mouse::Interaction::default();
        };

        if !track.contains(pos) {
            return mouse::Interaction::default();
        }

        match hit_test(track, brush, model.len(), pos.x) {
            Some(BrushHandle::Traveller { .. }) => mouse::Interaction::ResizingHorizontally,
            Some(BrushHandle::Window { .. }) => mouse::Interaction::Grab,
            None => mouse::Interaction::default(),
        }
    }
}

impl<'a, R: Record> ChartProgram<'a, R> {
    /// Handle mouse events: brush dragging and tooltip hover.
    fn handle_mouse(
        &self,
        interaction: &mut ChartInteraction,
        event: &mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let model = self.view.model();
        let len = model.len();
        let layout = chart_layout(bounds.size(), &model.axis_layout(), model.show_brush());

        match event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let track = layout.brush?;
                let brush = model.brush()?;
                let pos = cursor.position_in(bounds)?;
                if !track.contains(pos) {
                    return None;
                }

                let handle = hit_test(track, brush, len, pos.x)?;
                interaction.drag = Some(handle);
                Some(canvas::Action::request_redraw().and_capture())
            }

            mouse::Event::ButtonPressed(mouse::Button::Right) => {
                let track = layout.brush?;
                let pos = cursor.position_in(bounds)?;
                track
                    .contains(pos)
                    .then(|| canvas::Action::publish(Message::ResetBrush).and_capture())
            }

            mouse::Event::CursorMoved { .. } => {
                if let (Some(handle), Some(track), Some(brush)) =
                    (interaction.drag, layout.brush, model.brush())
                {
                    let x = cursor.position()?.x - bounds.x;
                    let position = position_at((x - track.x) / track.width, len);
                    let next = brush.drag(handle, position, len)?;
                    if next != brush {
                        return Some(canvas::Action::publish(Message::BrushChanged {
                            start: next.start(),
                            end: next.end(),
                        }));
                    }
                }
                Some(canvas::Action::request_redraw())
            }

            mouse::Event::ButtonReleased(mouse::Button::Left) => interaction
                .drag
                .take()
                .map(|_| canvas::Action::request_redraw()),

            _ => None,
        }
    }

    /// Draw the static part of the chart onto the frame.
    fn draw_chart(&self, frame: &mut Frame, size: Size, theme: &Theme) {
        let model = self.view.model();
        let palette = colors(theme);

        let background = Path::rectangle(Point::ORIGIN, size);
        frame.fill(&background, palette.chart_background());

        let axes = model.axis_layout();
        let layout = chart_layout(size, &axes, model.show_brush());
        let plot = layout.plot;

        if plot.width <= 0.0 || plot.height <= 0.0 {
            return;
        }

        let Some(x_domain) = model.x_domain() else {
            let no_data = Text {
                content: "No data".to_string(),
                position: Point::new(size.width / 2.0 - 30.0, size.height / 2.0),
                color: palette.chart_label(),
                size: 16.0.into(),
                ..Text::default()
            };
            frame.fill_text(no_data);
            return;
        };

        let x_ticks = model.x_ticks(tick_budget(plot.width));

        if model.show_grid() {
            self.draw_grid(frame, plot, x_domain, &x_ticks, theme);
        }

        for side in AxisSide::ALL {
            if axes.get(side).show {
                self.draw_y_axis(frame, plot, side, theme);
            }
        }

        for series in model.visible_series() {
            let Some(y_domain) = model.y_domain(series.axis) else {
                continue;
            };
            let color = palette.series(series.color);
            let points: Vec<Point> = model
                .points(&series.key)
                .into_iter()
                .map(|(x, y)| to_screen(plot, x_domain, y_domain, x, y))
                .collect();

            match points.as_slice() {
                [] => {}
                [single] => frame.fill(&Path::circle(*single, 2.0), color),
                [first, ..] => {
                    let path = Path::new(|builder| {
                        builder.move_to(*first);
                        for [control_a, control_b, to] in monotone_segments(&points) {
                            builder.bezier_curve_to(control_a, control_b, to);
                        }
                    });
                    frame.stroke(
                        &path,
                        Stroke::default().with_color(color).with_width(2.0),
                    );
                }
            }
        }

        // X tick labels
        for tick in &x_ticks {
            let x = scale(tick.value, x_domain, plot.x, plot.width);
            let label = Text {
                content: tick.label.clone(),
                position: Point::new(
                    x - text_width(&tick.label, 12.0) / 2.0,
                    plot.y + plot.height + 6.0,
                ),
                color: palette.chart_label(),
                size: 12.0.into(),
                ..Text::default()
            };
            frame.fill_text(label);
        }

        if let (Some(track), Some(brush)) = (layout.brush, model.brush()) {
            self.draw_brush(frame, track, brush, theme);
        }
    }

    /// Draw dashed grid lines at the Y tick rows and the X ticks.
    fn draw_grid(
        &self,
        frame: &mut Frame,
        plot: Rectangle,
        x_domain: (f64, f64),
        x_ticks: &[Tick],
        theme: &Theme,
    ) {
        let stroke = Stroke {
            line_dash: GRID_DASH,
            ..Stroke::default()
                .with_color(colors(theme).chart_grid())
                .with_width(1.0)
        };

        for i in 0..Y_TICKS {
            let y = plot.y + (i as f32 / (Y_TICKS - 1) as f32) * plot.height;
            let line = Path::line(Point::new(plot.x, y), Point::new(plot.x + plot.width, y));
            frame.stroke(&line, stroke);
        }

        for tick in x_ticks {
            let x = scale(tick.value, x_domain, plot.x, plot.width);
            let line = Path::line(Point::new(x, plot.y), Point::new(x, plot.y + plot.height));
            frame.stroke(&line, stroke);
        }
    }

    /// Draw the tick labels of one Y axis.
    fn draw_y_axis(&self, frame: &mut Frame, plot: Rectangle, side: AxisSide, theme: &Theme) {
        let model = self.view.model();
        let label_color = colors(theme).chart_label();

        for (i, tick) in model.y_ticks(side, Y_TICKS).iter().enumerate() {
            let y = plot.y + (i as f32 / (Y_TICKS - 1) as f32) * plot.height;
            let x = match side {
                AxisSide::Left => plot.x - 6.0 - text_width(&tick.label, 12.0),
                AxisSide::Right => plot.x + plot.width + 6.0,
            };

            let label = Text {
                content: tick.label.clone(),
                position: Point::new(x, y - 7.0),
                color: label_color,
                size: 12.0.into(),
                ..Text::default()
            };
            frame.fill_text(label);
        }
    }

    /// Draw the brush track, selection and travellers.
    fn draw_brush(&self, frame: &mut Frame, track: Rectangle, brush: BrushRange, theme: &Theme) {
        let palette = colors(theme);
        let len = self.view.model().len();

        frame.fill(
            &Path::rectangle(track.position(), track.size()),
            palette.brush_track(),
        );
        frame.stroke(
            &Path::rectangle(track.position(), track.size()),
            Stroke::default()
                .with_color(palette.text_muted())
                .with_width(1.0),
        );

        let start_x = track.x + fraction_of(brush.start(), len) * track.width;
        let end_x = track.x + fraction_of(brush.end(), len) * track.width;

        frame.fill(
            &Path::rectangle(
                Point::new(start_x, track.y),
                Size::new((end_x - start_x).max(1.0), track.height),
            ),
            palette.brush_selection(),
        );

        for x in [start_x, end_x] {
            let traveller = Path::rectangle(
                Point::new(x - TRAVELLER_WIDTH / 2.0, track.y),
                Size::new(TRAVELLER_WIDTH, track.height),
            );
            frame.fill(&traveller, palette.text_muted());
        }
    }

    /// Draw hover tooltip and brush labels; redrawn on every cursor move.
    fn draw_overlay(
        &self,
        frame: &mut Frame,
        bounds: Rectangle,
        cursor: mouse::Cursor,
        interaction: &ChartInteraction,
        theme: &Theme,
    ) {
        let model = self.view.model();
        let layout = chart_layout(bounds.size(), &model.axis_layout(), model.show_brush());

        if let (Some(_), Some(track), Some(brush)) =
            (interaction.drag, layout.brush, model.brush())
        {
            self.draw_brush_labels(frame, track, brush, theme);
        }

        let Some(pos) = cursor.position_in(bounds) else {
            return;
        };
        if interaction.drag.is_some() || !layout.plot.contains(pos) {
            return;
        }
        let Some(x_domain) = model.x_domain() else {
            return;
        };

        let x = unscale(pos.x, x_domain, layout.plot.x, layout.plot.width);
        if let Some(tooltip) = model.tooltip_at(x) {
            self.draw_tooltip(frame, layout.plot, x_domain, &tooltip, bounds.size(), theme);
        }
    }

    /// Labels above the brush travellers while dragging.
    fn draw_brush_labels(
        &self,
        frame: &mut Frame,
        track: Rectangle,
        brush: BrushRange,
        theme: &Theme,
    ) {
        let model = self.view.model();
        let len = model.len();

        for position in [brush.start(), brush.end()] {
            let Some(label) = model.label_at(position) else {
                continue;
            };
            let x = track.x + fraction_of(position, len) * track.width;
            let text = Text {
                position: Point::new(x - text_width(&label, 11.0) / 2.0, track.y - 14.0),
                content: label,
                color: colors(theme).text(),
                size: 11.0.into(),
                ..Text::default()
            };
            frame.fill_text(text);
        }
    }

    /// Cursor line, active dots and the tooltip box.
    fn draw_tooltip(
        &self,
        frame: &mut Frame,
        plot: Rectangle,
        x_domain: (f64, f64),
        tooltip: &Tooltip,
        size: Size,
        theme: &Theme,
    ) {
        let model = self.view.model();
        let palette = colors(theme);
        let x = scale(tooltip.x, x_domain, plot.x, plot.width);

        let cursor_line = Path::line(Point::new(x, plot.y), Point::new(x, plot.y + plot.height));
        frame.stroke(
            &cursor_line,
            Stroke {
                line_dash: CURSOR_DASH,
                ..Stroke::default()
                    .with_color(palette.text_muted())
                    .with_width(1.0)
            },
        );

        for entry in &tooltip.entries {
            let (Some(value), Some(y_domain)) = (entry.value, model.y_domain(entry.axis)) else {
                continue;
            };
            if !value.is_finite() {
                continue;
            }
            let point = to_screen(plot, x_domain, y_domain, tooltip.x, value);
            frame.fill(&Path::circle(point, 4.0), palette.series(entry.color));
        }

        // Tooltip box
        let line_height = 16.0;
        let rows: Vec<String> = tooltip
            .entries
            .iter()
            .map(|e| format!("{}  {}", e.label, e.text))
            .collect();
        let widest = rows
            .iter()
            .map(|r| text_width(r, 12.0) + 16.0)
            .fold(text_width(&tooltip.label, 12.0), f32::max);
        let box_size = Size::new(
            (widest + 24.0).max(160.0),
            line_height * (rows.len() as f32 + 1.0) + 20.0,
        );

        let mut origin = Point::new(x + 12.0, plot.y + 8.0);
        if origin.x + box_size.width > size.width {
            origin.x = x - 12.0 - box_size.width;
        }

        frame.fill(
            &Path::rounded_rectangle(origin, box_size, 6.0.into()),
            palette.chart_tooltip_background(),
        );
        frame.stroke(
            &Path::rounded_rectangle(origin, box_size, 6.0.into()),
            Stroke::default().with_color(palette.border()).with_width(1.0),
        );

        frame.fill_text(Text {
            content: tooltip.label.clone(),
            position: Point::new(origin.x + 12.0, origin.y + 8.0),
            color: palette.text(),
            size: 12.0.into(),
            ..Text::default()
        });

        for (i, (entry, row)) in tooltip.entries.iter().zip(rows).enumerate() {
            let y = origin.y + 8.0 + line_height * (i as f32 + 1.0) + 4.0;
            frame.fill(
                &Path::circle(Point::new(origin.x + 16.0, y + 7.0), 4.0),
                palette.series(entry.color),
            );
            frame.fill_text(Text {
                content: row,
                position: Point::new(origin.x + 26.0, y),
                color: palette.text(),
                size: 12.0.into(),
                ..Text::default()
            });
        }
    }
}

/// Plot-space coordinates to canvas pixels.
fn to_screen(plot: Rectangle, x_domain: (f64, f64), y_domain: (f64, f64), x: f64, y: f64) -> Point {
    Point::new(
        scale(x, x_domain, plot.x, plot.width),
        plot.y + plot.height - (scale(y, y_domain, 0.0, plot.height)),
    )
}

/// Cubic segments of a monotone curve through `points`, as
/// `[control_a, control_b, to]` starting from the first point.
///
/// Tangents follow Fritsch-Carlson, so the curve never overshoots a local
/// extreme and flat runs stay flat. `points` must be sorted by x.
fn monotone_segments(points: &[Point]) -> Vec<[Point; 3]> {
    if points.len() < 2 {
        return Vec::new();
    }

    let secant = |a: Point, b: Point| {
        let dx = b.x - a.x;
        if dx == 0.0 { 0.0 } else { (b.y - a.y) / dx }
    };

    let last = points.len() - 1;
    let mut tangents = vec![0.0f32; points.len()];
    for i in 1..last {
        let (prev, point, next) = (points[i - 1], points[i], points[i + 1]);
        let (h0, h1) = (point.x - prev.x, next.x - point.x);
        let (s0, s1) = (secant(prev, point), secant(point, next));
        let p = if h0 + h1 == 0.0 {
            0.0
        } else {
            (s0 * h1 + s1 * h0) / (h0 + h1)
        };
        tangents[i] = (s0.signum() + s1.signum()) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    }

    if last == 1 {
        let slope = secant(points[0], points[1]);
        tangents = vec![slope, slope];
    } else {
        tangents[0] = (3.0 * secant(points[0], points[1]) - tangents[1]) / 2.0;
        tangents[last] = (3.0 * secant(points[last - 1], points[last]) - tangents[last - 1]) / 2.0;
    }

    points
        .windows(2)
        .zip(tangents.windows(2))
        .map(|(pair, slopes)| {
            let (from, to) = (pair[0], pair[1]);
            let dx = (to.x - from.x) / 3.0;
            [
                Point::new(from.x + dx, from.y + dx * slopes[0]),
                Point::new(to.x - dx, to.y - dx * slopes[1]),
                to,
            ]
        })
        .collect()
}

/// How many X labels fit in the plot width.
fn tick_budget(width: f32) -> usize {
    ((width / 110.0).floor() as usize).clamp(2, 12)
}

/// Create a chart element: header with series toggles above the canvas.
pub fn chart_view<'a, R: Record + 'a>(view: &'a ChartView<R>) -> Element<'a, Message> {
    let model = view.model();
    let header = header_view(
        model.title(),
        model.description(),
        model.series(),
        model.visibility(),
    );

    let canvas = Canvas::new(ChartProgram { view })
        .width(Length::Fill)
        .height(Length::Fixed(model.height()));

    container(column![header, canvas].spacing(16))
        .padding(16)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let palette = colors(theme);
            container::Style {
                background: Some(palette.card_background().into()),
                border: Border {
                    color: palette.border(),
                    width: 1.0,
                    radius: 12.0.into(),
                },
                ..container::Style::default()
            }
        })
        .into()
}
