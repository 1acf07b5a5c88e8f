use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use easescroll_core::TimingCurve;

use crate::app::App;

/// Samples used to draw the curve
const PLOT_SAMPLES: usize = 64;

pub struct CurvePlotWidget;

impl CurvePlotWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let curve = app.curve();
        let points = Self::sample(curve);

        // Overshooting curves need room above 1.0 and below 0.0
        let (low, high) = points
            .iter()
            .fold((0.0f64, 1.0f64), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));

        let marker: Vec<(f64, f64)> = app
            .animator
            .progress(&app.viewport)
            .map(|t| vec![(t, curve.evaluate(t))])
            .unwrap_or_default();

        let datasets = vec![
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.blue))
                .data(&points),
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme.red))
                .data(&marker),
        ];

        let block = Block::default()
            .title(format!(" {} ", curve))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg1));

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(theme.grey1))
                    .bounds([0.0, 1.0])
                    .labels(vec![Span::raw("0"), Span::raw("t"), Span::raw("1")]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(theme.grey1))
                    .bounds([low, high])
                    .labels(vec![
                        Span::raw(format!("{:.1}", low)),
                        Span::raw(format!("{:.1}", high)),
                    ]),
            );

        frame.render_widget(chart, area);
    }

    fn sample(curve: TimingCurve) -> Vec<(f64, f64)> {
        (0..=PLOT_SAMPLES)
            .map(|i| {
                let t = i as f64 / PLOT_SAMPLES as f64;
                (t, curve.evaluate(t))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_spans_unit_interval() {
        let points = CurvePlotWidget::sample(TimingCurve::EASE_IN_OUT);
        assert_eq!(points.len(), PLOT_SAMPLES + 1);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[PLOT_SAMPLES], (1.0, 1.0));
    }
}
