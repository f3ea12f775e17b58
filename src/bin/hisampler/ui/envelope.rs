//! Envelope widget - ADSR values and shape

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use hisampler::EnvelopeParameters;

use super::envelope_points;

/// Seconds of sustain drawn between decay and release
const SUSTAIN_HOLD: f64 = 0.5;

pub fn render_envelope(frame: &mut Frame, area: Rect, env: &EnvelopeParameters) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(area);

    let row = |label: &str, value: String, range: (f32, f32)| {
        Line::from(vec![
            Span::styled(format!(" {label:<8}"), Style::default().fg(Color::White)),
            Span::styled(format!("{value:>7}"), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("  {:.0}-{:.0}", range.0, range.1),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };

    let values = Paragraph::new(vec![
        row("Attack", format!("{:.2}s", env.attack), EnvelopeParameters::ATTACK_RANGE),
        row("Decay", format!("{:.2}s", env.decay), EnvelopeParameters::DECAY_RANGE),
        row("Sustain", format!("{:.2}", env.sustain), EnvelopeParameters::SUSTAIN_RANGE),
        row("Release", format!("{:.2}s", env.release), EnvelopeParameters::RELEASE_RANGE),
    ])
    .block(Block::default().title(" ADSR ").borders(Borders::ALL));
    frame.render_widget(values, chunks[0]);

    let points = envelope_points(env, SUSTAIN_HOLD);
    let total = points[4].0.max(f64::EPSILON);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::LightGreen))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" Envelope ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, total])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, chunks[1]);
}
