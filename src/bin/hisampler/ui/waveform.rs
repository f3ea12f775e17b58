//! Sample waveform widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use hisampler::sample::Peak;

/// Render the decimated waveform of the loaded sample
pub fn render_waveform(frame: &mut Frame, area: Rect, peaks: &[Peak]) {
    let block = Block::default().title(" Sample ").borders(Borders::ALL);

    if peaks.is_empty() {
        let empty = Paragraph::new(" No sample loaded. Pass a file path on the command line.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Each column draws a vertical stroke from its minimum to its maximum
    let width = peaks.len() as f64;
    let data: Vec<(f64, f64)> = peaks
        .iter()
        .enumerate()
        .flat_map(|(i, peak)| {
            let x = i as f64 / width;
            [(x, peak.max as f64), (x, peak.min as f64)]
        })
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
