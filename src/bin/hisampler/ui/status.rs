//! Status bar widget - sample, voices and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Status;

pub fn render_status(frame: &mut Frame, area: Rect, status: &Status) {
    let block = Block::default().title(" hisampler ").borders(Borders::ALL);
    let model = &status.model;

    let sample = match &model.sample {
        Some(info) => format!(
            "{} ch  {:.2}s @ {}Hz  root {}  ",
            info.channels,
            info.duration_secs(),
            info.sample_rate,
            info.root_note
        ),
        None => "no sample  ".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {sample}"), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("Voices {}/{}  ", model.active_voices, model.voice_capacity),
            Style::default().fg(if model.active_voices > 0 {
                Color::Green
            } else {
                Color::White
            }),
        ),
        Span::styled(
            format!("Peak {:.2}  ", status.peak),
            Style::default().fg(if status.peak > 1.0 { Color::Red } else { Color::White }),
        ),
        Span::styled(
            format!("{:.1}kHz", model.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
