//! TUI module for hisampler
//!
//! Plays notes from the keyboard, edits the envelope and shows the loaded
//! sample.

mod envelope;
mod status;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use tracing::warn;

use hisampler::{
    sample::Peak, synth::message::NoteEvent, EditorModel, EnvelopeParameters, SamplerHandle,
};

use envelope::render_envelope;
use status::render_status;
use waveform::render_waveform;

/// How long a key-triggered note sounds before its note-off
const NOTE_HOLD: Duration = Duration::from_millis(400);

/// Keyboard row mapped to C4..C5
const NOTE_KEYS: [(char, u8); 8] = [
    ('a', 60),
    ('s', 62),
    ('d', 64),
    ('f', 65),
    ('g', 67),
    ('h', 69),
    ('j', 71),
    ('k', 72),
];

const KEY_VELOCITY: u8 = 100;
const TIME_STEP: f32 = 0.05;
const LEVEL_STEP: f32 = 0.05;

/// Snapshot sent from the audio thread after every callback
#[derive(Clone, Copy, Debug)]
pub struct Status {
    pub model: EditorModel,
    /// Absolute peak of the last callback
    pub peak: f32,
}

/// UI application state
pub struct UiApp {
    handle: SamplerHandle,
    note_tx: Producer<NoteEvent>,
    status_rx: Consumer<Status>,
    /// Latest status received
    status: Status,
    /// Notes waiting for their automatic note-off
    held: Vec<(u8, Instant)>,
    /// Cached waveform and the width it was computed for
    waveform: Vec<Peak>,
    waveform_width: usize,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        handle: SamplerHandle,
        note_tx: Producer<NoteEvent>,
        status_rx: Consumer<Status>,
        sample_rate: f32,
    ) -> Self {
        let status = Status {
            model: EditorModel {
                sample_rate,
                envelope: handle.envelope(),
                sample: handle.current_sample(),
                active_voices: 0,
                voice_capacity: handle.config().voices,
            },
            peak: 0.0,
        };

        Self {
            handle,
            note_tx,
            status_rx,
            status,
            held: Vec::with_capacity(NOTE_KEYS.len()),
            waveform: Vec::new(),
            waveform_width: 0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_status();
            self.release_expired(Instant::now());
            self.handle.flush();
            self.handle.collect_garbage();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep only the latest status
    fn poll_status(&mut self) {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
    }

    fn release_expired(&mut self, now: Instant) {
        let mut i = 0;
        while i < self.held.len() {
            let (note, started) = self.held[i];
            if now.duration_since(started) >= NOTE_HOLD && self.send(NoteEvent::note_off(0, note)) {
                self.held.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    fn send(&mut self, event: NoteEvent) -> bool {
        if self.note_tx.push(event).is_err() {
            warn!(?event, "Note queue full");
            return false;
        }
        true
    }

    fn handle_key(&mut self, key: KeyCode) {
        let KeyCode::Char(c) = key else {
            if key == KeyCode::Esc {
                self.should_quit = true;
            }
            return;
        };

        if let Some(&(_, note)) = NOTE_KEYS.iter().find(|(k, _)| *k == c) {
            if self.send(NoteEvent::note_on(0, note, KEY_VELOCITY)) {
                self.held.retain(|&(held, _)| held != note);
                self.held.push((note, Instant::now()));
            }
            return;
        }

        let mut env = self.handle.envelope();
        match c {
            'q' | 'Q' => {
                self.should_quit = true;
                return;
            }
            '1' => env.attack -= TIME_STEP,
            '2' => env.attack += TIME_STEP,
            '3' => env.decay -= TIME_STEP,
            '4' => env.decay += TIME_STEP,
            '5' => env.sustain -= LEVEL_STEP,
            '6' => env.sustain += LEVEL_STEP,
            '7' => env.release -= TIME_STEP,
            '8' => env.release += TIME_STEP,
            _ => return,
        }
        self.handle.set_envelope(env);
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Sample waveform
                Constraint::Length(9), // Envelope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_status(frame, chunks[0], &self.status);

        // Braille gives two points per cell
        let width = chunks[1].width.saturating_sub(2) as usize * 2;
        if width != self.waveform_width || self.waveform.is_empty() {
            self.waveform = self.handle.waveform(width);
            self.waveform_width = width;
        }
        render_waveform(frame, chunks[1], &self.waveform);

        render_envelope(frame, chunks[2], &self.handle.envelope());

        let help = Paragraph::new(
            " [A-K] Play C4..C5  [1/2] Attack  [3/4] Decay  [5/6] Sustain  [7/8] Release  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

/// Envelope as a polyline of `(seconds, level)` points with `hold` seconds
/// of sustain drawn between decay and release.
fn envelope_points(env: &EnvelopeParameters, hold: f64) -> [(f64, f64); 5] {
    let a = env.attack as f64;
    let d = env.decay as f64;
    let s = env.sustain as f64;
    let r = env.release as f64;

    [
        (0.0, 0.0),
        (a, 1.0),
        (a + d, s),
        (a + d + hold, s),
        (a + d + hold + r, 0.0),
    ]
}
