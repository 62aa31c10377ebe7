use std::{mem, time::Duration};

use blockfall_engine::{GameSession, Input, PieceSeed};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use ratatui_runtime::{App, RenderMode, Runtime};

use crate::view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay};

use super::keymap::{self, Command};

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑", "X"], "Rotate"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "Restart"), (&["Q"], "Quit")];

/// Interactive play screen.
///
/// Key presses are queued and handed to the session on the next tick, so the
/// session sees time and input in the order the engine expects.
#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    seed: Option<PieceSeed>,
    fps: f64,
    show_ghost: bool,
    pending_inputs: Vec<Input>,
    paused: bool,
    is_exiting: bool,
}

impl PlayApp {
    /// Creates the screen. Without a seed every session draws a random one.
    pub fn new(seed: Option<PieceSeed>, fps: f64, show_ghost: bool) -> Self {
        Self {
            session: new_session(seed),
            seed,
            fps,
            show_ghost,
            pending_inputs: vec![],
            paused: false,
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn restart(&mut self) {
        self.session = new_session(self.seed);
        self.pending_inputs.clear();
        self.paused = false;
    }
}

fn new_session(seed: Option<PieceSeed>) -> GameSession {
    seed.map_or_else(GameSession::new, GameSession::with_seed)
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(self.fps));
        runtime.set_render_mode(RenderMode::throttled_from_rate(self.fps));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        match keymap::command_for(key) {
            Some(Command::Game(input)) if !self.paused || input.is_quit() => {
                self.pending_inputs.push(input);
            }
            Some(Command::TogglePause) if !self.session.is_game_over() => {
                self.paused = !self.paused;
            }
            Some(Command::Restart) if self.session.is_game_over() => self.restart(),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session)
            .show_ghost(self.show_ghost)
            .paused(self.paused);
        let bindings = if self.session.is_game_over() {
            GAME_OVER_KEYS
        } else if self.paused {
            PAUSED_KEYS
        } else {
            PLAYING_KEYS
        };
        let help = KeyBindingDisplay::new(bindings);

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        let inputs = mem::take(&mut self.pending_inputs);
        let elapsed = if self.paused { Duration::ZERO } else { elapsed };
        if self.session.tick(elapsed, &inputs).is_quit() {
            self.is_exiting = true;
        }
    }
}
