use std::time::{Duration, Instant};

use tracing::debug;

use crate::source::FetchExecutor;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, TerminalEvent, TerminalSize};
use crate::ui::renderer::{RenderFrame, Renderer, choice_at_row};
use crate::widget::{Autocomplete, Effect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Submitted(String),
    Cancelled,
}

/// Widget plus the fetch executor it drives, independent of any real
/// terminal.
pub struct Session {
    widget: Autocomplete,
    executor: FetchExecutor,
    renderer: Renderer,
    exit: Option<Exit>,
}

impl Session {
    pub fn new(widget: Autocomplete, executor: FetchExecutor) -> Self {
        Self {
            widget,
            executor,
            renderer: Renderer::default(),
            exit: None,
        }
    }

    pub fn widget(&self) -> &Autocomplete {
        &self.widget
    }

    pub fn exit(&self) -> Option<&Exit> {
        self.exit.as_ref()
    }

    pub fn take_exit(&mut self) -> Option<Exit> {
        self.exit.take()
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.widget.poll_timeout(now, default_timeout)
    }

    /// Returns true when the frame needs repainting.
    pub fn handle_event(&mut self, event: TerminalEvent, now: Instant) -> bool {
        match event {
            TerminalEvent::Key(key) if is_quit(key) => {
                self.exit = Some(Exit::Cancelled);
                false
            }
            TerminalEvent::Key(key) => {
                let outcome = self.widget.handle_key(key, now);
                self.apply_effects(outcome.effects);
                outcome.request_render
            }
            TerminalEvent::MouseDown { row, .. } => {
                match choice_at_row(&self.widget.view(), row) {
                    Some(idx) => self.widget.handle_mouse_down(idx),
                    None => false,
                }
            }
            TerminalEvent::Resize(_) => true,
            TerminalEvent::Tick => false,
        }
    }

    /// Fires due debounces and applies finished fetches.
    pub fn tick(&mut self, now: Instant) -> bool {
        let result = self.widget.tick(now);
        let mut render_requested = result.request_render;
        self.apply_effects(result.effects);

        for completion in self.executor.drain_ready() {
            render_requested |= self.widget.apply_completion(completion);
        }
        render_requested
    }

    pub fn frame(&self, size: TerminalSize) -> RenderFrame {
        self.renderer.render(
            &self.widget.view(),
            self.widget.label(),
            self.widget.input_width(),
            size,
        )
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Fetch(request) => {
                    debug!(generation = request.generation, "dispatching fetch");
                    self.executor.spawn(request);
                }
                Effect::Submit(value) => {
                    self.exit = Some(Exit::Submitted(value));
                }
            }
        }
    }
}

fn is_quit(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}
