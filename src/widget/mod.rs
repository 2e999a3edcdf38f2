pub mod input;
pub mod state;

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::AutocompleteConfig;
use crate::debounce::Debouncer;
use crate::source::{FetchCompletion, FetchRequest, Match};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::view::{self, AutocompleteView};

use input::{EditResult, TextInput};
use state::AutocompleteState;

/// Work the widget asks its host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
    Submit(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionResult {
    pub handled: bool,
    /// The surface's own handling of the key must be skipped.
    pub prevent_default: bool,
    pub request_render: bool,
    pub effects: Vec<Effect>,
}

impl InteractionResult {
    fn ignored() -> Self {
        Self::default()
    }

    fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            ..Self::default()
        }
    }

    fn prevented() -> Self {
        Self {
            prevent_default: true,
            ..Self::handled()
        }
    }
}

/// Remote-backed autocomplete over a single-line input.
pub struct Autocomplete {
    label: String,
    input_width: u16,
    input: TextInput,
    state: AutocompleteState,
    value_changed: Debouncer<()>,
    generation: u64,
    in_flight: Option<u64>,
}

impl Autocomplete {
    pub fn new(config: &AutocompleteConfig) -> Self {
        let mut widget = Self {
            label: config.label.clone(),
            input_width: config.input_width,
            input: TextInput::new(),
            state: AutocompleteState::default(),
            value_changed: Debouncer::new(config.debounce()),
            generation: 0,
            in_flight: None,
        };
        widget.reset();
        widget
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn input_width(&self) -> u16 {
        self.input_width
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn state(&self) -> &AutocompleteState {
        &self.state
    }

    /// Generation of the fetch whose result the widget is waiting for.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn view(&self) -> AutocompleteView {
        view::render(&self.input, &self.state)
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.value_changed.poll_timeout(now, default_timeout)
    }

    /// Fires the debounced value-changed handler once its delay has passed.
    pub fn tick(&mut self, now: Instant) -> InteractionResult {
        if self.value_changed.take_due(now).is_none() {
            return InteractionResult::ignored();
        }
        InteractionResult {
            effects: self.value_changed().map(Effect::Fetch).into_iter().collect(),
            ..InteractionResult::handled()
        }
    }

    /// Starts a query cycle for the current text, or resets on empty text.
    pub fn value_changed(&mut self) -> Option<FetchRequest> {
        let value = self.input.value().to_string();
        if value.is_empty() {
            self.reset();
            return None;
        }

        self.state.previous_value = Some(value.clone());
        self.generation = self.generation.saturating_add(1);
        self.in_flight = Some(self.generation);
        debug!(generation = self.generation, query = %value, "fetch issued");
        Some(FetchRequest {
            generation: self.generation,
            query: value,
        })
    }

    /// Applies a result if it belongs to the latest issued fetch.
    pub fn apply_matches(&mut self, generation: u64, matches: Vec<Match>) -> bool {
        if self.in_flight != Some(generation) {
            debug!(generation, current = ?self.in_flight, "stale matches dropped");
            return false;
        }
        self.in_flight = None;
        self.state.show_matches(matches);
        true
    }

    /// Failed fetches leave the widget exactly as it was.
    pub fn apply_completion(&mut self, completion: FetchCompletion) -> bool {
        match completion.result {
            Ok(matches) => self.apply_matches(completion.generation, matches),
            Err(error) => {
                warn!(
                    generation = completion.generation,
                    query = %completion.query,
                    %error,
                    "fetching matches failed"
                );
                false
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> InteractionResult {
        let plain = key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT;
        match key.code {
            KeyCode::Down if plain => {
                let picked = self.state.select_next().map(|m| m.name.clone());
                self.preview(picked);
                InteractionResult::prevented()
            }
            KeyCode::Up if plain => {
                let picked = self.state.select_prev().map(|m| m.name.clone());
                self.preview(picked);
                InteractionResult::prevented()
            }
            KeyCode::Tab => self.complete_best_match(),
            KeyCode::Enter => {
                let value = self.input.value().to_string();
                self.reset();
                info!(value = %value, "submitted");
                InteractionResult {
                    effects: vec![Effect::Submit(value)],
                    ..InteractionResult::handled()
                }
            }
            KeyCode::Esc => {
                // With nothing captured yet the field is cleared, so a
                // debounce still pending afterwards sees empty text.
                let previous = self.state.previous_value.take().unwrap_or_default();
                self.input.set_value(previous);
                self.reset();
                InteractionResult::handled()
            }
            _ => match self.input.apply_key(key) {
                EditResult::Changed => {
                    self.value_changed.trigger((), now);
                    InteractionResult::handled()
                }
                EditResult::Unchanged => InteractionResult::handled(),
                EditResult::Ignored => InteractionResult::ignored(),
            },
        }
    }

    /// Selects the choice at `index` in the rendered list.
    pub fn handle_mouse_down(&mut self, index: usize) -> bool {
        let Some(picked) = self.state.matches().get(index).map(|m| m.name.clone()) else {
            return false;
        };
        self.input.set_value(picked);
        self.reset();
        true
    }

    /// Back to the inactive baseline. Any in-flight fetch is disowned.
    pub fn reset(&mut self) {
        self.state.reset();
        self.in_flight = None;
    }

    fn complete_best_match(&mut self) -> InteractionResult {
        let best = self.state.best_match().map(|m| m.name.clone());
        let outcome = match best {
            Some(name) => {
                self.input.set_value(name);
                InteractionResult::prevented()
            }
            None => InteractionResult::handled(),
        };
        self.reset();
        outcome
    }

    fn preview(&mut self, picked: Option<String>) {
        if let Some(name) = picked {
            self.input.set_value(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Autocomplete, Effect};
    use crate::config::AutocompleteConfig;
    use crate::error::AutocompleteError;
    use crate::source::{FetchCompletion, FetchRequest, Match};
    use crate::terminal::{KeyCode, KeyEvent};
    use std::time::{Duration, Instant};

    const DELAY: Duration = Duration::from_millis(300);

    fn widget() -> Autocomplete {
        Autocomplete::new(&AutocompleteConfig::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn type_text(widget: &mut Autocomplete, text: &str, at: Instant) {
        for ch in text.chars() {
            widget.handle_key(key(KeyCode::Char(ch)), at);
        }
    }

    fn fetches(effects: &[Effect]) -> Vec<&FetchRequest> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Fetch(request) => Some(request),
                Effect::Submit(_) => None,
            })
            .collect()
    }

    /// Types `text`, lets the debounce elapse and answers with `names`.
    fn query(widget: &mut Autocomplete, text: &str, names: &[&str]) -> Instant {
        let start = Instant::now();
        type_text(widget, text, start);
        let effects = widget.tick(start + DELAY).effects;
        let request = fetches(&effects)
            .first()
            .copied()
            .cloned()
            .expect("one fetch after debounce");
        assert_eq!(request.query, text);
        assert!(widget.apply_matches(
            request.generation,
            names.iter().copied().map(Match::new).collect()
        ));
        start + DELAY
    }

    #[test]
    fn construction_starts_inactive() {
        let widget = widget();
        assert!(widget.state().is_inactive());
        assert_eq!(widget.value(), "");
        assert_eq!(widget.in_flight(), None);
    }

    #[test]
    fn settled_text_issues_exactly_one_fetch() {
        let mut widget = widget();
        let start = Instant::now();
        type_text(&mut widget, "Ca", start);

        assert!(widget.tick(start + Duration::from_millis(299)).effects.is_empty());
        let effects = widget.tick(start + DELAY).effects;
        assert_eq!(
            effects,
            vec![Effect::Fetch(FetchRequest {
                generation: 1,
                query: "Ca".to_string(),
            })]
        );
        assert!(widget.tick(start + DELAY * 3).effects.is_empty());
        assert_eq!(widget.state().previous_value(), Some("Ca"));
    }

    #[test]
    fn rapid_edits_fetch_only_final_text() {
        let mut widget = widget();
        let start = Instant::now();
        type_text(&mut widget, "C", start);
        type_text(&mut widget, "a", start + Duration::from_millis(200));
        type_text(&mut widget, "n", start + Duration::from_millis(400));

        assert!(widget.tick(start + Duration::from_millis(650)).effects.is_empty());
        let effects = widget.tick(start + Duration::from_millis(700)).effects;
        let requests = fetches(&effects);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "Can");
    }

    #[test]
    fn empty_text_resets_without_fetch() {
        let mut widget = widget();
        let at = query(&mut widget, "C", &["Canada", "Chad"]);

        widget.handle_key(key(KeyCode::Backspace), at);
        let result = widget.tick(at + DELAY);

        assert!(result.handled);
        assert!(result.effects.is_empty());
        assert!(widget.state().is_inactive());
        let view = widget.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.overlay, "");
    }

    #[test]
    fn scenario_ca_shows_overlay_and_two_rows() {
        let mut widget = widget();
        query(&mut widget, "Ca", &["Canada", "Cameroon"]);

        let view = widget.view();
        assert_eq!(view.overlay, "Canada");
        assert_eq!(view.rows.len(), 2);
        assert!(view.rows.iter().all(|row| !row.selected));
        assert_eq!(widget.value(), "Ca");
    }

    #[test]
    fn scenario_ca_then_down_previews_first_row() {
        let mut widget = widget();
        let at = query(&mut widget, "Ca", &["Canada", "Cameroon"]);

        let outcome = widget.handle_key(key(KeyCode::Down), at);
        assert!(outcome.prevent_default);

        let view = widget.view();
        assert!(view.rows[0].selected);
        assert!(!view.rows[1].selected);
        assert_eq!(widget.value(), "Canada");
        assert_eq!(view.overlay, "");
        assert_eq!(widget.state().best_match_index(), None);
    }

    #[test]
    fn navigation_does_not_trigger_a_fetch() {
        let mut widget = widget();
        let at = query(&mut widget, "Ca", &["Canada", "Cameroon"]);
        widget.handle_key(key(KeyCode::Down), at);
        widget.handle_key(key(KeyCode::Down), at);

        assert!(widget.tick(at + DELAY * 2).effects.is_empty());
        assert_eq!(widget.value(), "Cameroon");
    }

    #[test]
    fn arrows_over_empty_result_do_nothing() {
        let mut widget = widget();
        let at = query(&mut widget, "Zz", &[]);

        let outcome = widget.handle_key(key(KeyCode::Down), at);
        assert!(outcome.prevent_default);
        widget.handle_key(key(KeyCode::Up), at);

        assert_eq!(widget.state().selected_index(), None);
        assert_eq!(widget.value(), "Zz");
    }

    #[test]
    fn up_from_no_selection_lands_on_last() {
        let mut widget = widget();
        let at = query(&mut widget, "Ca", &["Canada", "Cameroon", "Cambodia"]);

        widget.handle_key(key(KeyCode::Up), at);
        assert_eq!(widget.state().selected_index(), Some(2));
        assert_eq!(widget.value(), "Cambodia");
    }

    #[test]
    fn tab_accepts_best_match_and_resets() {
        let mut widget = widget();
        let at = query(&mut widget, "Ca", &["Canada", "Cameroon"]);

        let outcome = widget.handle_key(key(KeyCode::Tab), at);

        assert!(outcome.prevent_default);
        assert_eq!(widget.value(), "Canada");
        assert!(widget.state().is_inactive());
        assert_eq!(widget.view().overlay, "");
    }

    #[test]
    fn tab_without_best_match_falls_through() {
        let mut widget = widget();
        let at = query(&mut widget, "Ca", &["Canada", "Cameroon"]);
        widget.handle_key(key(KeyCode::Down), at);
        widget.handle_key(key(KeyCode::Down), at);

        let outcome = widget.handle_key(key(KeyCode::Tab), at);

        assert!(!outcome.prevent_default);
        assert_eq!(widget.value(), "Cameroon");
        assert!(widget.state().is_inactive());
    }

    #[test]
    fn escape_restores_value_captured_at_query_start() {
        let mut widget = widget();
        let at = query(&mut widget, "Ca", &["Canada", "Cameroon", "Cambodia"]);
        widget.handle_key(key(KeyCode::Down), at);
        widget.handle_key(key(KeyCode::Down), at);
        widget.handle_key(key(KeyCode::Up), at);
        assert_eq!(widget.value(), "Canada");

        widget.handle_key(key(KeyCode::Esc), at);

        assert_eq!(widget.value(), "Ca");
        assert!(widget.state().is_inactive());
    }

    #[test]
    fn escape_before_debounce_clears_text_and_skips_fetch() {
        let mut widget = widget();
        let start = Instant::now();
        type_text(&mut widget, "Ca", start);

        widget.handle_key(key(KeyCode::Esc), start + Duration::from_millis(50));
        assert_eq!(widget.value(), "");

        let effects = widget.tick(start + Duration::from_millis(400)).effects;
        assert!(fetches(&effects).is_empty());
        assert!(widget.state().is_inactive());
        assert_eq!(widget.in_flight(), None);
    }

    #[test]
    fn enter_submits_current_text_and_resets() {
        let mut widget = widget();
        let at = query(&mut widget, "Ca", &["Canada", "Cameroon"]);
        widget.handle_key(key(KeyCode::Down), at);

        let outcome = widget.handle_key(key(KeyCode::Enter), at);

        assert_eq!(outcome.effects, vec![Effect::Submit("Canada".to_string())]);
        assert!(widget.state().is_inactive());
    }

    #[test]
    fn mouse_down_selects_row() {
        let mut widget = widget();
        query(&mut widget, "Ca", &["Canada", "Cameroon"]);

        assert!(widget.handle_mouse_down(1));
        assert_eq!(widget.value(), "Cameroon");
        assert!(widget.state().is_inactive());
        assert!(!widget.handle_mouse_down(0));
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut widget = widget();
        let start = Instant::now();
        type_text(&mut widget, "C", start);
        let first = fetches(&widget.tick(start + DELAY).effects)[0].clone();

        type_text(&mut widget, "a", start + DELAY);
        let second = fetches(&widget.tick(start + DELAY * 2).effects)[0].clone();
        assert!(second.generation > first.generation);

        assert!(widget.apply_matches(second.generation, vec![Match::new("Canada")]));
        assert!(!widget.apply_matches(
            first.generation,
            vec![Match::new("Chad"), Match::new("Chile")]
        ));
        assert_eq!(widget.state().matches(), &[Match::new("Canada")]);
    }

    #[test]
    fn reset_disowns_in_flight_fetch() {
        let mut widget = widget();
        let start = Instant::now();
        type_text(&mut widget, "Ca", start);
        let request = fetches(&widget.tick(start + DELAY).effects)[0].clone();

        widget.handle_key(key(KeyCode::Esc), start + DELAY);

        assert!(!widget.apply_matches(request.generation, vec![Match::new("Canada")]));
        assert!(widget.state().is_inactive());
    }

    #[test]
    fn failed_completion_leaves_state_untouched() {
        let mut widget = widget();
        let at = query(&mut widget, "Ca", &["Canada"]);
        type_text(&mut widget, "n", at);
        let request = fetches(&widget.tick(at + DELAY).effects)[0].clone();
        let before = widget.state().clone();

        let applied = widget.apply_completion(FetchCompletion {
            generation: request.generation,
            query: request.query,
            result: Err(AutocompleteError::Io(std::io::Error::other("connection refused"))),
        });

        assert!(!applied);
        assert_eq!(widget.state(), &before);
    }
}
