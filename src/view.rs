use crate::widget::input::{TextInput, char_count};
use crate::widget::state::AutocompleteState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRow {
    pub label: String,
    pub selected: bool,
}

/// What a surface needs to paint the widget. Produced from state alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutocompleteView {
    pub input: String,
    pub cursor: usize,
    /// Typed text followed by the completion suffix; empty when there is
    /// no inline completion to show.
    pub overlay: String,
    pub rows: Vec<ChoiceRow>,
}

impl AutocompleteView {
    /// The part of the overlay drawn after the typed text.
    pub fn ghost_suffix(&self) -> &str {
        if self.overlay.is_empty() {
            return "";
        }
        let skip = char_count(&self.input);
        match self.overlay.char_indices().nth(skip) {
            Some((idx, _)) => &self.overlay[idx..],
            None => "",
        }
    }
}

pub fn render(input: &TextInput, state: &AutocompleteState) -> AutocompleteView {
    let mut view = AutocompleteView {
        input: input.value().to_string(),
        cursor: input.cursor(),
        ..AutocompleteView::default()
    };

    if !state.visible() {
        return view;
    }

    if let Some(best) = state.best_match() {
        view.overlay = overlay_text(input.value(), &best.name).unwrap_or_default();
    }

    view.rows = state
        .matches()
        .iter()
        .enumerate()
        .map(|(idx, m)| ChoiceRow {
            label: m.name.clone(),
            selected: state.selected_index() == Some(idx),
        })
        .collect();

    view
}

/// `value` followed by whatever of `name` extends past it. `None` unless
/// `name` starts with `value`, compared case-insensitively.
pub fn overlay_text(value: &str, name: &str) -> Option<String> {
    let typed = char_count(value);
    let starts_with = name.chars().count() >= typed
        && value
            .chars()
            .zip(name.chars())
            .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()));
    if !starts_with {
        return None;
    }

    let mut overlay = value.to_string();
    overlay.extend(name.chars().skip(typed));
    Some(overlay)
}
