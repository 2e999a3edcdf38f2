use crate::source::Match;

/// Everything the widget knows about the current query cycle.
///
/// Inactive baseline: not visible, no matches, no indices, no captured
/// value. Both indices always point into `matches` when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutocompleteState {
    pub(crate) matches: Vec<Match>,
    pub(crate) visible: bool,
    pub(crate) best_match_index: Option<usize>,
    pub(crate) selected_index: Option<usize>,
    pub(crate) previous_value: Option<String>,
}

impl AutocompleteState {
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn best_match_index(&self) -> Option<usize> {
        self.best_match_index
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn previous_value(&self) -> Option<&str> {
        self.previous_value.as_deref()
    }

    pub fn best_match(&self) -> Option<&Match> {
        self.matches.get(self.best_match_index?)
    }

    pub fn is_inactive(&self) -> bool {
        !self.visible
            && self.matches.is_empty()
            && self.best_match_index.is_none()
            && self.selected_index.is_none()
            && self.previous_value.is_none()
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// A fresh result: first match becomes the inline candidate.
    pub(crate) fn show_matches(&mut self, matches: Vec<Match>) {
        self.visible = true;
        self.best_match_index = if matches.is_empty() { None } else { Some(0) };
        self.selected_index = None;
        self.matches = matches;
    }

    /// Wraps from the last row (or no selection) to the first.
    pub(crate) fn select_next(&mut self) -> Option<&Match> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let next = match self.selected_index {
            Some(idx) if idx + 1 < len => idx + 1,
            _ => 0,
        };
        self.select(next)
    }

    /// Wraps from the first row (or no selection) to the last.
    pub(crate) fn select_prev(&mut self) -> Option<&Match> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let prev = match self.selected_index {
            Some(idx) if idx > 0 => idx - 1,
            _ => len - 1,
        };
        self.select(prev)
    }

    fn select(&mut self, idx: usize) -> Option<&Match> {
        self.selected_index = Some(idx);
        self.best_match_index = None;
        self.matches.get(idx)
    }
}
