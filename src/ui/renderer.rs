use crate::terminal::backend::clip_to_width;
use crate::terminal::{CursorPos, TerminalSize};
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::view::AutocompleteView;
use unicode_width::UnicodeWidthStr;

/// Frame row holding the label, the input and the inline completion.
pub const INPUT_ROW: u16 = 0;
/// Frame row of the first choice.
pub const LIST_TOP_ROW: u16 = 1;

const SELECTED_MARKER: &str = "› ";
const CHOICE_INDENT: &str = "  ";
const HINT: &str = "↑↓ choose  Tab complete  Enter submit  Esc cancel  Ctrl+C quit";

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

pub struct Renderer {
    theme: Theme,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Theme::default_theme())
    }
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(
        &self,
        view: &AutocompleteView,
        label: &str,
        input_width: u16,
        terminal_size: TerminalSize,
    ) -> RenderFrame {
        let mut frame = RenderFrame::default();

        let prompt = format!("{label}: ");
        let prompt_width = UnicodeWidthStr::width(prompt.as_str());
        let field_width = usize::from(input_width)
            .min(usize::from(terminal_size.width).saturating_sub(prompt_width + 1));

        let typed = clip_to_width(&view.input, field_width);
        let typed_width = UnicodeWidthStr::width(typed.as_str());
        let ghost = clip_to_width(view.ghost_suffix(), field_width.saturating_sub(typed_width));

        let mut input_line = vec![
            Span::styled(prompt, self.theme.label),
            Span::styled(typed, self.theme.input),
        ];
        if !ghost.is_empty() {
            input_line.push(Span::styled(ghost, self.theme.ghost));
        }
        frame.lines.push(input_line);

        let before_cursor: String = view.input.chars().take(view.cursor).collect();
        let cursor_col = prompt_width + UnicodeWidthStr::width(before_cursor.as_str());
        frame.cursor = Some(CursorPos {
            col: cursor_col.min(prompt_width + field_width).min(u16::MAX as usize) as u16,
            row: INPUT_ROW,
        });

        for row in &view.rows {
            let (marker, style) = if row.selected {
                (SELECTED_MARKER, self.theme.selected_choice)
            } else {
                (CHOICE_INDENT, self.theme.choice)
            };
            frame
                .lines
                .push(vec![Span::styled(format!("{marker}{}", row.label), style)]);
        }

        frame.lines.push(vec![Span::styled(HINT, self.theme.hint)]);
        frame
    }
}

/// Index of the choice painted on frame row `row`, if any.
pub fn choice_at_row(view: &AutocompleteView, row: u16) -> Option<usize> {
    let idx = usize::from(row.checked_sub(LIST_TOP_ROW)?);
    (idx < view.rows.len()).then_some(idx)
}
