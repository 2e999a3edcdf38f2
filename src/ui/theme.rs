use crate::ui::style::{Color, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub label: Style,
    pub input: Style,
    pub ghost: Style,
    pub choice: Style,
    pub selected_choice: Style,
    pub hint: Style,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            label: Style::new().color(Color::Cyan).bold(),
            input: Style::new(),
            ghost: Style::new().color(Color::DarkGrey).dim(),
            choice: Style::new(),
            selected_choice: Style::new().color(Color::White).background(Color::Blue).bold(),
            hint: Style::new().color(Color::DarkGrey),
        }
    }
}
