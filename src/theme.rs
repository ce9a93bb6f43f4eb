use ratatui::style::{Color, Modifier, Style};

use crate::sections::SectionColor;

/// Theme configuration for the editor
#[derive(Clone, Debug)]
pub struct Theme {
    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the scripture reference in the header
    pub reference_color: Color,

    /// Color for the "one point" label
    pub statement_label_color: Color,

    /// Foreground color for placeholder text in empty fields
    pub placeholder_fg: Color,

    /// Border color of the focused field
    pub focus_border: Color,

    /// Border color of unfocused fields
    pub border: Color,

    /// Foreground color of the elapsed timer while running
    pub timer_running_fg: Color,

    /// Foreground color of the elapsed timer while paused
    pub timer_paused_fg: Color,

    /// Foreground color for the badge label text
    pub badge_fg: Color,

    /// Foreground color for the confirmation prompt
    pub prompt_fg: Color,

    /// Background color for the confirmation prompt
    pub prompt_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            reference_color: Color::LightYellow,
            statement_label_color: Color::Yellow,
            placeholder_fg: Color::DarkGray,
            focus_border: Color::White,
            border: Color::DarkGray,
            timer_running_fg: Color::LightGreen,
            timer_paused_fg: Color::Gray,
            badge_fg: Color::Black,
            prompt_fg: Color::Black,
            prompt_bg: Color::LightYellow,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Accent color for a section category
    pub fn section_color(&self, color: SectionColor) -> Color {
        match color {
            SectionColor::Cyan => Color::Cyan,
            SectionColor::Indigo => Color::Indexed(63),
            SectionColor::Violet => Color::Magenta,
            SectionColor::Amber => Color::Indexed(214),
            SectionColor::Orange => Color::Indexed(208),
            SectionColor::Emerald => Color::Green,
            SectionColor::Rose => Color::LightRed,
        }
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn reference_style(&self) -> Style {
        Style::default()
            .fg(self.reference_color)
            .add_modifier(Modifier::BOLD)
    }

    pub fn statement_label_style(&self) -> Style {
        Style::default()
            .fg(self.statement_label_color)
            .add_modifier(Modifier::BOLD)
    }

    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.placeholder_fg)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn timer_style(&self, running: bool) -> Style {
        let fg = if running {
            self.timer_running_fg
        } else {
            self.timer_paused_fg
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }

    /// Style of the label badge in a section header
    pub fn badge_style(&self, color: SectionColor) -> Style {
        Style::default()
            .fg(self.badge_fg)
            .bg(self.section_color(color))
            .add_modifier(Modifier::BOLD)
    }

    /// Style of the left rule next to section content
    pub fn rule_style(&self, color: SectionColor) -> Style {
        Style::default().fg(self.section_color(color))
    }

    /// Emphasis for the section under the live cursor
    pub fn live_active_style(&self, color: SectionColor) -> Style {
        Style::default()
            .fg(self.section_color(color))
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Sections away from the live cursor are dimmed
    pub fn live_dim_modifier(&self) -> Modifier {
        Modifier::DIM
    }

    pub fn prompt_style(&self) -> Style {
        Style::default()
            .fg(self.prompt_fg)
            .bg(self.prompt_bg)
            .add_modifier(Modifier::BOLD)
    }
}
