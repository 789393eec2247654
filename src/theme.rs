use ratatui::style::{Color, Modifier, Style};

/// Colors used by the editor
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the editor
    pub background: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the note title above the region
    pub title_color: Color,

    /// Color for the unsaved-changes marker
    pub dirty_color: Color,

    /// Foreground color for active selection
    pub selection_fg: Color,

    /// Background color for active selection
    pub selection_bg: Color,

    /// Foreground color for `highlight` spans
    pub highlight_fg: Color,

    /// Background color for `highlight` spans
    pub highlight_bg: Color,

    /// Foreground color for `circle` spans
    pub circle_fg: Color,

    /// Color for headings
    pub headline_color: Color,

    /// Color for links
    pub link_color: Color,

    /// Color for inline code
    pub code_color: Color,

    /// Foreground color for the side-note panel
    pub side_note_fg: Color,

    /// Border color for the side-note panel
    pub side_note_border: Color,

    /// Foreground color for prompts
    pub prompt_fg: Color,

    /// Background color for prompts
    pub prompt_bg: Color,

    /// Foreground color for alerts
    pub alert_fg: Color,

    /// Background color for alerts
    pub alert_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            title_color: Color::LightYellow,
            dirty_color: Color::LightRed,
            selection_fg: Color::White,
            selection_bg: Color::LightBlue,
            highlight_fg: Color::Black,
            highlight_bg: Color::LightYellow,
            circle_fg: Color::LightRed,
            headline_color: Color::LightCyan,
            link_color: Color::Blue,
            code_color: Color::LightGreen,
            side_note_fg: Color::Gray,
            side_note_border: Color::DarkGray,
            prompt_fg: Color::White,
            prompt_bg: Color::Black,
            alert_fg: Color::White,
            alert_bg: Color::Red,
        }
    }
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_color)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dirty_style(&self) -> Style {
        Style::default().fg(self.dirty_color)
    }

    /// Get the style for selected text
    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection_fg).bg(self.selection_bg)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().fg(self.highlight_fg).bg(self.highlight_bg)
    }

    /// Circled text is drawn colored and underlined.
    pub fn circle_style(&self) -> Style {
        Style::default()
            .fg(self.circle_fg)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn headline_style(&self) -> Style {
        Style::default()
            .fg(self.headline_color)
            .add_modifier(Modifier::BOLD)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.link_color)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn code_style(&self) -> Style {
        Style::default().fg(self.code_color)
    }

    /// Get the style for the side-note panel
    pub fn side_note_style(&self) -> Style {
        Style::default().fg(self.side_note_fg)
    }

    pub fn side_note_border_style(&self) -> Style {
        Style::default().fg(self.side_note_border)
    }

    /// Get the style for the prompt popup
    pub fn prompt_style(&self) -> Style {
        Style::default().fg(self.prompt_fg).bg(self.prompt_bg)
    }

    pub fn alert_style(&self) -> Style {
        Style::default()
            .fg(self.alert_fg)
            .bg(self.alert_bg)
            .add_modifier(Modifier::BOLD)
    }
}
