/// Colors handed to the renderer at construction

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

use crate::utils::ThemeConfig;
use crate::widgets::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub cursor: Color,
    pub kill_cursor: Color,
    pub border: Color,
    pub active_border: Color,
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from(&ThemeConfig::default())
    }
}

fn parse_color(name: &str, fallback: Color) -> Color {
    Color::from_str(name).unwrap_or_else(|_| {
        warn!("Unknown color '{}', using {:?}", name, fallback);
        fallback
    })
}

impl From<&ThemeConfig> for Theme {
    fn from(config: &ThemeConfig) -> Self {
        Self {
            cursor: parse_color(&config.cursor, Color::Cyan),
            kill_cursor: parse_color(&config.kill_cursor, Color::Magenta),
            border: parse_color(&config.border, Color::Cyan),
            active_border: parse_color(&config.active_border, Color::White),
            header: parse_color(&config.header, Color::Yellow),
        }
    }
}

impl Theme {
    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header).add_modifier(Modifier::BOLD)
    }

    pub fn cursor_style(&self, killing: bool) -> Style {
        let bg = if killing { self.kill_cursor } else { self.cursor };
        Style::default().fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD)
    }

    pub fn tone_color(&self, tone: Tone) -> Option<Color> {
        match tone {
            Tone::Plain => None,
            Tone::Good => Some(Color::Green),
            Tone::Warn => Some(Color::Yellow),
            Tone::Bad => Some(Color::Red),
        }
    }

    pub fn border_style(&self, active: bool) -> Style {
        Style::default().fg(if active { self.active_border } else { self.border })
    }
}
