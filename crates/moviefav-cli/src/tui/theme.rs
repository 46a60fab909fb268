//! Light and dark colour palettes.

use ratatui::style::{Color, Modifier, Style};

/// Colours used by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Screen background.
    pub background: Color,
    /// Body text.
    pub text: Color,
    /// Secondary text (hints, labels).
    pub muted: Color,
    /// Active tab, focused borders.
    pub accent: Color,
    /// Favorite marker and favorites tab.
    pub favorite: Color,
    /// Error banner.
    pub error: Color,
    /// Selected table row.
    pub highlight: Color,
}

impl Palette {
    /// Light palette.
    pub const LIGHT: Self = Self {
        background: Color::White,
        text: Color::Black,
        muted: Color::DarkGray,
        accent: Color::Blue,
        favorite: Color::Red,
        error: Color::Red,
        highlight: Color::Blue,
    };

    /// Dark palette.
    pub const DARK: Self = Self {
        background: Color::Black,
        text: Color::Gray,
        muted: Color::DarkGray,
        accent: Color::Cyan,
        favorite: Color::LightRed,
        error: Color::LightRed,
        highlight: Color::Cyan,
    };

    /// Picks the palette for the theme flag.
    #[must_use]
    pub const fn for_mode(is_dark_mode: bool) -> Self {
        if is_dark_mode { Self::DARK } else { Self::LIGHT }
    }

    /// Base style for a whole screen.
    #[must_use]
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for table headers.
    #[must_use]
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the selected row.
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }
}

/// Colour for a score on a 0-10 scale: green from 8, yellow from 6,
/// red below.
#[must_use]
pub fn rating_color(score: f32) -> Color {
    if score >= 8.0 {
        Color::Green
    } else if score >= 6.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Parses the leading number of a score string (`"8.8"`, `"74"`, `"87%"`)
/// and divides it by `scale`.
#[must_use]
pub fn parse_score(raw: &str, scale: f32) -> Option<f32> {
    let number: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse::<f32>().ok().map(|n| n / scale)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]

    use super::*;

    #[test]
    fn test_rating_color_thresholds() {
        assert_eq!(rating_color(8.8), Color::Green);
        assert_eq!(rating_color(8.0), Color::Green);
        assert_eq!(rating_color(7.9), Color::Yellow);
        assert_eq!(rating_color(6.0), Color::Yellow);
        assert_eq!(rating_color(5.9), Color::Red);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("8.8", 1.0), Some(8.8));
        assert_eq!(parse_score("74", 10.0), Some(7.4));
        assert_eq!(parse_score("87%", 10.0), Some(8.7));
        assert_eq!(parse_score("N/A", 1.0), None);
    }

    #[test]
    fn test_for_mode() {
        assert_eq!(Palette::for_mode(true), Palette::DARK);
        assert_eq!(Palette::for_mode(false), Palette::LIGHT);
    }
}
