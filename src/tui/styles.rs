//! Palette and text roles for the HeartGuard screens.
//!
//! Screens ask for a role (heading, body, outline...) rather than a color,
//! so the whole look is defined here.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::RiskLabel;

/// Heart glyph used in titles
pub const HEART: &str = "♥";

/// Medical theme: a teal accent over a slate background.
pub struct MedicalTheme;

impl MedicalTheme {
    pub const ACCENT: Color = Color::Rgb(13, 148, 136); // #0D9488
    pub const ACCENT_SOFT: Color = Color::Rgb(45, 212, 191); // #2DD4BF
    pub const CANVAS: Color = Color::Rgb(15, 23, 42); // #0F172A
    pub const OUTLINE: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const INK: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const INK_DIM: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const INK_FAINT: Color = Color::Rgb(100, 116, 139); // #64748B

    fn rgb((r, g, b): (u8, u8, u8)) -> Color {
        Color::Rgb(r, g, b)
    }

    /// Screen and panel titles.
    #[must_use]
    pub fn heading() -> Style {
        Style::new().fg(Self::INK).add_modifier(Modifier::BOLD)
    }

    /// Subtitles, focused field titles and key hints.
    #[must_use]
    pub fn accent() -> Style {
        Style::new().fg(Self::ACCENT_SOFT).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn body() -> Style {
        Style::new().fg(Self::INK)
    }

    /// Secondary labels and key descriptions.
    #[must_use]
    pub fn dim() -> Style {
        Style::new().fg(Self::INK_DIM)
    }

    /// Placeholders and the disclaimer.
    #[must_use]
    pub fn faint() -> Style {
        Style::new().fg(Self::INK_FAINT)
    }

    /// Confirmation messages, in the low-risk color.
    #[must_use]
    pub fn ok() -> Style {
        Style::new().fg(Self::rgb(RiskLabel::Low.color()))
    }

    /// Errors and the heart glyph, in the high-risk color.
    #[must_use]
    pub fn alert() -> Style {
        Style::new().fg(Self::rgb(RiskLabel::High.color()))
    }

    /// Filled call-to-action button.
    #[must_use]
    pub fn highlight() -> Style {
        Style::new()
            .fg(Self::CANVAS)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Block borders; `active` marks the focused block.
    #[must_use]
    pub fn outline(active: bool) -> Style {
        Style::new().fg(if active { Self::ACCENT } else { Self::OUTLINE })
    }

    /// Text cursor in numeric fields.
    #[must_use]
    pub fn cursor() -> Style {
        Style::new().fg(Self::ACCENT_SOFT)
    }

    /// Headline style for a predicted risk label.
    #[must_use]
    pub fn risk(label: RiskLabel) -> Style {
        Style::new()
            .fg(Self::rgb(label.color()))
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_styles_follow_label_colors() {
        assert_eq!(MedicalTheme::risk(RiskLabel::High).fg, MedicalTheme::alert().fg);
        assert_eq!(MedicalTheme::risk(RiskLabel::Low).fg, MedicalTheme::ok().fg);
        assert_ne!(MedicalTheme::outline(true), MedicalTheme::outline(false));
    }
}
