//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use super::color::ColorTier;

/// Dashboard color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Black;
    pub const FG: Color = Color::White;

    // Queue labels
    pub const LABEL_FG: Color = Color::White;
    pub const LABEL_BG: Color = Color::Blue;

    // Histogram tiers
    pub const TIER_LOW: Color = Color::Green;
    pub const TIER_MID: Color = Color::Yellow;
    pub const TIER_HIGH: Color = Color::Red;
    pub const TIER_OVERFLOW: Color = Color::Magenta;
}

impl ColorTier {
    /// Foreground color used for bar segments of this tier.
    pub fn color(self) -> Color {
        match self {
            ColorTier::Low => Theme::TIER_LOW,
            ColorTier::Mid => Theme::TIER_MID,
            ColorTier::High => Theme::TIER_HIGH,
            ColorTier::Overflow => Theme::TIER_OVERFLOW,
        }
    }
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Emphasized header values.
    pub fn bold() -> Style {
        Self::default().add_modifier(Modifier::BOLD)
    }

    /// Queue number under each bar.
    pub fn label() -> Style {
        Style::default()
            .fg(Theme::LABEL_FG)
            .bg(Theme::LABEL_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Histogram segment of the given tier.
    pub fn tier(tier: ColorTier) -> Style {
        Style::default()
            .fg(tier.color())
            .bg(Theme::BG)
            .add_modifier(Modifier::BOLD)
    }
}
