//! Shared theme tokens and accessibility profile hooks for dashboard rendering.

#![allow(missing_docs)]

use std::env;

use crate::analytics::knowledge::SeverityTone;
use crate::catalog::model::StatusLevel;

/// Contrast profile used by theme token selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContrastMode {
    Standard,
    High,
}

/// Color output mode for compatibility with `NO_COLOR` and `--no-color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Enabled,
    Disabled,
}

/// Accessibility knobs consumed by theme/layout primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityProfile {
    pub contrast: ContrastMode,
    pub color: ColorMode,
}

impl Default for AccessibilityProfile {
    fn default() -> Self {
        Self {
            contrast: ContrastMode::Standard,
            color: ColorMode::Enabled,
        }
    }
}

impl AccessibilityProfile {
    #[must_use]
    pub const fn from_no_color_flag(no_color: bool) -> Self {
        Self {
            contrast: ContrastMode::Standard,
            color: if no_color {
                ColorMode::Disabled
            } else {
                ColorMode::Enabled
            },
        }
    }

    /// Honors `NO_COLOR` and `LMON_HIGH_CONTRAST`, with `--no-color` on top.
    #[must_use]
    pub fn from_environment(no_color_flag: bool) -> Self {
        let no_color = no_color_flag || env::var_os("NO_COLOR").is_some();
        let high_contrast = env::var("LMON_HIGH_CONTRAST")
            .is_ok_and(|raw| matches!(raw.trim(), "1" | "true" | "yes"));
        Self {
            contrast: if high_contrast {
                ContrastMode::High
            } else {
                ContrastMode::Standard
            },
            ..Self::from_no_color_flag(no_color)
        }
    }

    #[must_use]
    pub const fn no_color(self) -> bool {
        matches!(self.color, ColorMode::Disabled)
    }
}

/// Semantic token category independent of concrete color codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SemanticToken {
    Accent,
    Success,
    Warning,
    Danger,
    Info,
    Muted,
    #[default]
    Neutral,
}

impl SemanticToken {
    #[must_use]
    pub const fn for_status(level: StatusLevel) -> Self {
        match level {
            StatusLevel::Ok => Self::Success,
            StatusLevel::Warning => Self::Warning,
            StatusLevel::Error => Self::Danger,
        }
    }

    #[must_use]
    pub const fn for_severity(tone: SeverityTone) -> Self {
        match tone {
            SeverityTone::Danger => Self::Danger,
            SeverityTone::Warning => Self::Warning,
            SeverityTone::Info => Self::Info,
        }
    }

    /// Trend delta coloring: gains are good, losses are not.
    #[must_use]
    pub fn for_delta(delta: f64) -> Self {
        if delta > 0.0 { Self::Success } else { Self::Danger }
    }
}

/// Render-facing palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub token: SemanticToken,
    pub color_tag: &'static str,
}

impl PaletteEntry {
    const fn new(token: SemanticToken, color_tag: &'static str) -> Self {
        Self { token, color_tag }
    }
}

/// Shared semantic palette for all dashboard panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub accent: PaletteEntry,
    pub success: PaletteEntry,
    pub warning: PaletteEntry,
    pub danger: PaletteEntry,
    pub info: PaletteEntry,
    pub muted: PaletteEntry,
    pub neutral: PaletteEntry,
}

impl ThemePalette {
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            accent: PaletteEntry::new(SemanticToken::Accent, "cyan"),
            success: PaletteEntry::new(SemanticToken::Success, "green"),
            warning: PaletteEntry::new(SemanticToken::Warning, "yellow"),
            danger: PaletteEntry::new(SemanticToken::Danger, "red"),
            info: PaletteEntry::new(SemanticToken::Info, "blue"),
            muted: PaletteEntry::new(SemanticToken::Muted, "dark-grey"),
            neutral: PaletteEntry::new(SemanticToken::Neutral, "white"),
        }
    }

    #[must_use]
    pub const fn high_contrast() -> Self {
        Self {
            accent: PaletteEntry::new(SemanticToken::Accent, "bright-cyan"),
            success: PaletteEntry::new(SemanticToken::Success, "bright-green"),
            warning: PaletteEntry::new(SemanticToken::Warning, "bright-yellow"),
            danger: PaletteEntry::new(SemanticToken::Danger, "bright-red"),
            info: PaletteEntry::new(SemanticToken::Info, "bright-blue"),
            muted: PaletteEntry::new(SemanticToken::Muted, "grey"),
            neutral: PaletteEntry::new(SemanticToken::Neutral, "bright-white"),
        }
    }

    #[must_use]
    pub const fn from_contrast(mode: ContrastMode) -> Self {
        match mode {
            ContrastMode::Standard => Self::standard(),
            ContrastMode::High => Self::high_contrast(),
        }
    }

    #[must_use]
    pub const fn entry(self, token: SemanticToken) -> PaletteEntry {
        match token {
            SemanticToken::Accent => self.accent,
            SemanticToken::Success => self.success,
            SemanticToken::Warning => self.warning,
            SemanticToken::Danger => self.danger,
            SemanticToken::Info => self.info,
            SemanticToken::Muted => self.muted,
            SemanticToken::Neutral => self.neutral,
        }
    }
}

/// Shared spacing scale used by all panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpacingScale {
    pub outer_padding: u16,
    /// Width of one metric card.
    pub card_width: u16,
    pub card_gap: u16,
}

impl SpacingScale {
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            outer_padding: 1,
            card_width: 22,
            card_gap: 1,
        }
    }

    #[must_use]
    pub const fn comfortable() -> Self {
        Self {
            outer_padding: 2,
            card_width: 26,
            card_gap: 2,
        }
    }

    #[must_use]
    pub const fn for_columns(cols: u16) -> Self {
        if cols < 100 {
            Self::compact()
        } else {
            Self::comfortable()
        }
    }
}

/// Full render theme (palette + spacing + accessibility profile).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accessibility: AccessibilityProfile,
    pub palette: ThemePalette,
    pub spacing: SpacingScale,
}

impl Theme {
    #[must_use]
    pub const fn for_terminal(cols: u16, accessibility: AccessibilityProfile) -> Self {
        Self {
            palette: ThemePalette::from_contrast(accessibility.contrast),
            spacing: SpacingScale::for_columns(cols),
            accessibility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_profile_disables_color_mode() {
        let profile = AccessibilityProfile::from_no_color_flag(true);
        assert!(profile.no_color());
        assert!(AccessibilityProfile::from_environment(true).no_color());
    }

    #[test]
    fn spacing_compacts_on_narrow_terminals() {
        let compact = SpacingScale::for_columns(80);
        let wide = SpacingScale::for_columns(140);
        assert!(compact.outer_padding < wide.outer_padding);
        assert!(compact.card_width < wide.card_width);
    }

    #[test]
    fn status_levels_map_to_semantic_tokens() {
        assert_eq!(
            SemanticToken::for_status(StatusLevel::Ok),
            SemanticToken::Success
        );
        assert_eq!(
            SemanticToken::for_status(StatusLevel::Warning),
            SemanticToken::Warning
        );
        assert_eq!(
            SemanticToken::for_status(StatusLevel::Error),
            SemanticToken::Danger
        );
    }

    #[test]
    fn severity_tones_map_to_semantic_tokens() {
        assert_eq!(
            SemanticToken::for_severity(SeverityTone::Danger),
            SemanticToken::Danger
        );
        assert_eq!(
            SemanticToken::for_severity(SeverityTone::Info),
            SemanticToken::Info
        );
    }

    #[test]
    fn palette_entry_lookup_is_total() {
        let palette = ThemePalette::high_contrast();
        for token in [
            SemanticToken::Accent,
            SemanticToken::Success,
            SemanticToken::Warning,
            SemanticToken::Danger,
            SemanticToken::Info,
            SemanticToken::Muted,
            SemanticToken::Neutral,
        ] {
            assert_eq!(palette.entry(token).token, token);
        }
    }
}
