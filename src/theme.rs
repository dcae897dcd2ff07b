//! Theme data model: built-in palettes and resolution from config.

use ratatui::style::Color;

use crate::config::ThemeSection;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub folder_fg: Color,
    pub file_fg: Color,
    pub chevron_fg: Color,

    // Navigation bar
    pub nav_bg: Color,
    pub nav_fg: Color,
    pub nav_external_fg: Color,
    pub nav_overflow_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),       // #cdd6f4 (text)
        tree_selected_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        tree_selected_fg: Color::Rgb(205, 214, 244),
        folder_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)
        file_fg: Color::Rgb(205, 214, 244),
        chevron_fg: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)

        nav_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        nav_fg: Color::Rgb(205, 214, 244),
        nav_external_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        nav_overflow_fg: Color::Rgb(203, 166, 247), // #cba6f7 (mauve)

        status_bg: Color::Rgb(30, 30, 46),
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        info_fg: Color::Rgb(137, 180, 250),
        accent_fg: Color::Rgb(203, 166, 247),
        dim_fg: Color::Rgb(108, 112, 134),
    }
}

/// Light theme — complementary light palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105), // #4c4f69 (text)
        tree_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        tree_selected_fg: Color::Rgb(76, 79, 105),
        folder_fg: Color::Rgb(30, 102, 245), // #1e66f5 (blue)
        file_fg: Color::Rgb(76, 79, 105),
        chevron_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)

        nav_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        nav_fg: Color::Rgb(76, 79, 105),
        nav_external_fg: Color::Rgb(64, 160, 43), // #40a02b (green)
        nav_overflow_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)

        status_bg: Color::Rgb(239, 241, 245),
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        info_fg: Color::Rgb(30, 102, 245),
        accent_fg: Color::Rgb(136, 57, 239),
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

/// Resolve the final `ThemeColors` from config.
pub fn resolve_theme(config: &ThemeSection) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        _ => dark_theme(), // "dark" or any unrecognized value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dark_theme() {
        let config = ThemeSection {
            scheme: Some("dark".to_string()),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.folder_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_resolve_light_theme() {
        let config = ThemeSection {
            scheme: Some("light".to_string()),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.folder_fg, Color::Rgb(30, 102, 245));
    }

    #[test]
    fn test_resolve_default_is_dark() {
        let theme = resolve_theme(&ThemeSection::default());
        assert_eq!(theme.folder_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_unknown_scheme_falls_back_to_dark() {
        let config = ThemeSection {
            scheme: Some("neon".to_string()),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.folder_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_dark_and_light_different() {
        let dark = dark_theme();
        let light = light_theme();
        assert_ne!(dark.tree_fg, light.tree_fg);
        assert_ne!(dark.folder_fg, light.folder_fg);
        assert_ne!(dark.error_fg, light.error_fg);
    }
}
