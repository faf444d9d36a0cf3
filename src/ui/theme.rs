//! # Themes
//!
//! Every color the UI paints with comes from the active [`Theme`]; nothing
//! else holds a `ratatui::style::Color` literal. Themes are compiled in,
//! picked by name from the config or `--theme`, and cycled at runtime
//! with `t`.
//!
//! The status-class colors (2xx green, 3xx warning, 4xx/5xx and failed
//! red) are part of the theme so every palette stays readable for the
//! grid's dominant column.

use ratatui::style::Color;

/// A named set of UI colors.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Name shown in the footer while cycling and accepted by `--theme`.
    pub name: &'static str,

    /// Panel and popup background.
    pub bg: Color,
    /// Primary text.
    pub fg: Color,
    /// De-emphasized text: hints, labels, separators.
    pub fg_dim: Color,

    /// Branding, active tab, focused borders.
    pub accent: Color,
    /// Search matches and highlighted values.
    pub secondary: Color,

    /// 2xx responses.
    pub success: Color,
    /// 3xx responses.
    pub warning: Color,
    /// 4xx/5xx responses and requests that never completed.
    pub error: Color,

    /// Background of the highlighted grid row.
    pub selection_bg: Color,
}

impl Theme {
    /// Built-in themes in cycle order.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Look up a built-in theme, ignoring case.
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// The theme after this one in cycle order, wrapping at the end.
    pub fn following(&self) -> &'static Theme {
        let index = BUILT_IN_THEMES
            .iter()
            .position(|t| t.name == self.name)
            .unwrap_or(0);
        &BUILT_IN_THEMES[(index + 1) % BUILT_IN_THEMES.len()]
    }

    /// Color for a status code: success, warning, or error class. Status
    /// 0 (never completed) counts as an error.
    pub fn status_color(&self, status: u16) -> Color {
        match status {
            0 => self.error,
            s if s >= 400 => self.error,
            s if s >= 300 => self.warning,
            _ => self.success,
        }
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(r, g, b)
}

// Catppuccin values come straight from the published palettes; the dev
// tests below keep them honest against the catppuccin crate.
const CATPPUCCIN_MOCHA: Theme = Theme {
    name: "Catppuccin Mocha",
    bg: rgb(30, 30, 46),
    fg: rgb(205, 214, 244),
    fg_dim: rgb(108, 112, 134),
    accent: rgb(137, 180, 250),
    secondary: rgb(249, 226, 175),
    success: rgb(166, 227, 161),
    warning: rgb(250, 179, 135),
    error: rgb(243, 139, 168),
    selection_bg: rgb(69, 71, 90),
};

const CATPPUCCIN_MACCHIATO: Theme = Theme {
    name: "Catppuccin Macchiato",
    bg: rgb(36, 39, 58),
    fg: rgb(202, 211, 245),
    fg_dim: rgb(110, 115, 141),
    accent: rgb(138, 173, 244),
    secondary: rgb(238, 212, 159),
    success: rgb(166, 218, 149),
    warning: rgb(245, 169, 127),
    error: rgb(237, 135, 150),
    selection_bg: rgb(73, 77, 100),
};

const CATPPUCCIN_FRAPPE: Theme = Theme {
    name: "Catppuccin Frappe",
    bg: rgb(48, 52, 70),
    fg: rgb(198, 208, 245),
    fg_dim: rgb(115, 121, 148),
    accent: rgb(140, 170, 238),
    secondary: rgb(229, 200, 144),
    success: rgb(166, 209, 137),
    warning: rgb(239, 159, 118),
    error: rgb(231, 130, 132),
    selection_bg: rgb(81, 87, 109),
};

const DRACULA: Theme = Theme {
    name: "Dracula",
    bg: rgb(40, 42, 54),
    fg: rgb(248, 248, 242),
    fg_dim: rgb(98, 114, 164),
    accent: rgb(139, 233, 253),
    secondary: rgb(241, 250, 140),
    success: rgb(80, 250, 123),
    warning: rgb(255, 184, 108),
    error: rgb(255, 85, 85),
    selection_bg: rgb(68, 71, 90),
};

const NORD: Theme = Theme {
    name: "Nord",
    bg: rgb(46, 52, 64),
    fg: rgb(216, 222, 233),
    fg_dim: rgb(76, 86, 106),
    accent: rgb(136, 192, 208),
    secondary: rgb(235, 203, 139),
    success: rgb(163, 190, 140),
    warning: rgb(208, 135, 112),
    error: rgb(191, 97, 106),
    selection_bg: rgb(67, 76, 94),
};

const TOKYO_NIGHT: Theme = Theme {
    name: "Tokyo Night",
    bg: rgb(26, 27, 38),
    fg: rgb(169, 177, 214),
    fg_dim: rgb(86, 95, 137),
    accent: rgb(122, 162, 247),
    secondary: rgb(224, 175, 104),
    success: rgb(115, 218, 202),
    warning: rgb(255, 158, 100),
    error: rgb(247, 118, 142),
    selection_bg: rgb(41, 46, 66),
};

const GRUVBOX_DARK: Theme = Theme {
    name: "Gruvbox Dark",
    bg: rgb(40, 40, 40),
    fg: rgb(235, 219, 178),
    fg_dim: rgb(146, 131, 116),
    accent: rgb(131, 165, 152),
    secondary: rgb(250, 189, 47),
    success: rgb(184, 187, 38),
    warning: rgb(254, 128, 25),
    error: rgb(251, 73, 52),
    selection_bg: rgb(80, 73, 69),
};

static BUILT_IN_THEMES: [Theme; 7] = [
    CATPPUCCIN_MOCHA,
    CATPPUCCIN_MACCHIATO,
    CATPPUCCIN_FRAPPE,
    DRACULA,
    NORD,
    TOKYO_NIGHT,
    GRUVBOX_DARK,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ctp(color: catppuccin::Color) -> Color {
        rgb(color.rgb.r, color.rgb.g, color.rgb.b)
    }

    #[test]
    fn test_catppuccin_values_match_published_palettes() {
        let flavors = [
            ("Catppuccin Mocha", catppuccin::PALETTE.mocha.colors),
            ("Catppuccin Macchiato", catppuccin::PALETTE.macchiato.colors),
            ("Catppuccin Frappe", catppuccin::PALETTE.frappe.colors),
        ];

        for (name, palette) in flavors {
            let theme = Theme::by_name(name).expect("built-in theme");
            assert_eq!(theme.bg, ctp(palette.base), "{name} bg");
            assert_eq!(theme.fg, ctp(palette.text), "{name} fg");
            assert_eq!(theme.fg_dim, ctp(palette.overlay0), "{name} fg_dim");
            assert_eq!(theme.accent, ctp(palette.blue), "{name} accent");
            assert_eq!(theme.secondary, ctp(palette.yellow), "{name} secondary");
            assert_eq!(theme.success, ctp(palette.green), "{name} success");
            assert_eq!(theme.warning, ctp(palette.peach), "{name} warning");
            assert_eq!(theme.error, ctp(palette.red), "{name} error");
            assert_eq!(theme.selection_bg, ctp(palette.surface1), "{name} selection");
        }
    }

    #[test]
    fn test_default_theme_is_first() {
        assert_eq!(Theme::default_theme().name, Theme::all()[0].name);
        assert_eq!(Theme::default_theme().name, "Catppuccin Mocha");
    }

    #[test]
    fn test_by_name_ignores_case() {
        assert_eq!(
            Theme::by_name("gruvbox dark").map(|t| t.name),
            Some("Gruvbox Dark")
        );
        assert_eq!(
            Theme::by_name("DRACULA").map(|t| t.name),
            Some("Dracula")
        );
        assert!(Theme::by_name("light mode").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        let themes = Theme::all();
        for (i, theme) in themes.iter().enumerate() {
            for other in &themes[i + 1..] {
                assert_ne!(theme.name, other.name);
            }
        }
    }

    #[test]
    fn test_following_walks_every_theme_and_wraps() {
        let mut current = Theme::default_theme();
        let mut seen = vec![current.name];

        for _ in 1..Theme::all().len() {
            current = current.following();
            seen.push(current.name);
        }

        assert_eq!(seen.len(), Theme::all().len());
        assert_eq!(current.following().name, Theme::default_theme().name);
    }

    #[test]
    fn test_status_color_classes() {
        let theme = Theme::default_theme();
        assert_eq!(theme.status_color(200), theme.success);
        // Upgrade handshakes read as successes, not errors.
        assert_eq!(theme.status_color(101), theme.success);
        assert_eq!(theme.status_color(304), theme.warning);
        assert_eq!(theme.status_color(404), theme.error);
        assert_eq!(theme.status_color(500), theme.error);
        assert_eq!(theme.status_color(0), theme.error);
    }
}
