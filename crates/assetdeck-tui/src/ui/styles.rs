use ratatui::style::{Color, Modifier, Style};

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub background: Color,
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
    pub highlight: Color,
    pub status_bar: Color,
}

pub const DARK: Palette = Palette {
    text: Color::White,
    background: Color::Rgb(20, 20, 28),
    primary: Color::Rgb(64, 128, 192),
    success: Color::Rgb(96, 160, 96),
    warning: Color::Rgb(192, 160, 64),
    error: Color::Rgb(192, 64, 64),
    muted: Color::Rgb(128, 128, 128),
    highlight: Color::Rgb(48, 48, 64),
    status_bar: Color::Rgb(32, 32, 40),
};

pub const LIGHT: Palette = Palette {
    text: Color::Rgb(24, 24, 32),
    background: Color::Rgb(248, 248, 250),
    primary: Color::Rgb(32, 96, 168),
    success: Color::Rgb(40, 120, 56),
    warning: Color::Rgb(160, 112, 0),
    error: Color::Rgb(176, 32, 32),
    muted: Color::Rgb(112, 112, 120),
    highlight: Color::Rgb(216, 224, 240),
    status_bar: Color::Rgb(228, 228, 236),
};

pub fn palette(dark_mode: bool) -> &'static Palette {
    if dark_mode {
        &DARK
    } else {
        &LIGHT
    }
}

/// Severity-like coloring for status and category cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Warn,
    Bad,
    Neutral,
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default().bg(self.highlight).add_modifier(Modifier::BOLD)
    }

    pub fn list_item(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn tab(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.primary)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.status_bar).fg(self.text)
    }

    pub fn help_key(&self) -> Style {
        Style::default().fg(self.warning).add_modifier(Modifier::BOLD)
    }

    pub fn tone(&self, tone: Tone) -> Style {
        match tone {
            Tone::Good => Style::default().fg(self.success),
            Tone::Warn => Style::default().fg(self.warning),
            Tone::Bad => Style::default().fg(self.error),
            Tone::Neutral => Style::default().fg(self.muted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_follows_dark_mode() {
        assert_eq!(*palette(true), DARK);
        assert_eq!(*palette(false), LIGHT);
        assert_ne!(DARK.background, LIGHT.background);
    }
}
