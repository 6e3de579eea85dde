use ratatui::style::{Color, Modifier, Style};

/// School colours for the dashboard
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Brand
    pub maroon: Color,
    pub gold: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub highlight_bg: Color,

    pub error: Color,

    /// Grade chart bars cycle through these
    pub bar_palette: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        Self::school()
    }
}

impl Theme {
    /// Maroon and gold, as on the school banner
    pub fn school() -> Self {
        let maroon = Color::Rgb(139, 0, 0);
        let gold = Color::Rgb(218, 165, 32);

        Self {
            name: "SK Klang Gate".to_string(),
            colors: ThemeColors {
                maroon,
                gold,
                border: Color::DarkGray,
                border_focused: gold,
                text_primary: Color::White,
                text_secondary: Color::Gray,
                highlight_bg: Color::Rgb(60, 45, 10),
                error: Color::Red,
                bar_palette: [
                    maroon,
                    gold,
                    Color::Rgb(192, 192, 192),
                    Color::Rgb(205, 127, 50),
                    Color::Rgb(165, 42, 42),
                    Color::Rgb(210, 105, 30),
                ],
            },
        }
    }

    /// Colour of the i-th grade bar
    pub fn grade_bar(&self, index: usize) -> Color {
        self.colors.bar_palette[index % self.colors.bar_palette.len()]
    }

    /// Specialization bars alternate gold and maroon
    pub fn specialization_bar(&self, index: usize) -> Color {
        if index % 2 == 0 {
            self.colors.gold
        } else {
            self.colors.maroon
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.gold)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_tab(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.colors.gold)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.colors.text_secondary)
    }

    pub fn border(&self, focused: bool) -> Style {
        let color = if focused {
            self.colors.border_focused
        } else {
            self.colors.border
        };
        Style::default().fg(color)
    }
}
