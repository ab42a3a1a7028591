pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134);  // Subtle dim

        // Accents
        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const BLUE: Color = Color::Rgb(137, 180, 250);
    }
}

use nu_ansi_term::Style;
use catppuccin::Mocha as P;

/// Message styles used on stderr when it is a terminal.
pub struct MessageStyles {
    pub question: Style,
    pub hint: Style,
    pub success: Style,
    pub notice: Style,
    pub error: Style,
}

pub fn mocha() -> MessageStyles {
    MessageStyles {
        question: Style::new().fg(P::BLUE).bold(),
        hint: Style::new().fg(P::SURFACE2),
        success: Style::new().fg(P::GREEN).bold(),
        notice: Style::new().fg(P::YELLOW),
        error: Style::new().fg(P::RED).bold(),
    }
}

/// Plain styles for pipes, so redirected stderr stays free of escape codes.
pub fn plain() -> MessageStyles {
    MessageStyles {
        question: Style::new(),
        hint: Style::new(),
        success: Style::new(),
        notice: Style::new(),
        error: Style::new(),
    }
}
