/// Semantic role of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Muted,
    Progress,
    Error,
    Success,
    Link,
}

/// A fixed lookup table from tone to ANSI style. Nothing is computed.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    styles: &'static [(Tone, &'static str)],
}

const RESET: &str = "\x1b[0m";

pub static MODERN: Theme = Theme {
    name: "modern",
    styles: &[
        (Tone::Heading, "\x1b[1;34m"),
        (Tone::Muted, "\x1b[2m"),
        (Tone::Progress, "\x1b[36m"),
        (Tone::Error, "\x1b[31m"),
        (Tone::Success, "\x1b[32m"),
        (Tone::Link, "\x1b[4;34m"),
    ],
};

pub static PLAIN: Theme = Theme {
    name: "plain",
    styles: &[],
};

static THEMES: &[&Theme] = &[&MODERN, &PLAIN];

impl Theme {
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        THEMES
            .iter()
            .copied()
            .find(|theme| theme.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn style_for(&self, tone: Tone) -> Option<&'static str> {
        self.styles
            .iter()
            .find(|(candidate, _)| *candidate == tone)
            .map(|(_, style)| *style)
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        match self.style_for(tone) {
            Some(style) => format!("{style}{text}{RESET}"),
            None => text.to_string(),
        }
    }
}
