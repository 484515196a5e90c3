//! Fixed color palettes per presentation style.
//!
//! A theme is derived deterministically from the request's style and never
//! persisted. Styles without a dedicated palette use the clean-light default.

use serde::Serialize;

use crate::models::request::PresentationStyle;

/// An sRGB color emitted into slide XML as an uppercase hex triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex form without a leading '#', e.g. "F5F6FA".
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// The five slide colors a style maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub background: Rgb,
    pub title: Rgb,
    pub body: Rgb,
    pub accent: Rgb,
    pub subtitle: Rgb,
}

/// Clean light default — used for styles without a dedicated palette.
const CLEAN_LIGHT: Theme = Theme {
    background: Rgb::new(245, 246, 250),
    title: Rgb::new(20, 20, 20),
    body: Rgb::new(30, 30, 30),
    accent: Rgb::new(52, 120, 246),
    subtitle: Rgb::new(90, 90, 90),
};

const ACADEMIC: Theme = Theme {
    background: Rgb::new(250, 252, 255),
    title: Rgb::new(15, 40, 80),
    body: Rgb::new(35, 35, 45),
    accent: Rgb::new(52, 84, 209),
    subtitle: Rgb::new(70, 80, 110),
};

const STORYTELLING: Theme = Theme {
    background: Rgb::new(255, 251, 245),
    title: Rgb::new(80, 40, 20),
    body: Rgb::new(55, 45, 40),
    accent: Rgb::new(230, 126, 34),
    subtitle: Rgb::new(120, 90, 70),
};

const VISUAL: Theme = Theme {
    background: Rgb::new(245, 248, 255),
    title: Rgb::new(25, 25, 35),
    body: Rgb::new(40, 40, 50),
    accent: Rgb::new(46, 204, 113),
    subtitle: Rgb::new(90, 100, 120),
};

/// The one dark palette.
const TECHNICAL: Theme = Theme {
    background: Rgb::new(20, 24, 31),
    title: Rgb::new(236, 240, 241),
    body: Rgb::new(221, 230, 234),
    accent: Rgb::new(52, 152, 219),
    subtitle: Rgb::new(171, 178, 185),
};

impl Theme {
    pub fn for_style(style: PresentationStyle) -> Theme {
        match style {
            PresentationStyle::Academic => ACADEMIC,
            PresentationStyle::Storytelling => STORYTELLING,
            PresentationStyle::Visual => VISUAL,
            PresentationStyle::Technical => TECHNICAL,
            PresentationStyle::Interactive => CLEAN_LIGHT,
        }
    }
}
