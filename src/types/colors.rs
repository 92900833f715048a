// Copyright (c) 2024 Mike Tsao

//! Colours: the channel colours that consoles assign to strips, and the
//! button styles that feedback evaluation hands back to the host.

use super::{ConsoleModel, ScpValue};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// A 24-bit colour, serialized as the host expects: a single `0xRRGGBB` number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);
#[allow(missing_docs)]
impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

/// Foreground/background pair for a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ButtonStyle {
    /// Text colour.
    pub color: Rgb,
    /// Background colour.
    pub bgcolor: Rgb,
}
impl ButtonStyle {
    /// The highlight that a matched feedback shows unless configured otherwise.
    pub const ACTIVE: ButtonStyle = ButtonStyle {
        color: Rgb::WHITE,
        bgcolor: Rgb::RED,
    };
    /// A button's own appearance.
    pub const DEFAULT: ButtonStyle = ButtonStyle {
        color: Rgb::WHITE,
        bgcolor: Rgb::BLACK,
    };
}
impl Default for ButtonStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Every colour name that either console family uses for its channel strips.
#[allow(missing_docs)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    Eq,
    FromRepr,
    IntoStaticStr,
    PartialEq,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ChannelColor {
    Purple,
    Blue,
    SkyBlue,
    Cyan,
    Green,
    Yellow,
    Orange,
    Red,
    Pink,
    Magenta,
    White,
    #[default]
    Off,
}
impl ChannelColor {
    /// The strip colour itself.
    pub fn rgb(&self) -> Rgb {
        match self {
            ChannelColor::Purple => Rgb::new(128, 0, 255),
            ChannelColor::Blue => Rgb::new(0, 0, 255),
            ChannelColor::SkyBlue => Rgb::new(0, 128, 255),
            ChannelColor::Cyan => Rgb::new(0, 255, 255),
            ChannelColor::Green => Rgb::new(0, 192, 0),
            ChannelColor::Yellow => Rgb::new(255, 224, 0),
            ChannelColor::Orange => Rgb::new(255, 128, 0),
            ChannelColor::Red => Rgb::new(255, 0, 0),
            ChannelColor::Pink => Rgb::new(255, 96, 160),
            ChannelColor::Magenta => Rgb::new(255, 0, 255),
            ChannelColor::White => Rgb::WHITE,
            ChannelColor::Off => Rgb::BLACK,
        }
    }

    /// A readable button for this strip colour: the colour as background, with
    /// dark text on the light colours.
    pub fn style(&self) -> ButtonStyle {
        let color = match self {
            ChannelColor::Cyan
            | ChannelColor::Yellow
            | ChannelColor::White
            | ChannelColor::Green
            | ChannelColor::Pink => Rgb::BLACK,
            _ => Rgb::WHITE,
        };
        ButtonStyle {
            color,
            bgcolor: self.rgb(),
        }
    }
}

/// The ordered set of channel colours a console family offers. Consoles
/// report a colour either by name or by its position in this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(&'static [ChannelColor]);
impl Palette {
    const CL_QL: Palette = Palette(&[
        ChannelColor::Purple,
        ChannelColor::Blue,
        ChannelColor::SkyBlue,
        ChannelColor::Cyan,
        ChannelColor::Green,
        ChannelColor::Yellow,
        ChannelColor::Orange,
        ChannelColor::Red,
        ChannelColor::Pink,
        ChannelColor::Off,
    ]);
    const TF: Palette = Palette(&[
        ChannelColor::Blue,
        ChannelColor::Orange,
        ChannelColor::Yellow,
        ChannelColor::Red,
        ChannelColor::Cyan,
        ChannelColor::Magenta,
        ChannelColor::Green,
        ChannelColor::White,
        ChannelColor::Off,
    ]);

    #[allow(missing_docs)]
    pub fn for_model(model: ConsoleModel) -> Self {
        match model {
            ConsoleModel::ClQl => Self::CL_QL,
            ConsoleModel::Tf => Self::TF,
        }
    }

    #[allow(missing_docs)]
    pub fn colors(&self) -> &'static [ChannelColor] {
        self.0
    }

    /// Resolves a cached raw value to one of this palette's colours.
    pub fn resolve(&self, value: &ScpValue) -> Option<ChannelColor> {
        match value {
            ScpValue::Int(i) => usize::try_from(*i)
                .ok()
                .and_then(|i| self.0.get(i))
                .copied(),
            ScpValue::Text(name) => ChannelColor::from_str(name.trim())
                .ok()
                .filter(|c| self.0.contains(c)),
        }
    }
}
