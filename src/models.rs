use std::convert::TryFrom;

use parse_display::{Display, FromStr};
use serde_derive::{Deserialize, Serialize};
use strum_macros::EnumIter;
use thiserror::Error;

mod config;
pub use config::*;

pub type Color = palette::rgb::LinSrgb<u8>;

/// Icon key shown for any light that is switched off
pub const OFF_ICON: &str = "bulb_off.jpg";

#[derive(Debug, Error)]
#[error("unknown color index {0}, expected 0 to 4")]
pub struct UnknownColorIndex(pub i64);

/// Palette a light can be set to
///
/// The declaration order is the index order used by light listings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    FromStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LightColor {
    Yellow,
    Blue,
    Green,
    Orange,
    White,
}

impl LightColor {
    pub fn index(self) -> usize {
        self as usize
    }

    /// RGB value used to preview this color
    pub fn rgb(self) -> Color {
        match self {
            LightColor::Yellow => Color::new(255, 221, 0),
            LightColor::Blue => Color::new(0, 102, 255),
            LightColor::Green => Color::new(0, 204, 51),
            LightColor::Orange => Color::new(255, 136, 0),
            LightColor::White => Color::new(255, 255, 255),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            LightColor::Yellow => "bulb_yellow.jpg",
            LightColor::Blue => "bulb_blue.jpg",
            LightColor::Green => "bulb_green.jpg",
            LightColor::Orange => "bulb_orange.jpg",
            LightColor::White => "bulb_white.jpg",
        }
    }
}

impl TryFrom<i64> for LightColor {
    type Error = UnknownColorIndex;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        Ok(match index {
            0 => LightColor::Yellow,
            1 => LightColor::Blue,
            2 => LightColor::Green,
            3 => LightColor::Orange,
            4 => LightColor::White,
            other => return Err(UnknownColorIndex(other)),
        })
    }
}

/// A simulated lamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    name: String,
    intensity: i32,
    color: LightColor,
    is_on: bool,
}

impl Light {
    pub fn new(name: impl Into<String>, intensity: i32, color: LightColor, is_on: bool) -> Self {
        Self {
            name: name.into(),
            intensity,
            color,
            is_on,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Intensity as a percentage, stored as given
    pub fn intensity(&self) -> i32 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: i32) {
        self.intensity = intensity;
    }

    pub fn color(&self) -> LightColor {
        self.color
    }

    pub fn set_color(&mut self, color: LightColor) {
        self.color = color;
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn set_on(&mut self, is_on: bool) {
        self.is_on = is_on;
    }

    /// Switch the light on with the given settings
    pub fn light_up(&mut self, intensity: i32, color: LightColor) {
        self.is_on = true;
        self.intensity = intensity;
        self.color = color;
    }

    /// true if the light is on, at exactly this intensity and color
    pub fn is_lit_with(&self, intensity: i32, color: LightColor) -> bool {
        self.is_on && self.intensity == intensity && self.color == color
    }

    pub fn icon(&self) -> &'static str {
        if self.is_on {
            self.color.icon()
        } else {
            OFF_ICON
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn color_indices_follow_declaration_order() {
        for (i, color) in LightColor::iter().enumerate() {
            assert_eq!(color.index(), i);
            assert_eq!(LightColor::try_from(i as i64).unwrap(), color);
        }

        assert!(LightColor::try_from(5).is_err());
        assert!(LightColor::try_from(-1).is_err());
    }

    #[test]
    fn color_names_parse() {
        assert_eq!("orange".parse::<LightColor>().unwrap(), LightColor::Orange);
        assert_eq!(LightColor::White.to_string(), "white");
        assert!("purple".parse::<LightColor>().is_err());
    }

    #[test]
    fn attributes_round_trip() {
        let mut light = Light::new("Lamp", 10, LightColor::Blue, false);

        light.set_name("Reading lamp");
        assert_eq!(light.name(), "Reading lamp");

        light.set_intensity(73);
        assert_eq!(light.intensity(), 73);

        light.set_on(true);
        assert!(light.is_on());

        light.set_color(LightColor::Green);
        assert_eq!(light.color(), LightColor::Green);
    }

    #[test]
    fn off_lights_use_the_off_icon() {
        let mut light = Light::new("Lamp", 50, LightColor::Orange, true);
        assert_eq!(light.icon(), "bulb_orange.jpg");

        light.set_on(false);
        assert_eq!(light.icon(), OFF_ICON);
    }

    #[test]
    fn lit_with_compares_color_values() {
        let light = Light::new("Lamp", 100, LightColor::White, true);

        assert!(light.is_lit_with(100, LightColor::White));
        assert!(!light.is_lit_with(100, LightColor::Yellow));
        assert!(!light.is_lit_with(60, LightColor::White));
    }
}
