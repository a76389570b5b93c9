use parse_display::{Display, FromStr};
use serde_derive::{Deserialize, Serialize};
use strum_macros::EnumIter;
use thiserror::Error;

use crate::{models::LightColor, registry::LightRegistry};

pub const FULL_INTENSITY: i32 = 100;
pub const AMBIENT_INTENSITY: i32 = 30;
pub const READING_INTENSITY: i32 = 60;

/// Positions of the lights used by the reading scene
pub const READING_LIGHTS: [usize; 2] = [0, 2];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("the {preset} preset needs at least {required} lights, there are {available}")]
    NotEnoughLights {
        preset: Preset,
        required: usize,
        available: usize,
    },
}

/// Named bulk configuration of every light
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
#[display(style = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    AllOn,
    AllOff,
    Ambient,
    Reading,
}

impl Preset {
    /// Button label
    pub fn label(self) -> &'static str {
        match self {
            Preset::AllOn => "All on",
            Preset::AllOff => "All off",
            Preset::Ambient => "Ambient",
            Preset::Reading => "Reading",
        }
    }

    /// Number of lights the preset needs to be well-defined
    pub fn required_lights(self) -> usize {
        match self {
            Preset::Reading => READING_LIGHTS.iter().max().map_or(0, |i| i + 1),
            _ => 1,
        }
    }

    /// Apply the preset to every light of the registry
    ///
    /// Applying the same preset again leaves the registry unchanged. On error the registry is
    /// not modified.
    pub fn apply(self, registry: &mut LightRegistry) -> Result<(), SceneError> {
        let required = self.required_lights();
        if registry.len() < required {
            return Err(SceneError::NotEnoughLights {
                preset: self,
                required,
                available: registry.len(),
            });
        }

        match self {
            Preset::AllOn => {
                for light in registry.lights_mut() {
                    light.light_up(FULL_INTENSITY, LightColor::White);
                }
            }
            Preset::AllOff => {
                for light in registry.lights_mut() {
                    light.set_on(false);
                }
            }
            Preset::Ambient => {
                for light in registry.lights_mut() {
                    light.light_up(AMBIENT_INTENSITY, LightColor::Yellow);
                }
            }
            Preset::Reading => {
                for (i, light) in registry.lights_mut().iter_mut().enumerate() {
                    if READING_LIGHTS.contains(&i) {
                        light.light_up(READING_INTENSITY, LightColor::White);
                    } else {
                        light.set_on(false);
                    }
                }
            }
        }

        debug!(preset = %self, lights = registry.len(), "applied preset");
        Ok(())
    }
}
