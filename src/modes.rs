//! Classification of the current light state against the presets
//!
//! Predicates are evaluated on demand and independently of each other. After manual edits
//! the state may match no preset at all; every matching preset is reported.

use std::{collections::BTreeSet, fmt, iter::FromIterator};

use serde_derive::Serialize;
use strum::IntoEnumIterator;

use crate::{
    models::LightColor,
    registry::LightRegistry,
    scenes::{Preset, AMBIENT_INTENSITY, FULL_INTENSITY, READING_INTENSITY, READING_LIGHTS},
};

/// Every light is on, white, at full intensity
pub fn is_all_on(registry: &LightRegistry) -> bool {
    registry
        .iter()
        .all(|light| light.is_lit_with(FULL_INTENSITY, LightColor::White))
}

/// Every light is off, whatever its color and intensity
pub fn is_all_off(registry: &LightRegistry) -> bool {
    registry.iter().all(|light| !light.is_on())
}

pub fn is_ambient(registry: &LightRegistry) -> bool {
    registry
        .iter()
        .all(|light| light.is_lit_with(AMBIENT_INTENSITY, LightColor::Yellow))
}

/// The reading lights are on, white, at reading intensity. Other lights are not checked.
pub fn is_reading(registry: &LightRegistry) -> bool {
    READING_LIGHTS.iter().all(|&i| {
        registry
            .get(i)
            .map_or(false, |light| light.is_lit_with(READING_INTENSITY, LightColor::White))
    })
}

impl Preset {
    pub fn matches(self, registry: &LightRegistry) -> bool {
        match self {
            Preset::AllOn => is_all_on(registry),
            Preset::AllOff => is_all_off(registry),
            Preset::Ambient => is_ambient(registry),
            Preset::Reading => is_reading(registry),
        }
    }
}

/// Presets matching the light state at some point
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActiveModes(BTreeSet<Preset>);

impl ActiveModes {
    pub fn contains(&self, preset: Preset) -> bool {
        self.0.contains(&preset)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<Preset> for ActiveModes {
    fn from_iter<T: IntoIterator<Item = Preset>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ActiveModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "none");
        }

        for (i, preset) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", preset)?;
        }

        Ok(())
    }
}

/// Every preset the registry currently matches
pub fn detect(registry: &LightRegistry) -> ActiveModes {
    Preset::iter()
        .filter(|preset| preset.matches(registry))
        .collect()
}
