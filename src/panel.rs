//! Lighting panel session
//!
//! [`Panel`] owns the light registry and is the only way to change it. Every change is
//! published as a [`PanelEvent`] on a broadcast channel, views subscribe to it and query the
//! panel to render themselves.

use parse_display::Display;
use serde_derive::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::{
    models::{Color, Light, LightColor},
    modes::{self, ActiveModes},
    registry::{LightRegistry, RegistryError},
    scenes::{Preset, SceneError},
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Attribute of a single light
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
#[display(style = "lowercase")]
pub enum LightField {
    Name,
    Intensity,
    Color,
    Power,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Views should redraw everything
    Refresh { count: usize },
    /// A preset changed every light
    LightsChanged { preset: Preset },
    LightChanged { index: usize, field: LightField },
    SelectionChanged { index: usize },
    /// Matching presets, sent after every change
    ModesChanged(ActiveModes),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightState {
    pub name: String,
    pub intensity: i32,
    pub color: LightColor,
    #[serde(serialize_with = "crate::serde::serialize_color_as_array")]
    pub rgb: Color,
    pub is_on: bool,
    pub icon: &'static str,
}

impl From<&Light> for LightState {
    fn from(light: &Light) -> Self {
        Self {
            name: light.name().to_owned(),
            intensity: light.intensity(),
            color: light.color(),
            rgb: light.color().rgb(),
            is_on: light.is_on(),
            icon: light.icon(),
        }
    }
}

/// Serializable view of the whole panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelState {
    pub selected: usize,
    pub modes: ActiveModes,
    pub lights: Vec<LightState>,
}

pub struct Panel {
    registry: LightRegistry,
    event_tx: broadcast::Sender<PanelEvent>,
}

impl Panel {
    pub fn new(registry: LightRegistry) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self { registry, event_tx }
    }

    pub fn registry(&self) -> &LightRegistry {
        &self.registry
    }

    pub fn selected(&self) -> &Light {
        self.registry.selected()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.event_tx.subscribe()
    }

    /// Presets matching the current state
    pub fn active_modes(&self) -> ActiveModes {
        modes::detect(&self.registry)
    }

    pub fn snapshot(&self) -> PanelState {
        PanelState {
            selected: self.registry.selected_index(),
            modes: self.active_modes(),
            lights: self.registry.iter().map(LightState::from).collect(),
        }
    }

    /// Ask every subscriber to redraw from scratch
    pub fn refresh(&self) -> ActiveModes {
        self.publish(PanelEvent::Refresh {
            count: self.registry.len(),
        });
        self.publish_modes()
    }

    pub fn apply_preset(&mut self, preset: Preset) -> Result<ActiveModes, PanelError> {
        preset.apply(&mut self.registry)?;

        self.publish(PanelEvent::LightsChanged { preset });
        Ok(self.publish_modes())
    }

    pub fn select(&mut self, index: usize) -> Result<&Light, PanelError> {
        self.registry.select(index)?;

        trace!(index, "selected light");
        self.publish(PanelEvent::SelectionChanged { index });
        Ok(self.registry.selected())
    }

    pub fn set_intensity(&mut self, intensity: i32) -> ActiveModes {
        self.modify(LightField::Intensity, |light| light.set_intensity(intensity))
    }

    pub fn set_on(&mut self, is_on: bool) -> ActiveModes {
        self.modify(LightField::Power, |light| light.set_on(is_on))
    }

    pub fn set_color(&mut self, color: LightColor) -> ActiveModes {
        self.modify(LightField::Color, |light| light.set_color(color))
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ActiveModes {
        let name = name.into();
        self.modify(LightField::Name, move |light| light.set_name(name))
    }

    fn modify(&mut self, field: LightField, f: impl FnOnce(&mut Light)) -> ActiveModes {
        let index = self.registry.selected_index();
        f(self.registry.selected_mut());

        trace!(index, field = %field, "modified light");
        self.publish(PanelEvent::LightChanged { index, field });
        self.publish_modes()
    }

    fn publish_modes(&self) -> ActiveModes {
        let modes = self.active_modes();
        self.publish(PanelEvent::ModesChanged(modes.clone()));
        modes
    }

    fn publish(&self, event: PanelEvent) {
        // Nobody listening is fine, the panel works headless
        if self.event_tx.send(event).is_err() {
            trace!("no panel subscribers");
        }
    }
}
