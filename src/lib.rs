//! `domotica` simulates a home-lighting control panel.
//!
//! # Structure
//!
//! * [`models`]: lights, their color palette and the configuration file
//! * [`listing`]: loader for the light listing text format
//! * [`registry`]: the ordered set of lights and the current selection
//! * [`scenes`]: the All-On, All-Off, Ambient and Reading presets
//! * [`modes`]: detection of the presets matching the current state
//! * [`panel`]: the session object owning the lights and publishing changes
//! * [`view`] and [`console`]: text front-end
//!
//! # License
//!
//! This source code is released under the [MIT-License](https://opensource.org/licenses/MIT)

#[macro_use]
extern crate tracing;

pub mod console;
pub mod listing;
pub mod models;
pub mod modes;
pub mod panel;
pub mod registry;
pub mod scenes;
pub mod serde;
pub mod view;
