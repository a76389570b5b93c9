//! Serde extensions

use serde::{Serialize, Serializer};

use crate::models::Color;

/// Preview colors are written as an `[r, g, b]` triple, the form web color pickers expect
pub fn serialize_color_as_array<S: Serializer>(color: &Color, s: S) -> Result<S::Ok, S::Error> {
    let (red, green, blue) = color.into_components();
    [red, green, blue].serialize(s)
}
