use thiserror::Error;

use crate::models::Light;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a light registry needs at least one light")]
    Empty,
    #[error("no light at position {index}, there are {len} lights")]
    NoSuchLight { index: usize, len: usize },
}

/// Ordered set of lights with one selected light
///
/// Positions are meaningful: presets address lights by position. The registry is never empty
/// and the selection always points at one of its lights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightRegistry {
    lights: Vec<Light>,
    selected: usize,
}

impl LightRegistry {
    /// Create a registry, selecting the first light
    pub fn new(lights: Vec<Light>) -> Result<Self, RegistryError> {
        if lights.is_empty() {
            return Err(RegistryError::Empty);
        }

        Ok(Self {
            lights,
            selected: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Mutable access to the lights, without the ability to add or remove any
    pub fn lights_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    pub fn get(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Light> {
        self.lights.iter()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &Light {
        &self.lights[self.selected]
    }

    pub fn selected_mut(&mut self) -> &mut Light {
        &mut self.lights[self.selected]
    }

    pub fn select(&mut self, index: usize) -> Result<&Light, RegistryError> {
        if index >= self.lights.len() {
            return Err(RegistryError::NoSuchLight {
                index,
                len: self.lights.len(),
            });
        }

        self.selected = index;
        Ok(&self.lights[index])
    }
}

impl<'a> IntoIterator for &'a LightRegistry {
    type Item = &'a Light;
    type IntoIter = std::slice::Iter<'a, Light>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LightColor;

    fn lights() -> Vec<Light> {
        vec![
            Light::new("A", 50, LightColor::Yellow, true),
            Light::new("B", 10, LightColor::Blue, false),
        ]
    }

    #[test]
    fn first_light_is_selected() {
        let registry = LightRegistry::new(lights()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.selected_index(), 0);
        assert_eq!(registry.selected().name(), "A");
        assert_eq!(registry.get(1).map(Light::name), Some("B"));
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert_eq!(LightRegistry::new(vec![]), Err(RegistryError::Empty));
    }

    #[test]
    fn select_and_mutate() {
        let mut registry = LightRegistry::new(lights()).unwrap();

        assert_eq!(registry.select(1).unwrap().name(), "B");
        registry.selected_mut().set_intensity(99);

        assert_eq!(registry.get(1).unwrap().intensity(), 99);
        assert_eq!(registry.get(0).unwrap().intensity(), 50);
    }

    #[test]
    fn out_of_range_selection_keeps_previous() {
        let mut registry = LightRegistry::new(lights()).unwrap();
        registry.select(1).unwrap();

        assert_eq!(
            registry.select(2),
            Err(RegistryError::NoSuchLight { index: 2, len: 2 })
        );
        assert_eq!(registry.selected_index(), 1);
    }
}
