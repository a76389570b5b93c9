use std::io::{self, Write};

use strum::IntoEnumIterator;

use crate::{
    models::Light,
    modes::ActiveModes,
    panel::{Panel, PanelEvent},
    scenes::Preset,
};

/// Text rendering of the lighting panel
pub struct TextView<W> {
    out: W,
    columns: usize,
}

impl<W: Write> TextView<W> {
    pub fn new(out: W, columns: usize) -> Self {
        Self {
            out,
            columns: columns.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Redraw the parts of the panel affected by an event
    pub fn handle(&mut self, event: &PanelEvent, panel: &Panel) -> io::Result<()> {
        match event {
            PanelEvent::Refresh { .. } | PanelEvent::LightsChanged { .. } => {
                self.render_lights(panel)?;
                self.render_configuration(panel)
            }
            PanelEvent::LightChanged { index, .. } => {
                if let Some(light) = panel.registry().get(*index) {
                    let selected = *index == panel.registry().selected_index();
                    writeln!(self.out, "{}", Self::cell(*index, light, selected))?;
                }

                if *index == panel.registry().selected_index() {
                    self.render_configuration(panel)?;
                }

                Ok(())
            }
            PanelEvent::SelectionChanged { .. } => {
                self.render_lights(panel)?;
                self.render_configuration(panel)
            }
            PanelEvent::ModesChanged(modes) => self.render_modes(modes),
        }
    }

    pub fn render_all(&mut self, panel: &Panel) -> io::Result<()> {
        self.render_lights(panel)?;
        self.render_configuration(panel)?;
        self.render_modes(&panel.active_modes())
    }

    fn cell(index: usize, light: &Light, selected: bool) -> String {
        format!(
            "{}[{}] {} ({})",
            if selected { '*' } else { ' ' },
            index,
            light.name(),
            light.icon()
        )
    }

    /// Light buttons, `columns` per row, the selected one marked with `*`
    pub fn render_lights(&mut self, panel: &Panel) -> io::Result<()> {
        let registry = panel.registry();
        let selected = registry.selected_index();

        let cells: Vec<_> = registry
            .iter()
            .enumerate()
            .map(|(i, light)| Self::cell(i, light, i == selected))
            .collect();

        for row in cells.chunks(self.columns) {
            writeln!(self.out, "{}", row.join("  "))?;
        }

        Ok(())
    }

    /// Settings of the selected light
    pub fn render_configuration(&mut self, panel: &Panel) -> io::Result<()> {
        let index = panel.registry().selected_index();
        let light = panel.selected();
        let rgb = light.color().rgb();

        writeln!(self.out, "-- light {}: {} --", index, light.name())?;
        writeln!(
            self.out,
            "  state:     {}",
            if light.is_on() { "ON" } else { "OFF" }
        )?;
        writeln!(
            self.out,
            "  color:     {} #{:02x}{:02x}{:02x}",
            light.color(),
            rgb.red,
            rgb.green,
            rgb.blue
        )?;
        writeln!(self.out, "  intensity: {}%", light.intensity())
    }

    /// Preset buttons, matching ones in brackets
    pub fn render_modes(&mut self, modes: &ActiveModes) -> io::Result<()> {
        let buttons: Vec<_> = Preset::iter()
            .map(|preset| {
                if modes.contains(preset) {
                    format!("[{}]", preset.label())
                } else {
                    format!(" {} ", preset.label())
                }
            })
            .collect();

        writeln!(self.out, "presets: {}", buttons.join(" "))
    }

    pub fn message(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
