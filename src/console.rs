//! Line-oriented control of the panel

use std::{
    convert::TryFrom,
    io::{self, Write},
};

use parse_display::{Display, FromStr};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::{
    models::LightColor,
    panel::{Panel, PanelError, PanelEvent},
    scenes::Preset,
    view::TextView,
};

pub const HELP: &str = "\
commands:
  preset <all-on|all-off|ambient|reading>
  select <index>
  intensity <0-100>
  color <yellow|blue|green|orange|white>
  on | off
  name <text>
  show | modes | state
  help | quit";

#[derive(Display, FromStr, Debug, Clone, PartialEq, Eq)]
#[display(style = "lowercase")]
pub enum ConsoleCommand {
    #[display("preset {0}")]
    Preset(Preset),
    #[display("select {0}")]
    Select(usize),
    #[display("intensity {0}")]
    Intensity(i64),
    #[display("color {0}")]
    Color(LightColor),
    On,
    Off,
    #[display("name {0}")]
    Name(String),
    Show,
    Modes,
    State,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type `help` for the list of commands")]
    Unknown(String),
    #[error("intensity must be between 0 and 100, got {0}")]
    IntensityOutOfRange(i64),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("error serializing state: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Errors the session cannot recover from
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::Io(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Panel, its view, and the subscription connecting them
pub struct Console<W> {
    panel: Panel,
    view: TextView<W>,
    events: broadcast::Receiver<PanelEvent>,
}

impl<W: Write> Console<W> {
    pub fn new(panel: Panel, view: TextView<W>) -> Self {
        let events = panel.subscribe();

        Self {
            panel,
            view,
            events,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn into_view(self) -> TextView<W> {
        self.view
    }

    /// Draw the whole panel
    pub fn refresh(&mut self) -> io::Result<()> {
        self.panel.refresh();
        self.render_events()
    }

    /// Parse and run one command line
    pub fn execute(&mut self, line: &str) -> Result<Outcome, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Outcome::Continue);
        }

        let command: ConsoleCommand = line
            .parse()
            .map_err(|_| CommandError::Unknown(line.to_owned()))?;

        debug!(command = %command, "executing");
        let outcome = self.run(command)?;
        self.render_events()?;
        Ok(outcome)
    }

    /// Run a command line, reporting recoverable errors to the user
    pub fn dispatch(&mut self, line: &str) -> Result<Outcome, CommandError> {
        match self.execute(line) {
            Err(error) if !error.is_fatal() => {
                warn!(error = %error, "command failed");
                self.view.message(format_args!("error: {}", error))?;
                self.view.flush()?;
                Ok(Outcome::Continue)
            }
            other => other,
        }
    }

    fn run(&mut self, command: ConsoleCommand) -> Result<Outcome, CommandError> {
        match command {
            ConsoleCommand::Preset(preset) => {
                self.panel.apply_preset(preset)?;
            }
            ConsoleCommand::Select(index) => {
                self.panel.select(index)?;
            }
            ConsoleCommand::Intensity(intensity) => {
                // Same bounds as the panel slider
                let intensity = i32::try_from(intensity)
                    .ok()
                    .filter(|value| (0..=100).contains(value))
                    .ok_or(CommandError::IntensityOutOfRange(intensity))?;

                self.panel.set_intensity(intensity);
            }
            ConsoleCommand::Color(color) => {
                self.panel.set_color(color);
            }
            ConsoleCommand::On => {
                self.panel.set_on(true);
            }
            ConsoleCommand::Off => {
                self.panel.set_on(false);
            }
            ConsoleCommand::Name(name) => {
                self.panel.set_name(name);
            }
            ConsoleCommand::Show => {
                self.view.render_all(&self.panel)?;
            }
            ConsoleCommand::Modes => {
                let modes = self.panel.active_modes();
                self.view.message(format_args!("active presets: {}", modes))?;
            }
            ConsoleCommand::State => {
                let state = serde_json::to_string_pretty(&self.panel.snapshot())?;
                self.view.message(state)?;
            }
            ConsoleCommand::Help => {
                self.view.message(HELP)?;
            }
            ConsoleCommand::Quit => {
                return Ok(Outcome::Quit);
            }
        }

        Ok(Outcome::Continue)
    }

    fn render_events(&mut self) -> io::Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.view.handle(&event, &self.panel)?,
                Err(broadcast::error::TryRecvError::Empty) => break,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped = %skipped, "view missed panel events, redrawing");
                    self.view.render_all(&self.panel)?;
                }
                Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }

        self.view.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{listing, registry::LightRegistry};

    fn console() -> Console<Vec<u8>> {
        let lights = listing::parse(
            "Hall\n50\n0\ntrue\n\nDesk\n10\n1\nfalse\n\nPorch\n80\n2\ntrue\n\nAttic\n5\n3\nfalse\n\n",
        )
        .unwrap();
        let panel = Panel::new(LightRegistry::new(lights).unwrap());

        Console::new(panel, TextView::new(Vec::new(), 3))
    }

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_view().into_inner()).unwrap()
    }

    #[test]
    fn parse_commands() {
        let cases = [
            ("preset all-on", ConsoleCommand::Preset(Preset::AllOn)),
            ("preset reading", ConsoleCommand::Preset(Preset::Reading)),
            ("select 2", ConsoleCommand::Select(2)),
            ("intensity 45", ConsoleCommand::Intensity(45)),
            ("color blue", ConsoleCommand::Color(LightColor::Blue)),
            ("on", ConsoleCommand::On),
            ("off", ConsoleCommand::Off),
            (
                "name Living room",
                ConsoleCommand::Name("Living room".to_owned()),
            ),
            ("show", ConsoleCommand::Show),
            ("modes", ConsoleCommand::Modes),
            ("state", ConsoleCommand::State),
            ("help", ConsoleCommand::Help),
            ("quit", ConsoleCommand::Quit),
        ];

        for (line, expected) in cases.iter() {
            assert_eq!(&line.parse::<ConsoleCommand>().unwrap(), expected, "{}", line);
        }

        assert!("preset party".parse::<ConsoleCommand>().is_err());
        assert!("select -1".parse::<ConsoleCommand>().is_err());
        assert!("intensity high".parse::<ConsoleCommand>().is_err());
        assert!("dance".parse::<ConsoleCommand>().is_err());
    }

    #[test]
    fn presets_and_mutators() {
        let mut console = console();

        assert_eq!(console.execute("preset ambient").unwrap(), Outcome::Continue);
        assert!(console.panel().active_modes().contains(Preset::Ambient));

        console.execute("select 1").unwrap();
        console.execute("color white").unwrap();
        console.execute("intensity 60").unwrap();
        console.execute("name Reading lamp").unwrap();

        let light = console.panel().registry().get(1).unwrap();
        assert_eq!(light.name(), "Reading lamp");
        assert_eq!(light.color(), LightColor::White);
        assert_eq!(light.intensity(), 60);
        assert!(light.is_on());
        assert!(console.panel().active_modes().is_empty());

        console.execute("off").unwrap();
        assert!(!console.panel().selected().is_on());
    }

    #[test]
    fn rendered_output() {
        let mut console = console();
        console.refresh().unwrap();
        console.execute("preset all-off").unwrap();

        let output = output(console);
        assert!(output.contains("*[0] Hall (bulb_yellow.jpg)"));
        assert!(output.contains("*[0] Hall (bulb_off.jpg)"));
        assert!(output.ends_with("presets:  All on  [All off]  Ambient   Reading \n"));
    }

    #[test]
    fn recoverable_errors_are_reported() {
        let mut console = console();

        assert_eq!(console.dispatch("select 9").unwrap(), Outcome::Continue);
        assert_eq!(console.dispatch("intensity 101").unwrap(), Outcome::Continue);
        assert_eq!(console.dispatch("intensity 300").unwrap(), Outcome::Continue);
        assert_eq!(console.dispatch("intensity -5").unwrap(), Outcome::Continue);
        assert_eq!(console.dispatch("launch").unwrap(), Outcome::Continue);
        assert_eq!(console.panel().registry().selected_index(), 0);
        assert_eq!(console.panel().selected().intensity(), 50);

        let output = output(console);
        assert!(output.contains("error: no light at position 9, there are 4 lights"));
        assert!(output.contains("error: intensity must be between 0 and 100, got 101"));
        assert!(output.contains("error: intensity must be between 0 and 100, got 300"));
        assert!(output.contains("error: intensity must be between 0 and 100, got -5"));
        assert!(!output.contains("unknown command \"intensity"));
        assert!(output.contains("error: unknown command \"launch\""));
    }

    #[test]
    fn reading_needs_three_lights() {
        let panel = Panel::new(
            LightRegistry::new(listing::parse("A\n1\n0\ntrue\n\nB\n1\n0\ntrue\n\n").unwrap())
                .unwrap(),
        );
        let mut console = Console::new(panel, TextView::new(Vec::new(), 3));

        assert!(matches!(
            console.execute("preset reading"),
            Err(CommandError::Panel(PanelError::Scene(_)))
        ));
        assert!(console.panel().selected().is_on());
    }

    #[test]
    fn state_is_json() {
        let mut console = console();
        console.execute("preset all-on").unwrap();
        console.execute("state").unwrap();

        let output = output(console);
        let json_start = output.find('{').unwrap();
        let state: serde_json::Value = serde_json::from_str(&output[json_start..]).unwrap();

        assert_eq!(state["modes"], serde_json::json!(["all-on"]));
        assert_eq!(state["lights"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn quit_and_blank_lines() {
        let mut console = console();

        assert_eq!(console.execute("   ").unwrap(), Outcome::Continue);
        assert_eq!(console.execute(" quit ").unwrap(), Outcome::Quit);
    }
}
