#[macro_use]
extern crate tracing;

use std::path::PathBuf;

use structopt::StructOpt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Builder;
use tokio::signal;

use domotica::{
    console::{Console, Outcome},
    listing,
    models::Config,
    panel::Panel,
    registry::LightRegistry,
    view::TextView,
};

#[derive(Debug, StructOpt)]
struct Opts {
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u32,
    #[structopt(short, long = "config")]
    config_path: Option<PathBuf>,
    /// Light listing, overrides the configuration file
    #[structopt(short, long = "lights")]
    lights_path: Option<PathBuf>,
    #[structopt(long)]
    dump_config: bool,
    /// Run these commands instead of reading stdin
    #[structopt(short, long = "exec")]
    exec: Vec<String>,
}

async fn run(opts: Opts) -> color_eyre::eyre::Result<()> {
    // Load configuration
    let mut config = if let Some(config_path) = opts.config_path.as_deref() {
        Config::load_file(config_path)?
    } else {
        Config::load_default()?
    };

    if let Some(lights_path) = opts.lights_path {
        config.lights.path = Some(lights_path);
    }

    // Dump configuration if this was asked
    if opts.dump_config {
        print!("{}", config.to_string()?);
        return Ok(());
    }

    // Any listing problem is fatal
    let lights = listing::load(config.lights.path.as_deref())?;
    let panel = Panel::new(LightRegistry::new(lights)?);
    info!(lights = panel.registry().len(), "panel ready");

    let mut console = Console::new(
        panel,
        TextView::new(std::io::stdout(), config.view.columns),
    );
    console.refresh()?;

    if !opts.exec.is_empty() {
        for line in &opts.exec {
            if console.dispatch(line)? == Outcome::Quit {
                break;
            }
        }

        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if console.dispatch(&line)? == Outcome::Quit {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    Ok(())
}

/// Log filter used when `DOMOTICA_LOG` is not set
fn default_filter(verbose: u32) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // The library and the binary log under their own targets
    format!("domotica={level},domotica_panel={level}", level = level)
}

fn install_tracing(opts: &Opts) -> color_eyre::eyre::Result<()> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match EnvFilter::try_from_env("DOMOTICA_LOG") {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(opts.verbose))?,
    };

    // stdout belongs to the panel view, logs go to stderr
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(opts.verbose > 1),
        )
        .with(filter)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

#[paw::main]
fn main(opts: Opts) -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    install_tracing(&opts)?;

    let rt = Builder::new_current_thread().enable_all().build()?;
    rt.block_on(run(opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_both_targets() {
        assert_eq!(default_filter(0), "domotica=warn,domotica_panel=warn");
        assert_eq!(default_filter(2), "domotica=debug,domotica_panel=debug");
        assert_eq!(default_filter(7), "domotica=trace,domotica_panel=trace");
    }
}
