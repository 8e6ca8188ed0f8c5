use std::rc::Rc;

use clap::Parser;
use mirage_core::Ladder;
use wasm_bindgen::prelude::*;

mod app;
mod map;
mod modes;
mod progress;
mod round;
mod timers;
mod utils;

const LEVELS_JSON: &str = include_str!("../../data/levels.json");
const MODES_TOML: &str = include_str!("../../data/modes.toml");

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Which screen preset to play
    #[arg(short, long, value_enum, default_value_t)]
    mode: modes::Mode,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    if let Err(err) = boot() {
        log::error!("failed to start: {:#}", err);
    }
}

fn boot() -> anyhow::Result<()> {
    use anyhow::Context;
    use gloo::utils::{document, window};

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&']))
        .context("could not parse args from location hash")?;
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).context("could not initialize logger")?;
    }
    log::debug!("mode: {:?}", args.mode);

    let levels = mirage_core::load_levels(LEVELS_JSON).context("bundled level data")?;
    let ladder = Ladder::new(levels, progress::LocalProgress)?;
    let config = modes::config_for(args.mode, MODES_TOML);

    let root = document()
        .get_element_by_id("game")
        .context("could not find id=\"game\" element")?;

    log::debug!("App started");
    yew::Renderer::<app::App>::with_root_and_props(
        root,
        app::AppProps {
            ladder: Rc::new(ladder),
            config,
            mode: args.mode,
        },
    )
    .render();
    Ok(())
}
