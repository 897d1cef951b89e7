//! # tagstudio-cli
//!
//! A thin binary over [`tagstudio_core`]. Everything here is UI concern:
//! argument parsing (`args`), dispatch (`commands`), and terminal rendering
//! (`render`). No business logic lives in this crate; every command is a
//! direct call into `tagstudio_core::engine::Library` followed by
//! formatting, mirroring the separation the teacher's CLI layer keeps
//! between itself and `padzapp`.

mod args;
mod commands;
mod render;

use clap::Parser;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = args::Cli::parse();
    if let Err(e) = commands::run(cli) {
        eprintln!("{} {e}", render::error_prefix());
        std::process::exit(1);
    }
}
