use anyhow::Result;
use clap::Parser;

use airpaint::{
    cli::{Cli, Command},
    config::{DeskConfig, WebConfig},
    desk, web,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    match Cli::parse().command {
        Command::Web(args) => web::run(WebConfig::try_from(args)?),
        Command::Desk(args) => desk::run(DeskConfig::try_from(args)?),
    }
}
