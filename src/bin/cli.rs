// src/bin/cli.rs
use color_eyre::eyre::WrapErr;
use lichen_territory::{cli, loge};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    cli::run()
        .inspect_err(|e| loge!("{e}"))
        .wrap_err("lichen pass failed")
}
