use clap::Parser;

use crate::cli::CliArgs;

mod cli;

pub type CliResult<T> = jpegenc_core::Result<T>;

fn main() -> CliResult<()> {
    env_logger::init();

    CliArgs::parse().run()
}
