use clap::Parser;
use std::path::PathBuf;

use crate::chunks::CHUNK_SIZE;
use crate::es::{DEFAULT_HOST, DEFAULT_INDEX, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(
    name = "demostat",
    about = "Demographic frequency distribution for the social profiles with given ids",
    version,
    long_about = None
)]
pub struct Args {
    /// Source file containing the ids of the profiles to look up
    pub source: PathBuf,

    /// Search backend host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Search backend port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Search index to query
    #[arg(long, default_value = DEFAULT_INDEX)]
    pub index: String,

    /// Number of ids submitted per search request
    #[arg(long, default_value_t = CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn validate_args(args: &Args) -> anyhow::Result<()> {
    if args.chunk_size == 0 {
        anyhow::bail!("--chunk-size must be greater than 0");
    }

    Ok(())
}
