//! Config command - Print or write the default controller configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::ControllerConfig;

#[derive(Parser, Debug)]
#[command(about = "Print the default controller configuration")]
pub struct ConfigArgs {
    /// Write the configuration to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    let config = ControllerConfig::default();
    match &args.output {
        Some(path) => {
            config
                .save(path)
                .with_context(|| format!("Failed to write config: {}", path.display()))?;
            println!("Wrote default configuration to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize configuration")?;
            println!("{json}");
        }
    }
    Ok(())
}
