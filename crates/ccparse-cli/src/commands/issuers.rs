//! Issuers command - list the issuers the parser recognizes.

use clap::Args;
use console::style;

use super::{load_config, load_registry};

/// Arguments for the issuers command.
#[derive(Args)]
pub struct IssuersArgs {
    /// Print the names as a JSON array
    #[arg(long)]
    json: bool,
}

pub async fn run(args: IssuersArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&registry.names())?);
        return Ok(());
    }

    println!("{} {} supported issuer(s):", style("ℹ").blue(), registry.len());
    for profile in registry.iter() {
        println!(
            "  {:<16} {}",
            profile.name(),
            style(format!("(matches \"{}\")", profile.keyword())).dim()
        );
    }

    Ok(())
}
