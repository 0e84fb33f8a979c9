//! mojang-lookup - resolve Minecraft usernames to UUIDs from the command line

mod config;
mod error;
mod output;

use clap::Parser;
use mojang_client::{is_valid_username, CancellationToken, UuidResolver};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::{load_config, Args};
use crate::error::{LookupError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    let env_filter = EnvFilter::from_default_env()
        .add_directive("mojang_lookup=info".parse()?)
        .add_directive("mojang_client=info".parse()?);

    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    };

    let args = Args::parse();
    let config = load_config(&args);
    info!(base_url = %config.base_url, "Resolving {} usernames", args.usernames.len());

    let names: Vec<String> = if args.validate {
        args.usernames
            .iter()
            .filter(|name| {
                let valid = is_valid_username(name);
                if !valid {
                    warn!(username = %name, "Skipping invalid username");
                }
                valid
            })
            .cloned()
            .collect()
    } else {
        args.usernames.clone()
    };
    if names.is_empty() {
        return Err(LookupError::NoUsernames);
    }

    let resolver = UuidResolver::builder()
        .config(config)
        .without_cache()
        .build()?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, abandoning pending lookups");
            on_interrupt.cancel();
        }
    });

    let resolution = resolver.resolve_with(&names, &cancel).await?;
    for diagnostic in &resolution.diagnostics {
        warn!("{}", diagnostic);
    }

    let rendered = if args.json {
        output::render_json(&names, &resolution.ids)? + "\n"
    } else {
        output::render_lines(&names, &resolution.ids)
    };
    print!("{rendered}");

    let resolved = resolution.ids.iter().filter(|id| id.is_some()).count();
    info!(resolved, total = names.len(), "Lookup finished");

    Ok(())
}
