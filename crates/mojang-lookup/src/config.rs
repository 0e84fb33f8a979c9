use std::time::Duration;

use clap::Parser;
use mojang_client::ResolverConfig;

/// Resolve Minecraft usernames to player UUIDs
#[derive(Debug, Parser)]
#[command(name = "mojang-lookup", version)]
pub struct Args {
    /// Usernames to resolve, in output order
    #[arg(required = true)]
    pub usernames: Vec<String>,

    /// Print a JSON array instead of tab-separated lines
    #[arg(long)]
    pub json: bool,

    /// Skip usernames that are not 2-16 word characters
    #[arg(long)]
    pub validate: bool,

    /// API root (overrides MOJANG_API_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// User-Agent header (overrides MOJANG_USER_AGENT)
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Give up on unfinished lookups after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}

/// Build the resolver configuration from environment variables, then apply
/// command line overrides
pub fn load_config(args: &Args) -> ResolverConfig {
    let mut config = config_from(|key| std::env::var(key).ok());

    if let Some(ref url) = args.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(ref ua) = args.user_agent {
        config.user_agent.clone_from(ua);
    }
    if let Some(secs) = args.deadline_secs {
        config.deadline = Some(Duration::from_secs(secs));
    }

    config
}

fn config_from(var: impl Fn(&str) -> Option<String>) -> ResolverConfig {
    let defaults = ResolverConfig::default();

    let base_url = var("MOJANG_API_URL").unwrap_or(defaults.base_url);
    let user_agent = var("MOJANG_USER_AGENT").unwrap_or(defaults.user_agent);

    let request_timeout = var("MOJANG_TIMEOUT_SECS")
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(defaults.request_timeout);

    let deadline = var("MOJANG_DEADLINE_SECS")
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .or(defaults.deadline);

    ResolverConfig {
        base_url,
        user_agent,
        request_timeout,
        deadline,
        ..defaults
    }
}
