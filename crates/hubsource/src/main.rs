use std::path::PathBuf;

use crate::prelude::*;
use clap::Parser;
use hubsource_core::query::DEFAULT_API_BASE;

mod api;
mod config;
mod error;
mod list_posts;
mod list_topics;
mod prelude;
mod sinks;
mod source;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Source HubSpot blog posts and topics as content-addressed nodes"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// TOML file with `key` and a `[filters]` table
    #[clap(long, env = "HUBSOURCE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// HubSpot API key (hapikey)
    #[clap(long, env = "HUBSPOT_API_KEY", global = true, hide_env_values = true)]
    key: Option<String>,

    /// Post-list filter as NAME=VALUE; repeat for more filters
    #[clap(long = "filter", value_name = "NAME=VALUE", global = true)]
    filters: Vec<String>,

    /// HubSpot API base URL
    #[clap(long, env = "HUBSPOT_API_BASE", global = true, default_value = DEFAULT_API_BASE)]
    base_url: String,

    /// Per-request timeout in seconds
    #[clap(long, env = "HUBSOURCE_TIMEOUT", global = true, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Abort when the topic list cannot be fetched instead of sourcing posts without topics
    #[clap(long, env = "HUBSOURCE_STRICT_TOPICS", global = true)]
    strict_topics: bool,

    /// Whether to display additional information.
    #[clap(long, env = "HUBSOURCE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Fetch posts and topics and register them as nodes
    Source(crate::source::SourceOptions),

    /// List blog topics
    Topics(crate::list_topics::ListTopicsOptions),

    /// List transformed blog posts with their resolved topics
    Posts(crate::list_posts::ListPostsOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Source(options) => crate::source::run(options, app.global).await,
        SubCommands::Topics(options) => crate::list_topics::run(options, app.global).await,
        SubCommands::Posts(options) => crate::list_posts::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
