use std::path::PathBuf;

use colored::Colorize;
use hubsource_core::host::{Host, MemoryHost, DEFAULT_NAMESPACE};
use hubsource_core::node::{register_nodes, EmitSummary, Node};
use hubsource_core::posts::{transform_posts, Post};
use hubsource_core::topics::TopicIndex;
use serde::Serialize;

use crate::api::HubspotClient;
use crate::config::SourceConfig;
use crate::prelude::{eprintln, println, *};
use crate::sinks::{DirectoryHost, JsonLinesHost};

#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Preview the nodes a run would create:
  hubsource source --key <hapikey>

  # Stream nodes as JSON lines:
  hubsource source --json > nodes.jsonl

  # Write one file per node, only published posts:
  hubsource source --filter state=PUBLISHED --out ./content/hubspot")]
pub struct SourceOptions {
    /// Write each node to <DIR>/<type>/<id>.json
    #[arg(long, value_name = "DIR", conflicts_with = "json")]
    pub out: Option<PathBuf>,

    /// Stream nodes to stdout as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Namespace mixed into generated node ids
    #[arg(long, env = "HUBSOURCE_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
}

/// Posts joined with their topics, before emission
#[derive(Debug, Clone)]
pub struct Sourced {
    pub posts: Vec<Post>,
    pub topics: TopicIndex,
    /// The topic fetch failed and the run continued without topics
    pub topics_failed: bool,
    /// Upstream reported more posts than the single page returned
    pub truncated: bool,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct SourceSummary {
    pub posts: usize,
    pub topics: usize,
    pub topics_failed: bool,
    pub truncated: bool,
}

/// Fetch topics and posts and join them.
///
/// The key is validated before any request. Both requests are issued
/// together; posts are only transformed once the topic index is complete.
/// A failed post fetch is fatal. A failed topic fetch is logged and the run
/// continues with no topics, unless `strict_topics` is set.
pub async fn fetch_and_transform(config: &SourceConfig) -> Result<Sourced, Error> {
    let options = config.options.clone().validate()?;
    let client = HubspotClient::new(&config.base_url, &options.key, config.timeout)?;

    log::info!(
        "Fetching posts from: {}",
        client.display_posts_url(&options.filters)
    );

    let (topics, posts) =
        futures::future::join(client.fetch_topics(), client.fetch_posts(&options.filters)).await;

    let (topics, topics_failed) = match topics {
        Ok(raw) => (TopicIndex::from_raw(raw), false),
        Err(err) if config.strict_topics => return Err(err),
        Err(err) => {
            log::error!("Failed to fetch topics, continuing without them: {err}");
            (TopicIndex::default(), true)
        }
    };

    let page = posts?;
    let truncated = page.is_truncated();
    if truncated {
        log::warn!(
            "Hubspot reports {} posts but returned {}; only the first page is sourced",
            page.total.unwrap_or_default(),
            page.objects.len()
        );
    }

    let posts = transform_posts(page.objects, &topics);
    log::info!("Found {} posts", posts.len());
    log::info!("Found {} topics", topics.topics().len());

    Ok(Sourced {
        posts,
        topics,
        topics_failed,
        truncated,
    })
}

/// Run the whole pipeline and register every node with `host`.
///
/// Nothing is registered unless both the post fetch and the transform
/// succeed.
pub async fn source_nodes<H: Host + ?Sized>(
    config: &SourceConfig,
    host: &mut H,
) -> Result<SourceSummary, Error> {
    let sourced = fetch_and_transform(config).await?;
    let EmitSummary { posts, topics } =
        register_nodes(host, &sourced.posts, sourced.topics.topics())?;

    Ok(SourceSummary {
        posts,
        topics,
        topics_failed: sourced.topics_failed,
        truncated: sourced.truncated,
    })
}

pub async fn run(options: SourceOptions, global: crate::Global) -> Result<()> {
    let config = SourceConfig::from_global(&global)?;

    if global.verbose {
        eprintln!("Hubspot API Base: {}", config.base_url);
        eprintln!();
    }

    if options.json {
        let mut host = JsonLinesHost::new(options.namespace, std::io::stdout().lock());
        let summary = source_nodes(&config, &mut host).await?;
        host.finish().wrap_err("Failed to write nodes to stdout")?;
        log::info!("Registered {} post and {} topic nodes", summary.posts, summary.topics);
        return Ok(());
    }

    if let Some(out) = options.out {
        let mut host = DirectoryHost::new(options.namespace, out);
        let summary = source_nodes(&config, &mut host).await?;
        let root = host.root().to_path_buf();
        let written = host
            .finish()
            .wrap_err_with(|| f!("Failed to write nodes to {}", root.display()))?;

        print_summary(&summary);
        println!(
            "\n{} {} {}",
            "Wrote".bright_white(),
            written.len().to_string().bright_cyan().bold(),
            f!("node files to {}", root.display()).bright_white()
        );
        return Ok(());
    }

    let mut host = MemoryHost::with_namespace(options.namespace);
    let summary = source_nodes(&config, &mut host).await?;
    print_nodes(&host.nodes);
    print_summary(&summary);

    Ok(())
}

fn print_nodes(nodes: &[Node]) {
    let mut table = new_table();
    table.add_row(prettytable::row!["TYPE", "ID", "HUBSPOT ID", "DIGEST"]);

    for node in nodes {
        let hubspot_id = node
            .fields
            .get("hubspotID")
            .map(|id| id.to_string())
            .unwrap_or_default();
        table.add_row(prettytable::row![
            node.internal.node_type,
            node.id,
            hubspot_id,
            &node.internal.content_digest[..8],
        ]);
    }

    table.printstd();
}

fn print_summary(summary: &SourceSummary) {
    println!(
        "\n{} {} {} {} {}",
        "Registered".bright_white(),
        summary.posts.to_string().bright_cyan().bold(),
        "post nodes and".bright_white(),
        summary.topics.to_string().bright_cyan().bold(),
        "topic nodes".bright_white()
    );

    if summary.topics_failed {
        println!(
            "{}",
            "Topic fetch failed; posts were sourced without topics.".yellow()
        );
    }

    if summary.truncated {
        println!(
            "{}",
            "Only the first page of posts was sourced. Narrow the run with --filter or raise --filter limit=<n>."
                .yellow()
        );
    }
}
