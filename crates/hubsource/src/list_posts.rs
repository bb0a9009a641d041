use colored::Colorize;
use hubsource_core::posts::Post;

use crate::config::SourceConfig;
use crate::prelude::{println, *};
use crate::source::fetch_and_transform;

#[derive(Debug, clap::Args, Clone)]
pub struct ListPostsOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ListPostsOptions, global: crate::Global) -> Result<()> {
    let config = SourceConfig::from_global(&global)?;
    let sourced = fetch_and_transform(&config).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&sourced.posts)?);
    } else {
        println!("{}", format_posts_text(&sourced.posts));
    }

    Ok(())
}

fn format_posts_text(posts: &[Post]) -> String {
    let mut result = String::new();

    result.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&f!(
        "{}\n",
        f!("HUBSPOT BLOG POSTS ({})", posts.len()).bright_cyan().bold()
    ));
    result.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));

    if posts.is_empty() {
        result.push_str(&f!("\n{}\n", "No posts found.".yellow()));
        return result;
    }

    for post in posts {
        result.push_str(&f!(
            "\n{} {}\n",
            f!("[{}]", post.id).yellow().bold(),
            value_text(post.title.as_ref())
                .unwrap_or_else(|| "(No title)".to_string())
                .white()
                .bold()
        ));

        if let Some(url) = value_text(post.absolute_url.as_ref()) {
            result.push_str(&f!("    {}: {}\n", "URL".green(), url.cyan().underline()));
        }

        let author = value_text(post.author.as_ref().and_then(|a| a.name.as_ref()))
            .unwrap_or_else(|| "unknown".to_string());
        let topics = if post.topics.is_empty() {
            "-".to_string()
        } else {
            post.topics
                .iter()
                .map(|t| value_text(t.name.as_ref()).unwrap_or_else(|| t.id.clone()))
                .collect::<Vec<_>>()
                .join(", ")
        };

        result.push_str(&f!(
            "    {}: {} | {}: {} | {}: {}\n",
            "By".green(),
            author.bright_white(),
            "State".green(),
            value_text(post.state.as_ref())
                .unwrap_or_else(|| "unknown".to_string())
                .bright_yellow(),
            "Topics".green(),
            topics.bright_magenta()
        ));
    }

    result
}
