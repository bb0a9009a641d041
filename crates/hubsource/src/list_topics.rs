use hubsource_core::topics::{normalize_topics, Topic};

use crate::api::HubspotClient;
use crate::config::SourceConfig;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct ListTopicsOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ListTopicsOptions, global: crate::Global) -> Result<()> {
    let config = SourceConfig::from_global(&global)?;
    let topics = list_topics_data(&config).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&topics)?);
    } else {
        output_formatted(&topics);
    }

    Ok(())
}

/// Fetch every topic, failing on any upstream error
pub async fn list_topics_data(config: &SourceConfig) -> Result<Vec<Topic>> {
    let options = config.options.clone().validate()?;
    let client = HubspotClient::new(&config.base_url, &options.key, config.timeout)?;

    Ok(normalize_topics(client.fetch_topics().await?))
}

fn output_formatted(topics: &[Topic]) {
    let mut table = new_table();
    table.add_row(prettytable::row!["ID", "NAME", "SLUG"]);

    for topic in topics {
        let slug = value_text(topic.fields.get("slug")).unwrap_or_else(|| "-".to_string());
        table.add_row(prettytable::row![
            topic.id,
            value_text(topic.name.as_ref()).unwrap_or_else(|| "(unnamed)".to_string()),
            slug
        ]);
    }

    table.printstd();
    println!("\nFound {} topics", topics.len());
}
