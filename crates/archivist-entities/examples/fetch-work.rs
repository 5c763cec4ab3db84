//! Example: fetch a work by ID and print its metadata.
//!
//! Usage: `cargo run --example fetch-work -- 12345`

use archivist_client::Session;
use archivist_core::{ClientConfig, WorkId};
use archivist_entities::Work;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let id = std::env::args()
        .nth(1)
        .ok_or("usage: fetch-work <work-id>")?;

    // One session for the whole process: every entity built on it shares
    // the same rate limit and cookie jar.
    let config = ClientConfig::load_with_env()?;
    let session = Arc::new(Session::new(&config)?);

    let work = Work::new(WorkId::new(id)?, session.clone());
    println!("Fetching {}...\n", work.url());

    println!("Title:     {}", work.title().await?);
    println!("Author:    {}", work.author().await?);
    println!("Language:  {}", work.language().await?);
    println!("Words:     {}", work.words().await?);
    println!(
        "Chapters:  {}/{}",
        work.chapters_published().await?,
        work.chapters_expected()
            .await?
            .map_or_else(|| "?".to_string(), |n| n.to_string())
    );
    println!("Kudos:     {}", work.kudos().await?);

    if let Some(summary) = work.summary().await? {
        println!("\n{summary}");
    }

    let tags = work.tags().await?;
    if !tags.is_empty() {
        println!("\nTags: {}", tags.join(", "));
    }

    session.close().await;
    Ok(())
}
