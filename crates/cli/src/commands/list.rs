//! `list` command implementation.

use anyhow::{Context, Result};
use contracts::{Posting, PostingSource};
use ingestion::{LeverClient, PostingFilter};
use tracing::info;

use super::{finalize, resolve_source};
use crate::cli::ListArgs;

/// Execute the `list` command
///
/// Read-only: no snapshot or history is touched.
pub async fn run_list(args: &ListArgs) -> Result<()> {
    let config = finalize(resolve_source(&args.source)?)?;

    let filter = PostingFilter::from_pattern(config.pattern.as_deref())?;
    let client = LeverClient::from_config(&config)?;
    let postings = client
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch postings for '{}'", config.organization))?;
    let postings = filter.apply(postings);

    for posting in &postings {
        println!("{}", listing_line(posting));
    }

    info!(count = postings.len(), "Listed postings");
    Ok(())
}

fn listing_line(posting: &Posting) -> String {
    format!(
        "[{}] {} - {}",
        posting.team_or_placeholder(),
        posting.title,
        posting.location
    )
}
