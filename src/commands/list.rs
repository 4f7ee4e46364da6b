//! List the posts the repository returns

use anyhow::Result;

use crate::content::{estimate_read_time, ListingAggregator, Post};
use crate::helpers::Helpers;
use crate::prismic::{ContentClient, Ordering, PrismicClient};
use crate::Spacetraveling;

/// Print every post, newest first
pub async fn run(site: &Spacetraveling) -> Result<()> {
    let client = PrismicClient::from_config(&site.config)?;
    let helpers = Helpers::new(site.config.clone());

    let lines = post_lines(&client, &helpers).await?;
    println!("Posts ({}):", lines.len());
    for line in lines {
        println!("  {}", line);
    }

    Ok(())
}

/// One line per post: date, uid, title and read time
pub async fn post_lines<C: ContentClient + ?Sized>(
    client: &C,
    helpers: &Helpers,
) -> Result<Vec<String>> {
    let listing = ListingAggregator::new(client);
    let pages = listing
        .load_all(helpers.config().per_page, Ordering::PublicationDateDesc)
        .await?;

    Ok(pages
        .iter()
        .flat_map(|page| page.results.iter())
        .map(|post| post_line(helpers, post))
        .collect())
}

fn post_line(helpers: &Helpers, post: &Post) -> String {
    let date = helpers
        .date(post.first_publication_date)
        .unwrap_or_else(|| "draft".to_string());
    format!(
        "{} - {} [{}] {} min",
        date,
        post.title,
        post.uid,
        estimate_read_time(post)
    )
}
