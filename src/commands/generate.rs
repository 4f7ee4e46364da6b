//! Generate static files

use anyhow::Result;

use crate::generator::{GenerateSummary, Generator};
use crate::prismic::{ContentClient, PrismicClient};
use crate::Spacetraveling;

/// Generate the static site from the configured repository
pub async fn run(site: &Spacetraveling) -> Result<()> {
    let client = PrismicClient::from_config(&site.config)?;
    run_with_client(site, &client).await?;
    Ok(())
}

/// Generate the static site from any content client
pub async fn run_with_client<C: ContentClient + ?Sized>(
    site: &Spacetraveling,
    client: &C,
) -> Result<GenerateSummary> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let summary = generator.generate(client).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts ({} listing pages) in {:.2}s",
        summary.posts,
        summary.pages,
        duration.as_secs_f64()
    );

    Ok(summary)
}
