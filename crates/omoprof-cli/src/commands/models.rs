//! `omoprof models`

use anyhow::{anyhow, Result};
use omoprof_providers::{build_client, HttpCatalog, ModelCatalog};

use crate::context::AppContext;

pub async fn list(ctx: &AppContext, provider: Option<&str>) -> Result<()> {
    let client = build_client(ctx.settings.fetch_timeout())?;
    let catalog = HttpCatalog::new(client, ctx.settings.catalog_url.clone());

    let models = catalog.models().await.map_err(|e| {
        let hint = if e.is_retryable() { " (try again later)" } else { "" };
        anyhow!("failed to fetch model catalog: {e}{hint}")
    })?;

    let mut shown = 0;
    for model in models
        .iter()
        .filter(|m| provider.is_none_or(|p| m.provider == p))
    {
        println!("{:<48} {}", model.qualified_id(), model.name);
        shown += 1;
    }

    if shown == 0 {
        println!("No models found.");
    }
    Ok(())
}
