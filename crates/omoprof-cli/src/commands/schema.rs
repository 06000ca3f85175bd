//! `omoprof schema-check`

use anyhow::{Context, Result};
use omoprof_core::schema::{embedded_schema, schema_drift, SchemaValidator};
use omoprof_providers::{build_client, fetch_upstream_schema};

use crate::context::AppContext;

pub async fn check(ctx: &AppContext) -> Result<()> {
    let client = build_client(ctx.settings.fetch_timeout())?;
    let upstream = fetch_upstream_schema(&client, &ctx.settings.schema_url)
        .await
        .with_context(|| format!("failed to fetch {}", ctx.settings.schema_url))?;

    if let Err(e) = SchemaValidator::from_value(&upstream) {
        eprintln!("warning: upstream schema does not compile: {e}");
    }

    let drift = schema_drift(&embedded_schema()?, &upstream);
    if drift.identical {
        println!("Built-in schema matches upstream.");
    } else {
        print!("{}", drift.diff);
        println!("Built-in schema differs from upstream.");
    }
    Ok(())
}
