use std::path::PathBuf;

use clap::Args;

use farmony_app::domain::products::fixtures::{CatalogFixture, seed_catalog};

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct SeedCatalogArgs {
    /// Catalog fixture file; the bundled demo catalog when omitted
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: SeedCatalogArgs) -> Result<(), String> {
    let fixture = match &args.file {
        Some(path) => CatalogFixture::load(path),
        None => CatalogFixture::demo(),
    }
    .map_err(|error| format!("failed to load the catalog fixture: {error}"))?;

    let products = fixture
        .into_new_products()
        .map_err(|error| format!("invalid catalog fixture: {error}"))?;

    let context = args.store.open().await?;

    let outcome = seed_catalog(&context.catalog, products)
        .await
        .map_err(|error| format!("seeding failed: {error}"))?;

    println!("created: {}", outcome.created);
    println!("skipped: {}", outcome.skipped);

    Ok(())
}
