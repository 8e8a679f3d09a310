use clap::Args;

use farmony_app::domain::products::{CatalogService, models::ProductStatus};

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ListProductsArgs {
    /// Include products hidden from the storefront
    #[arg(long)]
    all: bool,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ListProductsArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let products = context
        .catalog
        .list_products()
        .await
        .map_err(|error| format!("failed to list the catalog: {error}"))?;

    let mut shown = 0;
    for product in products {
        if product.status == ProductStatus::Pending && !args.all {
            continue;
        }

        let marker = match product.status {
            ProductStatus::Active => "",
            ProductStatus::Pending => "  [pending]",
        };

        println!(
            "{:<28} {:<34} ${:>8}  stock {:>4}{marker}",
            product.id, product.name, product.price, product.stock
        );
        shown += 1;
    }

    if shown == 0 {
        println!("the catalog is empty; run `farmony-app catalog seed` to load the demo products");
    }

    Ok(())
}
