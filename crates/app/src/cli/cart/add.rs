use clap::Args;

use farmony_app::domain::{
    carts::models::ItemCandidate,
    products::{CatalogService, models::ProductStatus},
};

use crate::cli::{StoreArgs, cart::print_cart};

#[derive(Debug, Args)]
pub(crate) struct AddItemArgs {
    /// Catalog id of the product to add
    product_id: String,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: AddItemArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let product = context
        .catalog
        .get_product(&args.product_id)
        .await
        .map_err(|error| format!("failed to look up {}: {error}", args.product_id))?;

    if product.status != ProductStatus::Active {
        return Err(format!("product {} is not available", product.id));
    }

    let view = context
        .carts
        .add_item(ItemCandidate::from(&product))
        .await
        .map_err(|error| format!("failed to add {}: {error}", product.id))?;

    print_cart(&view);

    Ok(())
}
