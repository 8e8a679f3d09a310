use clap::Args;

use crate::cli::{StoreArgs, cart::print_cart};

#[derive(Debug, Args)]
pub(crate) struct RemoveItemArgs {
    /// Catalog id of the line to remove
    product_id: String,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: RemoveItemArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let view = context
        .carts
        .remove_item(Some(&args.product_id), &args.product_id)
        .await
        .map_err(|error| format!("failed to remove {}: {error}", args.product_id))?;

    print_cart(&view);

    Ok(())
}
