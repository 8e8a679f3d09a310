use clap::Args;

use crate::cli::{StoreArgs, cart::print_cart};

#[derive(Debug, Args)]
pub(crate) struct SetQuantityArgs {
    /// Catalog id of the line to change
    product_id: String,

    /// New quantity; values below 1 leave the cart untouched
    quantity: i64,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: SetQuantityArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let view = context
        .carts
        .set_quantity(Some(&args.product_id), &args.product_id, args.quantity)
        .await
        .map_err(|error| format!("failed to change {}: {error}", args.product_id))?;

    print_cart(&view);

    Ok(())
}
