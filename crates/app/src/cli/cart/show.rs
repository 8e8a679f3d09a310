use clap::Args;

use crate::cli::{StoreArgs, cart::print_cart};

#[derive(Debug, Args)]
pub(crate) struct ShowCartArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ShowCartArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let view = context
        .carts
        .view()
        .await
        .map_err(|error| format!("failed to read the cart: {error}"))?;

    print_cart(&view);

    Ok(())
}
