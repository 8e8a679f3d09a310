use clap::Args;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ClearCartArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ClearCartArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    context
        .carts
        .clear()
        .await
        .map_err(|error| format!("failed to clear the cart: {error}"))?;

    println!("cart cleared");

    Ok(())
}
