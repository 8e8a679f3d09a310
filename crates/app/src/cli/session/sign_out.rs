use clap::Args;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct SignOutArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: SignOutArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    if !context.sessions.current().is_authenticated() {
        println!("no one is signed in");
        return Ok(());
    }

    context
        .sessions
        .sign_out()
        .await
        .map_err(|error| format!("sign-out failed: {error}"))?;

    // Touching the cart clears any lines the departed session left behind.
    context
        .carts
        .view()
        .await
        .map_err(|error| format!("failed to clear the cart: {error}"))?;

    println!("signed out");

    Ok(())
}
