use clap::Args;
use jiff::Timestamp;

use farmony_app::{domain::customers::CustomersService, session::Session};

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct SignInArgs {
    /// Registered email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long)]
    password: String,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: SignInArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let customer = context
        .customers
        .verify_credentials(&args.email, &args.password)
        .await
        .map_err(|error| format!("sign-in failed: {error}"))?;

    context
        .sessions
        .sign_in(Session {
            customer: customer.uid,
            email: customer.email.clone(),
            display_name: customer.full_name.clone(),
            signed_in_at: Timestamp::now(),
        })
        .await
        .map_err(|error| format!("failed to persist the session: {error}"))?;

    println!("signed in as {} <{}>", customer.full_name, customer.email);

    Ok(())
}
