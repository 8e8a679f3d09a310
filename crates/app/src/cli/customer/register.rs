use clap::Args;
use zeroize::Zeroizing;

use farmony_app::domain::customers::{CustomersService, models::NewCustomer};

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct RegisterCustomerArgs {
    /// Customer display name
    #[arg(long)]
    full_name: String,

    /// Sign-in email; unique across customers
    #[arg(long)]
    email: String,

    /// Contact phone for deliveries
    #[arg(long)]
    phone: String,

    /// Sign-in password
    #[arg(long)]
    password: String,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: RegisterCustomerArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let customer = context
        .customers
        .register(NewCustomer {
            full_name: args.full_name,
            email: args.email,
            phone: args.phone,
            password: Zeroizing::new(args.password),
        })
        .await
        .map_err(|error| format!("failed to register: {error}"))?;

    println!("customer_uuid: {}", customer.uid);
    println!("email: {}", customer.email);

    Ok(())
}
