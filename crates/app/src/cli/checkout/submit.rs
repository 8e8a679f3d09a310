use clap::Args;

use farmony_app::domain::{checkout::models::CheckoutRequest, customers::models::Address};

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct SubmitOrderArgs {
    /// Recipient name; the signed-in name when omitted
    #[arg(long)]
    full_name: Option<String>,

    /// Confirmation email; the sign-in email when omitted
    #[arg(long)]
    email: Option<String>,

    /// Contact phone; the profile phone when omitted
    #[arg(long)]
    phone: Option<String>,

    /// Street name
    #[arg(long)]
    street: Option<String>,

    /// Exterior number
    #[arg(long)]
    exterior_number: Option<String>,

    /// Interior number, for apartments
    #[arg(long)]
    interior_number: Option<String>,

    /// Neighborhood (colonia)
    #[arg(long)]
    neighborhood: Option<String>,

    /// City
    #[arg(long)]
    city: Option<String>,

    /// State
    #[arg(long)]
    state: Option<String>,

    /// Postal code
    #[arg(long)]
    zip_code: Option<String>,

    /// Free-form delivery notes
    #[arg(long)]
    notes: Option<String>,

    /// Mail delivery endpoint; confirmations are logged when unset
    #[arg(long, env = "FARMONY_MAIL_ENDPOINT")]
    mail_endpoint: Option<String>,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: SubmitOrderArgs) -> Result<(), String> {
    let address = match (
        args.street,
        args.exterior_number,
        args.neighborhood,
        args.city,
        args.state,
        args.zip_code,
    ) {
        (
            Some(street),
            Some(exterior_number),
            Some(neighborhood),
            Some(city),
            Some(state),
            Some(zip_code),
        ) => Some(Address {
            street,
            exterior_number,
            interior_number: args.interior_number,
            neighborhood,
            city,
            state,
            zip_code,
            is_default: false,
        }),
        (None, None, None, None, None, None) => None,
        _ => {
            return Err(
                "a shipping address needs --street, --exterior-number, --neighborhood, \
                 --city, --state and --zip-code"
                    .to_string(),
            );
        }
    };

    let context = args.store.open_with_mailer(args.mail_endpoint).await?;

    let order = context
        .checkout
        .submit(CheckoutRequest {
            full_name: args.full_name,
            email: args.email,
            phone: args.phone,
            address,
            notes: args.notes,
        })
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    println!("order_uuid: {}", order.id);
    println!("status: {}", order.status);
    println!("total: ${}", order.total);
    println!("payment: {}", order.payment_method);
    println!("ships to: {}", order.customer.shipping_address);

    Ok(())
}
