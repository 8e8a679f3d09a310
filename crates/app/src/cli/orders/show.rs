use clap::Args;

use farmony_app::domain::orders::{OrdersService, models::OrderUuid};

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ShowOrderArgs {
    /// Order id
    order_uuid: OrderUuid,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ShowOrderArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let order = context
        .orders
        .get_order(args.order_uuid)
        .await
        .map_err(|error| format!("failed to fetch {}: {error}", args.order_uuid))?;

    println!("order_uuid: {}", order.id);
    println!("created_at: {}", order.created_at.strftime("%Y-%m-%d %H:%M"));
    println!("status: {}", order.status);
    println!("payment: {}", order.payment_method);
    println!(
        "customer: {} <{}> {}",
        order.customer.full_name, order.customer.email, order.customer.phone
    );
    println!("ships to: {}", order.customer.shipping_address);

    if let Some(notes) = &order.notes {
        println!("notes: {notes}");
    }

    println!("items:");
    for item in &order.items {
        println!(
            "  {} (x{}) - ${:.2}",
            item.name,
            item.quantity,
            item.line_total()
        );
    }
    println!("total: ${}", order.total);

    Ok(())
}
