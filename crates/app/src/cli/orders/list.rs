use clap::Args;

use farmony_app::domain::orders::OrdersService;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ListOrdersArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ListOrdersArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let orders = context
        .orders
        .list_orders()
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("no orders recorded");
        return Ok(());
    }

    for order in orders {
        println!(
            "{}  {}  {:<10}  ${:>8}  {}",
            order.id,
            order.created_at.strftime("%Y-%m-%d %H:%M"),
            order.status,
            order.total,
            order.customer.full_name
        );
    }

    Ok(())
}
