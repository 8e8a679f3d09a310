use clap::{Args, ValueEnum};

use farmony_app::domain::orders::{
    OrdersService,
    models::{OrderStatus, OrderUuid},
};

use crate::cli::StoreArgs;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl From<StatusArg> for OrderStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Pending => Self::Pending,
            StatusArg::Processing => Self::Processing,
            StatusArg::Completed => Self::Completed,
            StatusArg::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct SetOrderStatusArgs {
    /// Order id
    order_uuid: OrderUuid,

    /// New lifecycle state
    #[arg(long, value_enum)]
    status: StatusArg,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: SetOrderStatusArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let order = context
        .orders
        .set_status(args.order_uuid, args.status.into())
        .await
        .map_err(|error| format!("failed to update {}: {error}", args.order_uuid))?;

    println!("{}: {}", order.id, order.status);

    Ok(())
}
