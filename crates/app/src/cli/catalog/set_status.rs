use clap::{Args, ValueEnum};

use farmony_app::domain::products::{CatalogService, models::ProductStatus};

use crate::cli::StoreArgs;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Active,
    Pending,
}

impl From<StatusArg> for ProductStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Active => Self::Active,
            StatusArg::Pending => Self::Pending,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct SetProductStatusArgs {
    /// Product id
    product_id: String,

    /// New publication state
    #[arg(long, value_enum)]
    status: StatusArg,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: SetProductStatusArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    let product = context
        .catalog
        .set_status(&args.product_id, args.status.into())
        .await
        .map_err(|error| format!("failed to update {}: {error}", args.product_id))?;

    let state = match product.status {
        ProductStatus::Active => "active",
        ProductStatus::Pending => "pending",
    };
    println!("{}: {state}", product.id);

    Ok(())
}
