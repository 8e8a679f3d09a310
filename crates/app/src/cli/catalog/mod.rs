use clap::{Args, Subcommand};

mod list;
mod seed;
mod set_status;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    Seed(seed::SeedCatalogArgs),
    List(list::ListProductsArgs),
    SetStatus(set_status::SetProductStatusArgs),
}

pub(crate) async fn run(command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::Seed(args) => seed::run(args).await,
        CatalogSubcommand::List(args) => list::run(args).await,
        CatalogSubcommand::SetStatus(args) => set_status::run(args).await,
    }
}
