use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use farmony_app::context::AppContext;

mod cart;
mod catalog;
mod checkout;
mod customer;
mod orders;
mod session;

#[derive(Debug, Parser)]
#[command(name = "farmony-app", about = "Farmony storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Customer(customer::CustomerCommand),
    Session(session::SessionCommand),
    Catalog(catalog::CatalogCommand),
    Cart(cart::CartCommand),
    Checkout(checkout::CheckoutCommand),
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Customer(command) => customer::run(command).await,
            Commands::Session(command) => session::run(command).await,
            Commands::Catalog(command) => catalog::run(command).await,
            Commands::Cart(command) => cart::run(command).await,
            Commands::Checkout(command) => checkout::run(command).await,
            Commands::Orders(command) => orders::run(command).await,
        }
    }
}

/// Where the storefront state lives; shared by every command.
#[derive(Debug, Args)]
pub(crate) struct StoreArgs {
    /// Directory holding the storefront state files
    #[arg(long, env = "FARMONY_DATA_DIR", default_value = ".farmony")]
    data_dir: PathBuf,
}

impl StoreArgs {
    /// Open the application context, logging confirmations instead of
    /// mailing them.
    pub(crate) async fn open(self) -> Result<AppContext, String> {
        self.open_with_mailer(None).await
    }

    /// Open the application context with an optional mail endpoint.
    pub(crate) async fn open_with_mailer(
        self,
        mail_endpoint: Option<String>,
    ) -> Result<AppContext, String> {
        AppContext::from_data_dir(self.data_dir, mail_endpoint)
            .await
            .map_err(|error| format!("failed to open the storefront: {error}"))
    }
}
