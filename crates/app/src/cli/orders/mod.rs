use clap::{Args, Subcommand};

mod list;
mod set_status;
mod show;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    List(list::ListOrdersArgs),
    Show(show::ShowOrderArgs),
    SetStatus(set_status::SetOrderStatusArgs),
}

pub(crate) async fn run(command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List(args) => list::run(args).await,
        OrdersSubcommand::Show(args) => show::run(args).await,
        OrdersSubcommand::SetStatus(args) => set_status::run(args).await,
    }
}
