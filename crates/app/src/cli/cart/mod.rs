use clap::{Args, Subcommand};

use farmony_app::domain::carts::models::CartView;

mod add;
mod clear;
mod remove;
mod set_quantity;
mod show;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    Add(add::AddItemArgs),
    Remove(remove::RemoveItemArgs),
    SetQuantity(set_quantity::SetQuantityArgs),
    Show(show::ShowCartArgs),
    Clear(clear::ClearCartArgs),
}

pub(crate) async fn run(command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Add(args) => add::run(args).await,
        CartSubcommand::Remove(args) => remove::run(args).await,
        CartSubcommand::SetQuantity(args) => set_quantity::run(args).await,
        CartSubcommand::Show(args) => show::run(args).await,
        CartSubcommand::Clear(args) => clear::run(args).await,
    }
}

pub(crate) fn print_cart(view: &CartView) {
    if view.is_empty() {
        println!("the cart is empty");
        return;
    }

    for line in &view.lines {
        println!(
            "{:<28} {:<34} x{:<3} ${:>8}",
            line.id,
            line.name,
            line.quantity,
            line.line_total()
        );
    }

    println!("total: ${} ({} items)", view.total, view.count);
}
