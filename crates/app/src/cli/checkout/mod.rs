use clap::{Args, Subcommand};

mod submit;

#[derive(Debug, Args)]
pub(crate) struct CheckoutCommand {
    #[command(subcommand)]
    command: CheckoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutSubcommand {
    Submit(submit::SubmitOrderArgs),
}

pub(crate) async fn run(command: CheckoutCommand) -> Result<(), String> {
    match command.command {
        CheckoutSubcommand::Submit(args) => submit::run(args).await,
    }
}
