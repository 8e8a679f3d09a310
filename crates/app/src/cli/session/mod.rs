use clap::{Args, Subcommand};

mod show;
mod sign_in;
mod sign_out;

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    SignIn(sign_in::SignInArgs),
    SignOut(sign_out::SignOutArgs),
    Show(show::ShowSessionArgs),
}

pub(crate) async fn run(command: SessionCommand) -> Result<(), String> {
    match command.command {
        SessionSubcommand::SignIn(args) => sign_in::run(args).await,
        SessionSubcommand::SignOut(args) => sign_out::run(args).await,
        SessionSubcommand::Show(args) => show::run(args).await,
    }
}
