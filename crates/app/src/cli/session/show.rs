use clap::Args;

use farmony_app::session::SessionState;

use crate::cli::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ShowSessionArgs {
    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ShowSessionArgs) -> Result<(), String> {
    let context = args.store.open().await?;

    match context.sessions.current() {
        SessionState::Anonymous => println!("no one is signed in"),
        SessionState::Authenticated(session) => {
            println!("customer_uuid: {}", session.customer);
            println!("name: {}", session.display_name);
            println!("email: {}", session.email);
            println!("signed_in_at: {}", session.signed_in_at);
        }
    }

    Ok(())
}
