// asp CLI entry point

use asp_cli::{output, router::CommandRouter};

#[tokio::main]
async fn main() {
    let result = CommandRouter::route().await;

    if let Err(e) = result {
        output::print_error(&e.user_message());
        tracing::debug!(details = %e.technical_details(), "Command failed");
        std::process::exit(1);
    }
}
