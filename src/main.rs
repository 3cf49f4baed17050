use clap::Parser;

use storefront::cli::{run, Cli};
use storefront::logging::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
