use clap::Parser;
use hotel_discovery::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Search(args) => cli::search::run(args).await,
        Command::Nearest(args) => cli::nearest::run(args).await,
    }
}
