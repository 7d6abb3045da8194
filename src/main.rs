use clap::Parser;
use weather_transformer::cli::{run, Cli};
use weather_transformer::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
