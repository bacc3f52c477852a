//! minem CLI entry point

use clap::Parser;

use minem::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    minem::init_tracing(cli.verbose, cli.quiet);

    let code = match minem::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    };

    // The attached server's exit code becomes ours.
    std::process::exit(code);
}
