// SYS8X00 version query tool
use clap::{CommandFactory, Parser};
use sys8x00::cli::args::Args;
use sys8x00::cli::commands::execute_command;
use sys8x00::Sys8x00Error;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error: {}", e);
        if matches!(e, Sys8x00Error::MissingTransport) {
            let _ = Args::command().print_help();
        }
        std::process::exit(1);
    }
}
