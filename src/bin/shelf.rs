use clap::Parser;
use shelf_api::cli::{error_code, utils::output_error, Cli, OutputFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = shelf_api::cli::run(cli).await {
        match (&output_format, std::env::var("CLI_VERBOSE").as_deref()) {
            (OutputFormat::Json, _) => output_error(&output_format, &e.to_string(), error_code(&e))?,
            (_, Ok("true")) | (_, Ok("1")) => eprintln!("Error: {e:?}"),
            _ => output_error(&output_format, &e.to_string(), None)?,
        }
        std::process::exit(1);
    }

    Ok(())
}
