use adapter_directives::Commands;
use clap::Parser;

#[derive(Parser)]
#[command(name = "adapter-directives")]
#[command(about = "Directive parser and configuration assembly engine for foreign-package adapter generators")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    adapter_directives::cli::dispatch(cli.command)
}
