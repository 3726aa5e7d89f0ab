use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::args::{Cli, Commands};
use cli::commands::{ast, check, tokens};
use cli::SourceError;

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("VV_LOG").unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.lexer_config();
    let mut out = std::io::stdout().lock();

    let result = match &cli.command {
        Commands::Check { path } => check::check_file(path, &config, &mut out),
        Commands::Tokens { path } => tokens::tokens_file(path, &config, &mut out),
        Commands::Ast { path, json } => ast::ast_file(path, &config, *json, &mut out),
    };

    match result {
        Err(err) => match err.downcast_ref::<SourceError>() {
            Some(src) => diagnostics::abort(&src.file, &src.diagnostic),
            None => Err(err),
        },
        ok => ok,
    }
}
