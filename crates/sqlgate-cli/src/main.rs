use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "sqlgate", version, about = "Natural-language read-only SQL gateway")]
struct Cli {
    /// Path to the YAML configuration file (defaults to ./sqlgate.yaml if present)
    #[arg(long, env = "SQLGATE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP gateway (POST /chat, GET /health).
    Serve {
        /// Bind address, overrides server.bind from the configuration
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run a single natural-language request and print the JSON response.
    Ask {
        message: String,
    },

    /// Print the schema lines that would be embedded in the generation prompt.
    Schema,

    /// Sanitize, validate and limit a query offline, without contacting any service.
    Check {
        sql: String,

        /// Validate in strict mode regardless of the configuration
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Serve { bind } => commands::serve::run(config, bind).await?,
        Command::Ask { message } => commands::ask::run(config, &message).await?,
        Command::Schema => commands::schema::run(config).await?,
        Command::Check { sql, strict } => commands::check::run(&config, &sql, strict)?,
    }

    Ok(())
}
