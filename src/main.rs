use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// padd: macro keypad daemon
#[derive(Parser)]
#[command(name = "padd", version, about)]
struct Cli {
    /// Path to the config file (TOML).
    #[arg(short, long, default_value = "/etc/padd/config.toml")]
    config: PathBuf,

    /// Enable JSON log output (for journald).
    #[arg(long)]
    json: bool,

    /// Validate config and macro files, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("padd=info"));

    if cli.json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    info!("padd v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli
        .config
        .canonicalize()
        .unwrap_or_else(|_| cli.config.clone());
    let config = padd::config::load(&config_path)?;

    if cli.check {
        let apps = padd::config::load_applications(&config.pad.macro_folder)?;
        if apps.is_empty() {
            anyhow::bail!(
                "no usable macro files in {}",
                config.pad.macro_folder.display()
            );
        }
        println!(
            "config OK: {} applications, {} total macros",
            apps.len(),
            apps.iter().map(|a| a.macros.len()).sum::<usize>(),
        );
        return Ok(());
    }

    info!("loaded config from {}", config_path.display());

    padd::daemon::run(config).await?;

    Ok(())
}
