use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::{
    app::{get_config_dir, get_data_dir, init_config, Config},
    constants::{LOCAL_CONFIG_PATH, LOG_FILE_NAME},
    directory::{load_dataset, source_from_config},
};

use super::Commands;

/// Handle the subcommands that need no dataset.
/// Returns false when the orchestrator should take over.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing dataguru configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Form => {
            show_form(config)?;
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
        Commands::Tui | Commands::List(_) | Commands::Stats(_) | Commands::Options { .. } => {
            Ok(false)
        }
    }
}

/// Show version information
pub fn show_version() {
    println!("dataguru v{}", env!("CARGO_PKG_VERSION"));
    println!("   Staff directory dashboard for SK Klang Gate");
}

/// Print the "Tambah Guru" form link
fn show_form(config: &Config) -> Result<()> {
    match &config.form.url {
        Some(url) => {
            println!("{}", "Borang Tambah Guru SK Klang Gate".bold());
            println!("{}", url.underline());
            Ok(())
        }
        None => anyhow::bail!("No form URL configured (set [form] url)"),
    }
}

/// Show configuration and probe the data source
async fn show_status(config: &Config) -> Result<()> {
    println!("dataguru Status:");
    println!();

    // Configuration files
    let global = get_config_dir()?.join("config.toml");
    if global.exists() {
        println!("  {} Configuration: {}", "[OK]".green(), global.display());
    } else {
        println!(
            "  {} Configuration: Not found (using defaults)",
            "[WARNING]".yellow()
        );
    }
    let local = PathBuf::from(LOCAL_CONFIG_PATH);
    if local.exists() {
        println!("  {} Local override: {}", "[OK]".green(), local.display());
    }
    println!(
        "      • Log file: {}",
        get_data_dir()?.join(LOG_FILE_NAME).display()
    );

    // Form link
    match &config.form.url {
        Some(url) => println!("  {} Form: {}", "[OK]".green(), url),
        None => println!("  {} Form: Not configured", "[WARNING]".yellow()),
    }

    // Data source
    let source = match source_from_config(&config.source) {
        Ok(source) => source,
        Err(e) => {
            println!("  {} Data source: {}", "[ERROR]".red(), e);
            println!();
            return Ok(());
        }
    };

    match load_dataset(source.as_ref()).await {
        Ok(dataset) => {
            println!(
                "  {} Data source: {} ({} records)",
                "[OK]".green(),
                source.location(),
                dataset.len()
            );
            let missing = dataset.missing_headers();
            if !missing.is_empty() {
                println!(
                    "  {} Missing columns: {}",
                    "[WARNING]".yellow(),
                    missing.join(", ")
                );
            }
        }
        Err(e) => {
            println!(
                "  {} Data source: {} ({})",
                "[ERROR]".red(),
                source.location(),
                e
            );
        }
    }

    println!();
    Ok(())
}
