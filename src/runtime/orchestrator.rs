use anyhow::Result;
use std::time::Duration;
use tracing::{info, warn};

use crate::{
    app::{get_data_dir, load_config, load_config_from, Config},
    cli::{handle_command, Cli, Commands},
    constants::LOG_FILE_NAME,
    directory::source_from_config,
    runtime::ReportRunner,
    tui::{run_ui, App},
    utils::{init_logger, LogTarget},
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        // Load configuration
        let mut config = if let Some(config_path) = &cli.config {
            load_config_from(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                    Config::default()
                }
            }
        };

        // CLI flags win over every config layer
        config.override_source(cli.url.clone(), cli.file.clone());
        if let Some(size) = cli.page_size {
            config.ui.default_page_size = size;
        }

        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn runs_tui(&self) -> bool {
        matches!(self.cli.command, None | Some(Commands::Tui))
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        let log_target = if self.runs_tui() {
            LogTarget::File(get_data_dir()?.join(LOG_FILE_NAME))
        } else {
            LogTarget::Stderr
        };
        if let Err(e) = init_logger(self.cli.verbose, log_target) {
            eprintln!("⚠️  Logging disabled: {}", e);
        }

        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(()); // Command handled, exit
            }
        }

        let source = source_from_config(&self.config.source)?;
        let page_size = self.config.ui.default_page_size;

        match &self.cli.command {
            Some(Commands::List(args)) => {
                let output = ReportRunner::new(source, page_size).list(args).await?;
                print!("{}", output);
            }
            Some(Commands::Stats(args)) => {
                let output = ReportRunner::new(source, page_size).stats(args).await?;
                print!("{}", output);
            }
            Some(Commands::Options { format }) => {
                let output = ReportRunner::new(source, page_size).options(*format).await?;
                print!("{}", output);
            }
            _ => {
                info!("Starting dashboard on {}", source.location());
                let app = App::new(source.location(), self.config.form.url.clone(), page_size);
                let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms.max(1));
                let result = run_ui(app, source, tick_rate).await;
                if let Err(e) = &result {
                    warn!("Dashboard exited with error: {}", e);
                }
                return result;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crate::directory::PageSize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[source]\ncsv_url = \"https://example.org/old.csv\"\n\n[ui]\ndefault_page_size = 20"
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::try_parse_from([
            "dataguru",
            "--config",
            path.as_str(),
            "--file",
            "guru.csv",
            "--page-size",
            "50",
            "list",
        ])
        .unwrap();
        let orchestrator = Orchestrator::new(cli).unwrap();
        let config = orchestrator.config();

        assert_eq!(
            config.source.csv_path.as_deref(),
            Some(std::path::Path::new("guru.csv"))
        );
        assert_eq!(config.ui.default_page_size, PageSize::rows(50));
        assert!(!orchestrator.runs_tui());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["dataguru", "--config", "/no/such/dataguru.toml"]).unwrap();
        assert!(Orchestrator::new(cli).is_err());
    }
}
