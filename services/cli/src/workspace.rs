use crate::cli::RegistryArgs;
use bidprep::config::{AppConfig, ConfigError, Settings};
use bidprep::error::AppError;
use bidprep::scoring::RuleBook;
use bidprep::telemetry;
use std::path::PathBuf;
use tracing::{debug, info};

/// Configuration, settings and resolved paths shared by every subcommand.
pub(crate) struct Workspace {
    pub(crate) config: AppConfig,
    pub(crate) settings: Settings,
}

impl Workspace {
    pub(crate) fn open(args: &RegistryArgs) -> Result<Self, AppError> {
        let mut config = AppConfig::load()?;
        apply_overrides(&mut config, args);

        telemetry::init(&config.telemetry)?;

        let settings = Settings::load_or_default(&config.registry.settings_path)?;
        debug!(
            settings = %config.registry.settings_path.display(),
            industries = settings.industry_averages.file_types().count(),
            "settings loaded"
        );
        info!(?config.environment, "bid preparation workspace ready");

        Ok(Self { config, settings })
    }

    /// `--db` / `APP_REGISTRY_PATH` first, then `dbPath` from the settings file.
    pub(crate) fn db_path(&self) -> Result<PathBuf, AppError> {
        self.config
            .registry
            .db_path
            .clone()
            .or_else(|| self.settings.db_path.clone())
            .ok_or_else(|| ConfigError::MissingRegistryPath.into())
    }

    pub(crate) fn rule_book(&self, rules_override: Option<PathBuf>) -> Result<RuleBook, AppError> {
        let path = rules_override.unwrap_or_else(|| self.config.registry.rules_path.clone());
        let book = RuleBook::from_path(&path)?;
        debug!(
            rules = %path.display(),
            agencies = book.agencies().len(),
            "rule document loaded"
        );
        Ok(book)
    }
}

/// Command-line flags win over whatever the environment configured.
fn apply_overrides(config: &mut AppConfig, args: &RegistryArgs) {
    if let Some(path) = args.settings.clone() {
        config.registry.settings_path = path;
    }
    if let Some(path) = args.db.clone() {
        config.registry.db_path = Some(path);
    }
}
