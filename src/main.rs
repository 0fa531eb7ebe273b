use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};

use runic_altar::config::{AltarConfig, DEFAULT_CONFIG_PATH};
use runic_altar::{AltarRecipeRegistry, RecipeError, TagRegistry};

fn run(config: &AltarConfig) -> Result<(), RecipeError> {
    // Load item tags first so recipes referencing them can be checked
    let mut tags = TagRegistry::new();
    tags.load_from_directory(&config.data_dir)?;

    let mut recipes = AltarRecipeRegistry::new();
    recipes.load_from_directory(&config.data_dir)?;

    recipes.check_tags(&tags);

    let payload = recipes.to_network()?;
    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| RecipeError::io(parent, e))?;
    }
    std::fs::write(&config.output, &payload).map_err(|e| RecipeError::io(&config.output, e))?;

    info!(
        "Wrote {} recipes ({} bytes) to {:?}",
        recipes.len(),
        payload.len(),
        config.output
    );

    Ok(())
}

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    // Config is read before logging is up, so a bad file is reported on stderr
    let config = match AltarConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config {:?}: {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    match config.log_filter.parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log_filter {:?}: {}", config.log_filter, e),
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Loading data pack from {:?}", config.data_dir);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to build recipe payload: {}", e);
            ExitCode::FAILURE
        }
    }
}
