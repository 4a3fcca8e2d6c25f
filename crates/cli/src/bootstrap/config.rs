use ferrous_filters_application::services::FilterRegistry;
use ferrous_filters_domain::{CliOverrides, Config};
use std::path::Path;
use tracing::{debug, info};

pub fn load_config(config_path: &Path, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(Some(config_path), cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Replace the filter list in the config file with the registry's.
///
/// The file is re-read first so command-line overrides never end up in it.
pub async fn save_config(config_path: &Path, registry: &FilterRegistry) -> anyhow::Result<()> {
    let mut on_disk = Config::load(Some(config_path), CliOverrides::default())?;
    on_disk.filtering.filters = registry.filters().await;
    on_disk.save(config_path)?;

    info!(
        config_file = %config_path.display(),
        filters = on_disk.filtering.filters.len(),
        "Configuration saved"
    );
    Ok(())
}

/// Write back filter names learned at runtime without touching the filter list.
///
/// Admin commands edit the file while the daemon runs; their changes win.
pub async fn save_filter_names(
    config_path: &Path,
    registry: &FilterRegistry,
) -> anyhow::Result<()> {
    let mut on_disk = Config::load(Some(config_path), CliOverrides::default())?;
    let renamed = on_disk
        .filtering
        .apply_runtime_names(&registry.filters().await);
    if renamed == 0 {
        debug!("No filter names changed");
        return Ok(());
    }

    on_disk.save(config_path)?;
    info!(
        config_file = %config_path.display(),
        renamed,
        "Filter names saved"
    );
    Ok(())
}
