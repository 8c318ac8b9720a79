use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use mosviz::catalog::StatusMessage;
use mosviz::{
    catalog_dispatch, init_logging, DispatchConfig, DispatchHandle, LogFormat, StatusLog,
    BUILD_DATE, VERSION,
};

/// Builds the dispatch with the full event catalog and prints it.
///
/// Usage: `mosviz [CONFIG.toml|CONFIG.json]`
fn main() -> anyhow::Result<()> {
    init_logging(LogFormat::from_env())?;
    tracing::info!("MOSViz {} (built {})", VERSION, BUILD_DATE);

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => DispatchConfig::load_from_file(&path)
            .with_context(|| format!("loading dispatch config from {}", path.display()))?,
        None => DispatchConfig::default(),
    };
    tracing::info!(
        failure_policy = %config.failure_policy,
        argument_check = %config.argument_check,
        "Dispatch configured"
    );

    let dispatch = catalog_dispatch(config);
    let status = StatusLog::new();
    let _watch = DispatchHandle::watch(&dispatch, status.as_ref());

    for name in dispatch.event_names() {
        if let Some(node) = dispatch.event(&name) {
            println!("{}({})", node.name(), node.params().join(", "));
        }
    }

    dispatch.publish(StatusMessage {
        message: format!("{} events registered", dispatch.event_count()),
        timeout: Duration::from_secs(5),
    })?;

    Ok(())
}
