mod assets;
mod config;
mod engine;
mod gpu;
mod runtime;
mod services;
mod touch;

use anyhow::Result;

use ember_bridge::logging::init_logging;

use crate::config::HostConfig;
use crate::runtime::Runtime;

fn main() -> Result<()> {
    let config = HostConfig::from_env();
    init_logging(config.logging.clone());

    log::info!(
        "ember host starting (assets: {}, frame interval {} ms)",
        config.asset_root.display(),
        config.bridge.frame_interval.as_millis()
    );

    Runtime::run(config)
}
