use std::path::Path;

use crate::LoggerConfig;

mod remote;
mod rotation;

pub(crate) fn test_config(dir: &Path) -> LoggerConfig {
    let mut config = LoggerConfig::new(dir.join("logs"), dir.join("cache"));
    config.debug = true;
    config
}

pub(crate) fn no_rotate() -> crate::RotateCallback {
    Box::new(Vec::new)
}
