use crate::domain::error::AppError;
use crate::infrastructure::config::Logging;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Map a configured level name to a tracing filter directive
pub fn level_directive(level: &str) -> &'static str {
    match level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" | "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "warn",
    }
}

/// Initialize logging with path, level and format configuration
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(logging: &Logging) -> Result<(), AppError> {
    let level = level_directive(&logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let json = logging.format == "json";

    if let Some(path) = logging.path.as_deref().filter(|p| !p.is_empty()) {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // Log to file
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file));
        if json {
            builder.json().init();
        } else {
            builder.init();
        }
        return Ok(());
    }

    // Log to stderr (default)
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("verbose"), "warn");
    }
}
