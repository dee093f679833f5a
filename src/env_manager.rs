use log::{info, warn};
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub const WEBSITE_URL: &str = "WEBSITE_URL";
pub const REFERENCE_YEAR: &str = "CALSCRAPE_REFERENCE_YEAR";
pub const OUTPUT_DIR: &str = "CALSCRAPE_OUTPUT_DIR";

pub const REQUIRED_ENV_VARS: &[&str] = &[WEBSITE_URL];

// Names of optional environment variables
pub const OPTIONAL_ENV_VARS: &[&str] = &[REFERENCE_YEAR, OUTPUT_DIR, "RUST_LOG"];

/// Returns false if any required variable is missing or blank.
pub fn check_env_vars() -> bool {
    let mut all_present = true;

    for var in REQUIRED_ENV_VARS {
        if get_env_var(var).is_none() {
            warn!("Missing required environment variable: {}", var);
            all_present = false;
        }
    }

    all_present
}

pub fn load_env_file() -> io::Result<()> {
    // Try to load from .env file
    match dotenvy::dotenv() {
        Ok(path) => {
            info!("Loaded environment from {:?}", path);
            Ok(())
        }
        Err(e) => {
            info!("No .env file found or error loading it: {}", e);
            create_env_template(Path::new(".env"))
        }
    }
}

fn create_env_template(env_path: &Path) -> io::Result<()> {
    // Don't overwrite existing .env file
    if env_path.exists() {
        return Ok(());
    }

    let mut file = File::create(env_path)?;

    for var in REQUIRED_ENV_VARS {
        writeln!(file, "{}=", var)?;
    }

    // Optional variables stay commented out
    for var in OPTIONAL_ENV_VARS {
        writeln!(file, "# {}=", var)?;
    }

    info!("Created environment template at {}", env_path.display());
    Ok(())
}

/// Value of `name`, or `None` if unset or blank.
pub fn get_env_var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
