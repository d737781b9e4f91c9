//! Init command implementation

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use miette::{IntoDiagnostic, Result};
use tracing::info;
use tsgate_core::DEFAULT_CONFIG_FILE;

const STARTER_CONFIG: &str = r#"{
  "extends": "tsgate:recommended",
  "rules": {}
}
"#;

pub fn run_init(config: Option<&Path>, force: bool) -> Result<()> {
    let config_path = config.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    if force {
        remove_if_present(config_path).into_diagnostic()?;
    }

    let mut file = match create_new(config_path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(miette::miette!(
                "{} already exists. Use --force to overwrite.",
                config_path.display()
            ));
        }
        Err(e) => return Err(e).into_diagnostic(),
    };

    file.write_all(STARTER_CONFIG.as_bytes()).into_diagnostic()?;
    info!("Created {}", config_path.display());
    Ok(())
}

/// Removes `path` itself. A symlink is unlinked, never its target.
fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        result => result,
    }
}

/// Creates a file that must not exist yet and does not follow a symlink at
/// the final path component.
fn create_new(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }

    options.open(path)
}
