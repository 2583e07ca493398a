use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pdf::ComposeOptions;

/// Default name offered for the merged download
pub const DEFAULT_OUTPUT_FILENAME: &str = "merged_translation.pdf";

/// Default PDF version written to the merged document
pub const DEFAULT_PDF_VERSION: &str = "1.7";

/// Default per-file upload cap (10 MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

fn default_pdf_version() -> String {
    DEFAULT_PDF_VERSION.to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

/// Header versions the output may declare: `1.0` to `1.7`, or `2.0`.
pub fn is_supported_pdf_version(version: &str) -> bool {
    matches!(version.as_bytes(), [b'1', b'.', b'0'..=b'7'] | [b'2', b'.', b'0'])
}

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
fn user_config_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(std::path::PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| std::path::PathBuf::from(home).join(".config")))
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// File name suggested for the merged document
    #[serde(default = "default_output_filename")]
    pub output_filename: String,

    /// Flate-compress streams in the merged document
    #[serde(default = "default_true")]
    pub compress: bool,

    /// PDF version written to the merged document header
    #[serde(default = "default_pdf_version")]
    pub pdf_version: String,

    /// Largest accepted upload per file, in bytes (web only)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_filename: default_output_filename(),
            compress: default_true(),
            pdf_version: default_pdf_version(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations (~/.config/pdf-sidebyside/config.toml, ./config.toml)
    pub fn load() -> Self {
        if let Some(config_dir) = user_config_dir() {
            let user_config = config_dir.join("pdf-sidebyside").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Check values that serde alone cannot reject.
    pub fn validate(&self) -> Result<(), Error> {
        let name = self.output_filename.trim();
        if name.is_empty() {
            return Err(Error::ConfigInvalid {
                field: "output_filename".into(),
                reason: "must not be empty".into(),
            });
        }
        if !name.to_ascii_lowercase().ends_with(".pdf") {
            return Err(Error::ConfigInvalid {
                field: "output_filename".into(),
                reason: format!("'{name}' does not end in .pdf"),
            });
        }
        if name.contains(['/', '\\', '"']) {
            return Err(Error::ConfigInvalid {
                field: "output_filename".into(),
                reason: "must be a bare file name".into(),
            });
        }
        if !is_supported_pdf_version(&self.pdf_version) {
            return Err(Error::ConfigInvalid {
                field: "pdf_version".into(),
                reason: format!("{:?} is not one of 1.0-1.7 or 2.0", self.pdf_version),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::ConfigInvalid {
                field: "max_upload_bytes".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Options handed to the composer.
    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            compress: self.compress,
            pdf_version: self.pdf_version.clone(),
        }
    }

    /// Upload cap for user-facing text, rounded down to the largest unit it
    /// fills: `10 MB`, `256 KB`, `512 bytes`.
    pub fn upload_limit_label(&self) -> String {
        const KIB: usize = 1024;
        const MIB: usize = 1024 * KIB;

        match self.max_upload_bytes {
            bytes if bytes >= MIB => format!("{} MB", bytes / MIB),
            bytes if bytes >= KIB => format!("{} KB", bytes / KIB),
            bytes => format!("{bytes} bytes"),
        }
    }
}
