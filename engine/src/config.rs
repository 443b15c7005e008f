use std::path::PathBuf;
use std::{env, fs};

use canvass_types::ui::UiOptions;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CanvassConfig {
    pub app: Option<AppConfig>,
    pub export: Option<ExportConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Question set to run when no path is given on the command line.
    pub question_set: Option<String>,
    /// Use ASCII-only glyphs for icons and markers.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable the countdown pulse and motion effects.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    /// Directory the export CSV is written to. Defaults to the working directory.
    pub output_dir: Option<String>,
}

impl CanvassConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn question_set(&self) -> Option<&str> {
        self.app.as_ref()?.question_set.as_deref()
    }

    #[must_use]
    pub fn output_dir(&self) -> Option<PathBuf> {
        let dir = self.export.as_ref()?.output_dir.as_ref()?;
        Some(PathBuf::from(expand_env_vars(dir)))
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app.as_ref().map_or_else(UiOptions::default, |app| {
            UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
                reduced_motion: app.reduced_motion,
            }
        })
    }

    /// Persist the last-run question set to the config file.
    ///
    /// Uses `toml_edit` to preserve comments and formatting.
    /// Creates the config file and parent directory if they don't exist.
    pub fn persist_question_set(set_path: &str) -> std::io::Result<()> {
        let path = match config_path() {
            Some(path) => path,
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config path",
                ));
            }
        };

        // Ensure parent directory exists with owner-only permissions
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::{MetadataExt, PermissionsExt};
                let metadata = fs::metadata(parent)?;
                // Only modify permissions if we own the directory
                let our_uid = unsafe { libc::getuid() };
                if metadata.uid() == our_uid {
                    let mode = metadata.permissions().mode() & 0o777;
                    if mode & 0o077 != 0 {
                        fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
                    }
                }
            }
        }

        // Load existing config or create empty document
        let content = if path.exists() {
            fs::read_to_string(&path)?
        } else {
            String::new()
        };

        let mut doc = content
            .parse::<toml_edit::DocumentMut>()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if !doc.contains_key("app") {
            doc["app"] = toml_edit::Item::Table(toml_edit::Table::new());
        }

        doc["app"]["question_set"] = toml_edit::value(set_path);

        canvass_utils::atomic_write_with_options(
            &path,
            doc.to_string().as_bytes(),
            canvass_utils::AtomicWriteOptions {
                sync_all: true,
                dir_sync: true,
                unix_mode: None,
            },
        )?;

        Ok(())
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".canvass").join("config.toml"))
}

pub(crate) fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < value.len() {
        if value[i..].starts_with("${") {
            let start = i + 2;
            if let Some(end_rel) = value[start..].find('}') {
                let end = start + end_rel;
                let var = &value[start..end];
                if !var.is_empty() {
                    let replacement = env::var(var).unwrap_or_default();
                    out.push_str(&replacement);
                }
                i = end + 1;
                continue;
            }
        }

        let ch = value[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}
