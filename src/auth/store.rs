use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Durable string key/value storage for session state.
///
/// The backend hands out an opaque session token at login; the app keeps it
/// (and the cached user profile) across restarts. The trait keeps the core
/// independent of where that storage lives.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// TOML-file store at the platform config directory.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileSessionStore {
    pub fn session_file_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("vtiger-cli")
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".vtiger-cli")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("session.toml"))
    }

    /// Opens the store at the default path, creating an empty one when no
    /// file exists yet.
    pub fn open() -> Result<Self> {
        Self::open_at(Self::session_file_path()?)
    }

    pub fn open_at(path: PathBuf) -> Result<Self> {
        debug!("Loading session store from: {:?}", path);

        if !path.exists() {
            debug!("Session file doesn't exist yet, starting empty");
            return Ok(Self {
                path,
                values: HashMap::new(),
            });
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session file: {:?}", path))?;
        let values: HashMap<String, String> = toml::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {:?}", path))?;

        debug!("Loaded session store with {} entries", values.len());
        Ok(Self { path, values })
    }

    fn save(&self) -> Result<()> {
        let content =
            toml::to_string_pretty(&self.values).context("Failed to serialize session state")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {:?}", self.path))?;
        debug!("Session state saved to {:?}", self.path);
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.save()
        } else {
            Ok(())
        }
    }
}

/// In-memory store for tests and one-shot use.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
