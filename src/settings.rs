use std::path::PathBuf;

/// Default backend when nothing is configured.
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Application settings that persist across sessions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the Doctrine backend.
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl Settings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/doctrine/doctrine_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\Doctrine\doctrine_settings.cfg
    /// On macOS:   ~/Library/Application Support/Doctrine/doctrine_settings.cfg
    pub(crate) fn settings_path() -> Option<PathBuf> {
        Some(config_dir()?.join("doctrine_settings.cfg"))
    }

    /// Load settings from disk. A missing or corrupt file falls back to
    /// defaults; the `DOCTRINE_SERVER` environment variable overrides the
    /// stored server URL either way.
    pub fn load() -> Self {
        let mut settings = Self::load_file().unwrap_or_default();
        if let Ok(url) = std::env::var("DOCTRINE_SERVER") {
            if !url.trim().is_empty() {
                settings.server_url = url.trim().to_string();
            }
        }
        settings
    }

    fn load_file() -> Option<Self> {
        let path = Self::settings_path()?;
        let content = std::fs::read_to_string(path).ok()?;

        let mut settings = Self::default();
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else { continue };
            match key.trim() {
                "server_url" => {
                    if !value.trim().is_empty() {
                        settings.server_url = value.trim().to_string();
                    }
                }
                _ => {}
            }
        }
        Some(settings)
    }

    /// Save settings to disk.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        let content = format!("server_url={}\n", self.server_url);
        let _ = std::fs::write(path, content);
    }
}

/// Platform config directory for this application, created on first use.
pub(crate) fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    let dir = {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                PathBuf::from(home).join(".config")
            })
            .join("doctrine")
    };
    #[cfg(target_os = "windows")]
    let dir = {
        let appdata = std::env::var("APPDATA")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()?;
        PathBuf::from(appdata).join("Doctrine")
    };
    #[cfg(target_os = "macos")]
    let dir = {
        let home = std::env::var("HOME").ok()?;
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("Doctrine")
    };
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    let dir = std::env::current_exe().ok()?.parent()?.to_path_buf();

    let _ = std::fs::create_dir_all(&dir);
    Some(dir)
}
