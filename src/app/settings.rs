//! Connection settings: parse/write `reqres-admin.conf`.
//!
//! The file uses the same `<key> = <value>` format as `keybinds.conf`.
//! Command-line flags override whatever the file provides.

use std::time::Duration;

use crate::api::{ApiConfig, DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const SETTINGS_FILE: &str = "reqres-admin.conf";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// API root, e.g. `https://reqres.in/api`.
    pub base_url: String,
    /// Value sent in the `x-api-key` header.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// How long toast notifications stay in the status bar.
    pub toast_secs: u64,
    /// Keep the session between runs.
    pub persist_session: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            toast_secs: 4,
            persist_session: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`, then from the config directory; if neither
    /// exists, write the defaults to `path`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path(SETTINGS_FILE) {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(path) {
            tracing::debug!(error = %e, path, "could not write default settings");
        }
        cfg
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Unknown keys and unparsable values are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }

            match lhs {
                "base_url" => cfg.base_url = rhs.trim_end_matches('/').to_string(),
                "api_key" => cfg.api_key = rhs.to_string(),
                "timeout_secs" => {
                    if let Ok(v) = rhs.parse::<u64>() {
                        cfg.timeout_secs = v.max(1);
                    }
                }
                "toast_secs" => {
                    if let Ok(v) = rhs.parse::<u64>() {
                        cfg.toast_secs = v;
                    }
                }
                "persist_session" => cfg.persist_session = parse_bool(rhs),
                _ => tracing::debug!(key = lhs, "unknown setting"),
            }
        }
        cfg
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# reqres-admin settings\n");
        buf.push_str("# Command-line flags take precedence over these values.\n\n");
        let _ = writeln!(&mut buf, "base_url = {}", self.base_url);
        let _ = writeln!(&mut buf, "api_key = {}", self.api_key);
        let _ = writeln!(&mut buf, "timeout_secs = {}", self.timeout_secs);
        let _ = writeln!(&mut buf, "toast_secs = {}", self.toast_secs);
        let _ = writeln!(&mut buf, "persist_session = {}", self.persist_session);
        std::fs::write(path, buf)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_secs)
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_known_keys_only() {
        let cfg = Settings::parse(
            "# c\nbase_url = http://localhost:9000/api/\ntimeout_secs = 0\ncolor = red\npersist_session = no\napi_key=\n",
        );
        assert_eq!(cfg.base_url, "http://localhost:9000/api");
        assert_eq!(cfg.timeout_secs, 1);
        assert!(!cfg.persist_session);
        assert_eq!(cfg.api_key, DEFAULT_API_KEY);
    }

    #[test]
    fn written_file_parses_back() {
        let cfg = Settings { toast_secs: 9, ..Settings::default() };
        let mut path = std::env::temp_dir();
        path.push(format!("reqres_admin_settings_{}.conf", std::process::id()));
        let p = path.to_string_lossy().to_string();
        cfg.write_file(&p).unwrap();
        assert_eq!(Settings::from_file(&p), Some(cfg));
        std::fs::remove_file(&p).ok();
    }
}
