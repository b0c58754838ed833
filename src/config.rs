use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;
use tracing::{debug, warn};

use crate::tape::DEFAULT_PAGE_BYTES;

/// Interpreter settings that can come from the config file or environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Bytes per tape page.
    pub page_bytes: usize,
    /// Treat a skipped loop with no matching `]` as an error.
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_bytes: DEFAULT_PAGE_BYTES,
            strict: false,
        }
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Settings for this process: defaults, then `boof.toml`, then environment.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        let mut cfg = Settings::default();
        if let Some(content) = read_config_file() {
            apply_toml(&mut cfg, &content);
        }
        apply_env(&mut cfg, |key| std::env::var(key).ok());
        cfg
    })
}

fn config_path() -> Option<PathBuf> {
    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("boof.toml");
    Some(path)
}

fn read_config_file() -> Option<String> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    debug!(path = %path.display(), "read config file");
    Some(content)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A page size must be positive and its bit count must fit in a `usize`.
fn parse_page_bytes(value: &str) -> Option<usize> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0 && *n <= usize::MAX / 8)
}

/// Apply the `[runtime]` section of a `boof.toml`.
///
/// Only `key = value` lines are understood; values may be quoted.
fn apply_toml(cfg: &mut Settings, content: &str) {
    let mut in_runtime = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_runtime = &line[1..line.len() - 1] == "runtime";
            continue;
        }
        if !in_runtime {
            continue;
        }
        if let Some((key, val_raw)) = line.split_once('=') {
            let val_raw = val_raw.trim();
            let val = val_raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(val_raw);
            map.insert(key.trim().to_string(), val.to_string());
        }
    }

    if let Some(v) = map.get("page_bytes") {
        match parse_page_bytes(v) {
            Some(n) => cfg.page_bytes = n,
            None => warn!(value = %v, "ignoring invalid page_bytes in boof.toml"),
        }
    }
    if let Some(v) = map.get("strict") {
        match parse_bool(v) {
            Some(b) => cfg.strict = b,
            None => warn!(value = %v, "ignoring invalid strict in boof.toml"),
        }
    }
}

/// Apply `BOOF_PAGE_BYTES` and `BOOF_STRICT`.
fn apply_env(cfg: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("BOOF_PAGE_BYTES") {
        match parse_page_bytes(&v) {
            Some(n) => cfg.page_bytes = n,
            None => warn!(value = %v, "ignoring invalid BOOF_PAGE_BYTES"),
        }
    }
    if let Some(v) = var("BOOF_STRICT") {
        match parse_bool(&v) {
            Some(b) => cfg.strict = b,
            None => warn!(value = %v, "ignoring invalid BOOF_STRICT"),
        }
    }
}
