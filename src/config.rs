//! Command-line configuration and on-disk locations.

use std::path::PathBuf;

use clap::Parser;

use crate::search::PAGE_SIZES;

pub const APP_DIR: &str = "user-dashboard";

#[derive(Debug, Clone, Parser)]
#[command(name = "user-dashboard", version, about = "Search, filter and inspect user records")]
pub struct Cli {
    /// Users document: an http(s) URL or a local JSON file.
    #[arg(long, env = "USER_DASHBOARD_SOURCE", default_value = "data/users.json")]
    pub source: String,

    /// Initial page size (5, 10 or 20).
    #[arg(long, default_value_t = 10, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Directory holding theme.conf and keybinds.conf.
    #[arg(long, env = "USER_DASHBOARD_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Tracing filter, e.g. `info` or `user_dashboard=debug`.
    #[arg(long, env = "USER_DASHBOARD_LOG", default_value = "info")]
    pub log_level: String,

    /// Log file; defaults to the user data directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    if PAGE_SIZES.contains(&n) {
        Ok(n)
    } else {
        Err(format!("page size must be one of {:?}", PAGE_SIZES))
    }
}

impl Cli {
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(default_config_dir)
    }

    pub fn theme_path(&self) -> PathBuf {
        self.config_dir().join("theme.conf")
    }

    pub fn keybinds_path(&self) -> PathBuf {
        self.config_dir().join("keybinds.conf")
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("user-dashboard.log")
        })
    }
}

/// `<config dir>/user-dashboard`, or the working directory when there is no config dir.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `key = value` pairs of a conf file, trimmed. Blank lines, `#` comments and
/// lines without both sides are skipped.
pub fn conf_pairs(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        let (key, value) = (key.trim(), value.trim());
        (!key.is_empty() && !value.is_empty()).then_some((key, value))
    })
}
