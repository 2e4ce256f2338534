//! Configuration for devdash.
//!
//! Configuration is read from `~/.config/devdash/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::fetcher::parallel::DEFAULT_WORKERS;

/// Environment variable that overrides `[github] token`.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
    pub feeds: FeedsConfig,
    pub github: GithubConfig,
}

/// Page sizes and limits for the three feeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub repos_per_page: u32,
    pub questions_per_page: u32,
    pub articles_per_page: u32,
    pub max_saved_repos: usize,
    /// Simultaneous pull-request lookups per repository page.
    pub enrich_concurrency: usize,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            repos_per_page: 6,
            questions_per_page: 6,
            articles_per_page: 10,
            max_saved_repos: 8,
            enrich_concurrency: DEFAULT_WORKERS,
        }
    }
}

impl FeedsConfig {
    /// The first page size set to zero, if any.
    fn zero_page_size(&self) -> Option<&'static str> {
        [
            ("repos_per_page", self.repos_per_page),
            ("questions_per_page", self.questions_per_page),
            ("articles_per_page", self.articles_per_page),
        ]
        .into_iter()
        .find(|(_, size)| *size == 0)
        .map(|(field, _)| field)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub token: Option<String>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields use default values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        if let Some(field) = config.feeds.zero_page_size() {
            return Err(ConfigError::Invalid {
                path: config_path.to_path_buf(),
                reason: format!("[feeds] {} must be at least 1", field),
            });
        }
        Ok(config)
    }

    /// `~/.config/devdash/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("devdash").join("config.toml"))
    }

    /// The GitHub token, preferring the environment over the file. Blank
    /// values count as missing.
    pub fn github_token(&self) -> Option<String> {
        let from_env = std::env::var(GITHUB_TOKEN_ENV).ok();
        pick_token(from_env, self.github.token.clone())
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# devdash configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "S", "/", "]"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[colors]
active_border = "Cyan"
inactive_border = "DarkGray"
selection_bg = "Cyan"
selection_fg = "Black"
item = "White"
saved_marker = "Yellow"
new_item = "LightGreen"
byline = "Yellow"
stats = "Gray"
link = "Blue"
current_page = "Cyan"
error = "LightRed"
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_pane = ["Tab", "l", "Right"]
prev_pane = ["BackTab", "Shift+Tab", "h", "Left"]

# Result pages (search mode only) and five-page chunks
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
next_chunk = ["]"]
prev_chunk = ["["]

search = ["/"]
clear_search = ["c", "Esc"]
cycle_sort = ["s"]
suggest_more = ["m"]
toggle_save = ["f", "Space"]
toggle_star = ["S"]
toggle_saved_view = ["v"]
clear_saved = ["X"]
open_in_browser = ["o", "Enter"]
open_fork = ["F"]
refresh = ["R"]

[feeds]
repos_per_page = 6
questions_per_page = 6
articles_per_page = 10
max_saved_repos = 8
# Simultaneous pull-request lookups when listing repositories
enrich_concurrency = 4

[github]
# Needed for starring and stats. GITHUB_TOKEN in the environment wins.
# token = "ghp_..."
"##
    }
}

fn pick_token(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
    from_env
        .into_iter()
        .chain(from_file)
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file at {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}
