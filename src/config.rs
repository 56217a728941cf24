//! User configuration: credentials, API settings and keybindings.
//!
//! Stored as TOML at `$XDG_CONFIG_HOME/pocket/config.toml` (default
//! `~/.config/pocket/config.toml`).  A template is written on first run.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://getpocket.com/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const TEMPLATE: &str = r#"# pocket configuration
#
# Fill in both credentials from https://getpocket.com/developer/ before
# starting the browser.

[global]
consumer_key = ""
access_token = ""

# [api]
# endpoint = "https://getpocket.com/v3"
# timeout_secs = 30

# Key bindings replace the defaults of the action they name.
# Modifiers: Ctrl+, Alt+ (prefix)
# Special keys: Up, Down, Left, Right, Enter, Esc, Tab, Backspace, Delete,
#   Home, End, PageUp, PageDown, Space, F1-F12
#
# [keys]
# down = ["j", "Down"]
"#;

// ───────────────────────────────────────── actions ───────────

/// Logical user actions, independent of the physical keys bound to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ToggleHelp,
    MoveDown,
    MoveUp,
    PrevPage,
    NextPage,
    Refresh,
    Archive,
    Delete,
    Copy,
    Open,
    Mail,
    /// Leave the help screen.
    Dismiss,
    /// Confirm the pending delete.
    ConfirmDelete,
    /// Abandon the pending delete.
    Cancel,
}

impl Action {
    /// Actions reachable through the binding table, in help-screen order.
    /// Blank lines in the help text fall between the groups.
    pub const GROUPS: &[&[Action]] = &[
        &[Action::ToggleHelp, Action::Quit],
        &[Action::PrevPage, Action::MoveDown, Action::MoveUp, Action::NextPage],
        &[Action::Archive, Action::Delete, Action::Refresh],
        &[Action::Copy, Action::Mail, Action::Open],
    ];

    /// Description shown on the help screen.
    pub fn label(self) -> &'static str {
        match self {
            Action::Quit => "quit",
            Action::ToggleHelp => "display this help",
            Action::MoveDown => "next item",
            Action::MoveUp => "previous item",
            Action::PrevPage => "previous page",
            Action::NextPage => "next page",
            Action::Refresh => "refresh list",
            Action::Archive => "archive item then refresh",
            Action::Delete => "delete item (with confirmation) then refresh",
            Action::Copy => "copy link to clipboard",
            Action::Open => "open link in browser",
            Action::Mail => "open link in new mail",
            Action::Dismiss => "close help",
            Action::ConfirmDelete => "confirm delete",
            Action::Cancel => "cancel",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "quit" => Some(Action::Quit),
            "help" => Some(Action::ToggleHelp),
            "down" => Some(Action::MoveDown),
            "up" => Some(Action::MoveUp),
            "prev_page" => Some(Action::PrevPage),
            "next_page" => Some(Action::NextPage),
            "refresh" => Some(Action::Refresh),
            "archive" => Some(Action::Archive),
            "delete" => Some(Action::Delete),
            "copy" => Some(Action::Copy),
            "open" => Some(Action::Open),
            "mail" => Some(Action::Mail),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Only CTRL and ALT take part in matching; SHIFT is already encoded in the
/// character itself (`'?'`, `'A'`) and terminals disagree on reporting it.
const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL.union(KeyModifiers::ALT);

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Help-screen form: characters quoted (`'q'`), named keys spelled out.
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) if self.modifiers.is_empty() => format!("'{c}'"),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "UP".into(),
            KeyCode::Down => "DOWN".into(),
            KeyCode::Left => "LEFT".into(),
            KeyCode::Right => "RIGHT".into(),
            KeyCode::Enter => "ENTER".into(),
            KeyCode::Esc => "ESC".into(),
            KeyCode::Tab => "TAB".into(),
            KeyCode::Backspace => "BACKSPACE".into(),
            KeyCode::Delete => "DELETE".into(),
            KeyCode::Home => "HOME".into(),
            KeyCode::End => "END".into(),
            KeyCode::PageUp => "PAGE_UP".into(),
            KeyCode::PageDown => "PAGE_DOWN".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+r"`, `"PageUp"`, `"q"`, `"F5"`.
    /// Single characters are case-sensitive; names are not.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        // A lone "+" splits into two empty parts.
        let (key_part, prefix) = match parts.as_slice() {
            [.., "", ""] => ("+", &parts[..parts.len() - 2]),
            [prefix @ .., last] => (*last, prefix),
            [] => return None,
        };

        for part in prefix {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                _ => return None,
            }
        }

        let mut chars = key_part.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyBind::new(KeyCode::Char(c), modifiers));
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                if !(1..=12).contains(&n) {
                    return None;
                }
                KeyCode::F(n)
            }
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── bindings ──────────

/// The normal-mode binding table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    map: HashMap<Action, Vec<KeyBind>>,
}

impl Default for Bindings {
    fn default() -> Self {
        let ch = |c| KeyBind::plain(KeyCode::Char(c));
        let key = KeyBind::plain;
        let mut m = HashMap::new();

        m.insert(Action::Quit, vec![ch('q'), key(KeyCode::Esc)]);
        m.insert(Action::ToggleHelp, vec![ch('?')]);
        m.insert(Action::MoveDown, vec![ch('j'), key(KeyCode::Down)]);
        m.insert(Action::MoveUp, vec![ch('k'), key(KeyCode::Up)]);
        m.insert(Action::PrevPage, vec![ch('h'), key(KeyCode::Left), key(KeyCode::PageUp)]);
        m.insert(Action::NextPage, vec![ch('l'), key(KeyCode::Right), key(KeyCode::PageDown)]);
        m.insert(Action::Refresh, vec![ch('r'), key(KeyCode::F(5))]);
        m.insert(Action::Archive, vec![ch('a'), ch('e')]);
        m.insert(Action::Delete, vec![ch('d'), ch('x')]);
        m.insert(Action::Copy, vec![ch('c')]);
        m.insert(Action::Open, vec![ch('o'), key(KeyCode::Enter)]);
        m.insert(Action::Mail, vec![ch('m')]);

        Self { map: m }
    }
}

impl Bindings {
    /// Find the action bound to a key event.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, binds)| binds.iter().any(|b| b.matches(event)))
            .map(|(&action, _)| action)
    }

    pub fn get(&self, action: Action) -> &[KeyBind] {
        self.map.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace `action`'s keys.  The keys are removed from every other
    /// action so one key never maps to two actions.
    pub fn set(&mut self, action: Action, binds: Vec<KeyBind>) {
        for (other, existing) in self.map.iter_mut() {
            if *other != action {
                existing.retain(|b| !binds.contains(b));
            }
        }
        self.map.insert(action, binds);
    }

    /// Key-binding reference shown on the help screen, one entry per line,
    /// framed by blank lines.
    pub fn help_lines(&self) -> Vec<String> {
        let mut lines = vec![String::new()];
        for group in Action::GROUPS {
            for &action in *group {
                let mut keys: Vec<String> = self.get(action).iter().map(KeyBind::display).collect();
                if action == Action::Quit {
                    keys.push("Ctrl+C".into());
                }
                let keys = if keys.is_empty() { "unbound".to_string() } else { keys.join(", ") };
                lines.push(format!("{keys:<27}{}", action.label()));
            }
            lines.push(String::new());
        }
        lines
    }
}

// ───────────────────────────────────────── config file ───────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the user configuration directory")]
    NoConfigDir,
    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("fill in consumer_key and access_token in {}", .path.display())]
    MissingCredentials { path: PathBuf },
    #[error("unknown action `{name}` in [keys] of {}", .path.display())]
    UnknownAction { path: PathBuf, name: String },
    #[error("invalid key `{key}` for `{action}` in {}", .path.display())]
    InvalidKey {
        path: PathBuf,
        action: String,
        key: String,
    },
}

/// On-disk TOML structure.  Every section is optional so a partially
/// filled template still parses and validation can name what is missing.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    global: Option<GlobalSection>,
    api: Option<ApiSection>,
    keys: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Default, Deserialize)]
struct GlobalSection {
    consumer_key: Option<String>,
    access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

/// Pocket API credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub access_token: String,
}

/// Fully validated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// File the configuration was read from.
    pub path: PathBuf,
    pub credentials: Credentials,
    pub endpoint: String,
    pub timeout: Duration,
    pub bindings: Bindings,
}

impl AppConfig {
    /// Load from `path` (or the platform default), writing the template
    /// first if the file does not exist yet.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path,
            None => default_path().ok_or(ConfigError::NoConfigDir)?,
        };
        if !path.exists() {
            write_template(&path)?;
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: PathBuf) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        let global = file.global.unwrap_or_default();
        let consumer_key = global.consumer_key.unwrap_or_default().trim().to_string();
        let access_token = global.access_token.unwrap_or_default().trim().to_string();
        if consumer_key.is_empty() || access_token.is_empty() {
            return Err(ConfigError::MissingCredentials { path });
        }

        let api = file.api.unwrap_or_default();
        let endpoint = api
            .endpoint
            .map(|e| e.trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let timeout = Duration::from_secs(api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1));

        let mut bindings = Bindings::default();
        for (name, keys) in file.keys.unwrap_or_default() {
            let Some(action) = Action::from_config_key(&name) else {
                return Err(ConfigError::UnknownAction { path, name });
            };
            let mut parsed = Vec::with_capacity(keys.len());
            for key in keys {
                match KeyBind::parse(&key) {
                    Some(bind) => parsed.push(bind),
                    None => {
                        return Err(ConfigError::InvalidKey {
                            path,
                            action: name,
                            key,
                        })
                    }
                }
            }
            bindings.set(action, parsed);
        }

        Ok(Self {
            path,
            credentials: Credentials {
                consumer_key,
                access_token,
            },
            endpoint,
            timeout,
            bindings,
        })
    }
}

fn write_template(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, TEMPLATE).map_err(io_err)?;
    tracing::info!(path = %path.display(), "wrote configuration template");
    Ok(())
}

/// Platform config file path (`<config_dir>/pocket/config.toml`).
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pocket").join("config.toml"))
}
