//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only the dashboard's normal mode goes through the keymap. Search input and the
//! detail overlay use fixed keys (typing, Esc, Tab/Shift+Tab, Enter).

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::conf_pairs;

/// Semantic actions available in normal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Focus the search prompt.
    StartSearch,
    /// Cycle the status filter All -> Active -> Inactive.
    CycleStatusFilter,
    /// Switch between name A→Z and Z→A.
    ToggleSort,
    /// Cycle the page size through 5, 10, 20.
    CyclePageSize,
    /// Previous page.
    PrevPage,
    /// Next page.
    NextPage,
    /// Move the row selection up.
    MoveUp,
    /// Move the row selection down.
    MoveDown,
    /// Open the detail overlay for the selected row.
    OpenDetail,
    /// Flip between light and dark.
    ToggleTheme,
    /// Re-fetch the users list.
    Retry,
    /// Show or hide the keybindings line.
    ToggleHelp,
}

/// Mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings (arrows plus vim-style hjkl).
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('s')), KeyAction::CycleStatusFilter);
        bindings.insert((M::NONE, Char('o')), KeyAction::ToggleSort);
        bindings.insert((M::NONE, Char('p')), KeyAction::CyclePageSize);
        bindings.insert((M::NONE, Char('t')), KeyAction::ToggleTheme);
        bindings.insert((M::NONE, Char('r')), KeyAction::Retry);
        bindings.insert((M::NONE, Char('?')), KeyAction::ToggleHelp);
        // some terminals report '?' with SHIFT held
        bindings.insert((M::SHIFT, Char('?')), KeyAction::ToggleHelp);
        bindings.insert((M::NONE, Enter), KeyAction::OpenDetail);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);

        Self { bindings }
    }

    /// Load `path`, or write the defaults there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default keybinds");
        }
        km
    }

    /// Start from defaults and override with `<Action> = <KeySpec>` lines
    /// (`<KeySpec> = <Action>` is accepted too). Unknown lines are skipped.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for (lhs, rhs) in conf_pairs(&contents) {
            let binding = match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => Some((key, action)),
                _ => parse_key(lhs).zip(parse_action(rhs)),
            };
            match binding {
                Some((key, action)) => {
                    map.bindings.insert(key, action);
                }
                None => tracing::debug!(lhs, rhs, "ignoring unrecognised keybind line"),
            }
        }
        Some(map)
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut lines: Vec<String> = self
            .all_bindings()
            .into_iter()
            .map(|((mods, code), action)| {
                format!("{} = {}", format_action(action), Self::format_key(mods, code))
            })
            .collect();
        lines.sort();

        let mut buf = String::from(
            "# user-dashboard keybindings (normal mode)\n\
             # Format: <Action> = <KeySpec>\n\
             # KeySpec examples: q, Ctrl+c, Shift+?, Enter, Left, PageDown, F5\n\n",
        );
        for line in lines {
            buf.push_str(&line);
            buf.push('\n');
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// First key bound to `action`, formatted for the help line.
    pub fn key_for(&self, action: KeyAction) -> Option<String> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .min_by_key(|k| (k.len(), k.clone()))
    }

    /// Format a key like "Ctrl+c", "Shift+?", "Enter", "F5" or "q".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        let base = match code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => NAMED_KEYS
                .iter()
                .find(|(c, _)| *c == other)
                .map(|(_, name)| name.to_string())
                .unwrap_or_else(|| format!("{other:?}")),
        };
        let mut out = String::new();
        if mods.contains(KeyModifiers::CONTROL) {
            out.push_str("Ctrl+");
        }
        if mods.contains(KeyModifiers::SHIFT) {
            out.push_str("Shift+");
        }
        out + &base
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

const NAMED_KEYS: [(KeyCode, &str); 10] = [
    (KeyCode::Enter, "Enter"),
    (KeyCode::Esc, "Esc"),
    (KeyCode::Tab, "Tab"),
    (KeyCode::BackTab, "BackTab"),
    (KeyCode::Up, "Up"),
    (KeyCode::Down, "Down"),
    (KeyCode::Left, "Left"),
    (KeyCode::Right, "Right"),
    (KeyCode::PageUp, "PageUp"),
    (KeyCode::PageDown, "PageDown"),
];

const ACTION_NAMES: [(KeyAction, &str); 13] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::CycleStatusFilter, "CycleStatusFilter"),
    (KeyAction::ToggleSort, "ToggleSort"),
    (KeyAction::CyclePageSize, "CyclePageSize"),
    (KeyAction::PrevPage, "PrevPage"),
    (KeyAction::NextPage, "NextPage"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::OpenDetail, "OpenDetail"),
    (KeyAction::ToggleTheme, "ToggleTheme"),
    (KeyAction::Retry, "Retry"),
    (KeyAction::ToggleHelp, "ToggleHelp"),
];

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    let mut rest = spec.trim();
    let mut mods = KeyModifiers::NONE;
    loop {
        if let Some(after) = rest.strip_prefix("Ctrl+") {
            mods |= KeyModifiers::CONTROL;
            rest = after;
        } else if let Some(after) = rest.strip_prefix("Shift+") {
            mods |= KeyModifiers::SHIFT;
            rest = after;
        } else {
            break;
        }
    }
    if rest == "Escape" {
        return Some((mods, KeyCode::Esc));
    }
    if let Some((code, _)) = NAMED_KEYS.iter().find(|(_, name)| *name == rest) {
        return Some((mods, *code));
    }
    if let Some(n) = rest.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then_some((mods, KeyCode::F(n)));
    }
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some((mods, KeyCode::Char(c))),
        _ => None,
    }
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTION_NAMES
        .iter()
        .find(|(_, name)| *name == s)
        .map(|(action, _)| *action)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_vim_and_arrow_keys() {
        let km = Keymap::default();
        let ev = |c| KeyEvent::new(c, KeyModifiers::NONE);
        assert_eq!(km.resolve(&ev(KeyCode::Char('j'))), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&ev(KeyCode::Right)), Some(KeyAction::NextPage));
        assert_eq!(km.resolve(&ev(KeyCode::Char('z'))), None);
    }

    #[test]
    fn file_overrides_and_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keybinds.conf");
        std::fs::write(&path, "# custom\nToggleTheme = Ctrl+t\nx = Quit\nnonsense\n").unwrap();
        let km = Keymap::from_file(&path).unwrap();
        let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(km.resolve(&ctrl_t), Some(KeyAction::ToggleTheme));
        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(km.resolve(&x), Some(KeyAction::Quit));

        km.write_file(&path).unwrap();
        let again = Keymap::from_file(&path).unwrap();
        assert_eq!(again.resolve(&ctrl_t), Some(KeyAction::ToggleTheme));
        let shift_q = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(again.resolve(&shift_q), Some(KeyAction::ToggleHelp));
    }

    #[test]
    fn key_specs_parse_and_format() {
        assert_eq!(parse_key("F5"), Some((KeyModifiers::NONE, KeyCode::F(5))));
        assert_eq!(parse_key("F13"), None);
        assert_eq!(parse_key("Escape"), Some((KeyModifiers::NONE, KeyCode::Esc)));
        assert_eq!(
            parse_key("Ctrl+Shift+x"),
            Some((KeyModifiers::CONTROL | KeyModifiers::SHIFT, KeyCode::Char('x')))
        );
        assert_eq!(parse_key("Home"), None);
        assert_eq!(Keymap::format_key(KeyModifiers::CONTROL, KeyCode::Char('c')), "Ctrl+c");
        assert_eq!(Keymap::format_key(KeyModifiers::NONE, KeyCode::PageDown), "PageDown");
        assert_eq!(format_action(KeyAction::CyclePageSize), "CyclePageSize");
        assert_eq!(parse_action(" Retry "), Some(KeyAction::Retry));
    }

    #[test]
    fn load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("keybinds.conf");
        let km = Keymap::load_or_init(&path);
        assert!(path.exists());
        assert_eq!(km.key_for(KeyAction::Retry).as_deref(), Some("r"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.lines().any(|l| l == "Quit = q"));
        assert!(written.lines().any(|l| l == "ToggleHelp = Shift+?"));
    }
}
