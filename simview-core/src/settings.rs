//! GUI settings shared by every panel, with change notifications.
//!
//! Values live in a string key-value store (browser storage in the real GUI,
//! a JSON file or memory here). Typed accessors fall back to defaults when a
//! value is missing or unreadable.

use crate::error::ConfigError;
use connection::{Connection, InProcessConnection};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::str::FromStr;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A flat JSON object on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let values = match std::fs::read(&path) {
            Ok(data) => serde_json::from_slice(&data)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(&self.values)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Nothing changes in memory unless the file was written.
    fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        let previous = self.values.insert(key.to_string(), value);
        if let Err(err) = self.save() {
            match previous {
                Some(previous) => self.values.insert(key.to_string(), previous),
                None => self.values.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    EditorWidth,
    ConsoleHeight,
    HideEditor,
    EditorFontSize,
    AutoUpdate,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::EditorWidth,
        ConfigKey::ConsoleHeight,
        ConfigKey::HideEditor,
        ConfigKey::EditorFontSize,
        ConfigKey::AutoUpdate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::EditorWidth => "editor_width",
            ConfigKey::ConsoleHeight => "console_height",
            ConfigKey::HideEditor => "hide_editor",
            ConfigKey::EditorFontSize => "editor_font_size",
            ConfigKey::AutoUpdate => "auto_update",
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiSettings {
    pub editor_width: f64,
    pub console_height: f64,
    pub hide_editor: bool,
    pub editor_font_size: i32,
    pub auto_update: bool,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            editor_width: 580.0,
            console_height: 100.0,
            hide_editor: false,
            editor_font_size: 12,
            auto_update: true,
        }
    }
}

struct ConfigInner {
    store: Box<dyn KeyValueStore>,
    subscribers: Vec<Weak<InProcessConnection<ConfigKey>>>,
}

/// Shared handle to the settings. Clones see the same values and the same
/// subscribers.
#[derive(Clone)]
pub struct ConfigContext {
    inner: Rc<RefCell<ConfigInner>>,
}

impl std::fmt::Debug for ConfigContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigContext")
            .field("settings", &self.snapshot())
            .finish()
    }
}

impl ConfigContext {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ConfigInner {
                store: Box::new(store),
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn subscribe(&self) -> Subscription {
        let queue = Rc::new(InProcessConnection::new());
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&queue));
        Subscription { queue }
    }

    pub fn snapshot(&self) -> GuiSettings {
        GuiSettings {
            editor_width: self.editor_width(),
            console_height: self.console_height(),
            hide_editor: self.hide_editor(),
            editor_font_size: self.editor_font_size(),
            auto_update: self.auto_update(),
        }
    }

    pub fn editor_width(&self) -> f64 {
        self.typed(ConfigKey::EditorWidth, GuiSettings::default().editor_width)
    }

    pub fn console_height(&self) -> f64 {
        self.typed(ConfigKey::ConsoleHeight, GuiSettings::default().console_height)
    }

    pub fn hide_editor(&self) -> bool {
        self.typed(ConfigKey::HideEditor, GuiSettings::default().hide_editor)
    }

    pub fn editor_font_size(&self) -> i32 {
        self.typed(ConfigKey::EditorFontSize, GuiSettings::default().editor_font_size)
    }

    pub fn auto_update(&self) -> bool {
        self.typed(ConfigKey::AutoUpdate, GuiSettings::default().auto_update)
    }

    pub fn set_editor_width(&self, width: f64) -> Result<(), ConfigError> {
        self.set_value(ConfigKey::EditorWidth, &width.to_string())
    }

    pub fn set_console_height(&self, height: f64) -> Result<(), ConfigError> {
        self.set_value(ConfigKey::ConsoleHeight, &height.to_string())
    }

    pub fn set_hide_editor(&self, hidden: bool) -> Result<(), ConfigError> {
        self.set_value(ConfigKey::HideEditor, &hidden.to_string())
    }

    pub fn set_editor_font_size(&self, size: i32) -> Result<(), ConfigError> {
        self.set_value(ConfigKey::EditorFontSize, &size.to_string())
    }

    pub fn set_auto_update(&self, enabled: bool) -> Result<(), ConfigError> {
        self.set_value(ConfigKey::AutoUpdate, &enabled.to_string())
    }

    /// Current value as text, defaults included.
    pub fn get_value(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::EditorWidth => self.editor_width().to_string(),
            ConfigKey::ConsoleHeight => self.console_height().to_string(),
            ConfigKey::HideEditor => self.hide_editor().to_string(),
            ConfigKey::EditorFontSize => self.editor_font_size().to_string(),
            ConfigKey::AutoUpdate => self.auto_update().to_string(),
        }
    }

    /// Validates and stores a textual value. Subscribers hear about it only
    /// when the stored value actually changes.
    pub fn set_value(&self, key: ConfigKey, value: &str) -> Result<(), ConfigError> {
        let normalized = normalize(key, value)?;
        let changed = {
            let mut inner = self.inner.borrow_mut();
            if inner.store.get(key.as_str()).as_deref() == Some(normalized.as_str()) {
                false
            } else {
                inner.store.set(key.as_str(), normalized)?;
                true
            }
        };
        if changed {
            self.notify(key);
        }
        Ok(())
    }

    fn notify(&self, key: ConfigKey) {
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|subscriber| match subscriber.upgrade() {
            Some(queue) => queue.send(key).is_ok(),
            None => false,
        });
    }

    fn typed<T: FromStr>(&self, key: ConfigKey, default: T) -> T {
        let raw = self.inner.borrow().store.get(key.as_str());
        match raw {
            Some(text) => text.parse().unwrap_or_else(|_| {
                log::warn!("ignoring unreadable setting {key}={text:?}");
                default
            }),
            None => default,
        }
    }
}

fn normalize(key: ConfigKey, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    match key {
        ConfigKey::EditorWidth | ConfigKey::ConsoleHeight => {
            let number: f64 = value.parse().map_err(|_| invalid("expected a number"))?;
            if !number.is_finite() || number < 0.0 {
                return Err(invalid("must be a finite, non-negative number"));
            }
            Ok(number.to_string())
        }
        ConfigKey::EditorFontSize => {
            let size: i32 = value.parse().map_err(|_| invalid("expected an integer"))?;
            if size < 1 {
                return Err(invalid("must be at least 1"));
            }
            Ok(size.to_string())
        }
        ConfigKey::HideEditor | ConfigKey::AutoUpdate => {
            let flag: bool = value
                .parse()
                .map_err(|_| invalid("expected 'true' or 'false'"))?;
            Ok(flag.to_string())
        }
    }
}

/// Receives the keys of settings changed after subscribing. Dropping it
/// unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    queue: Rc<InProcessConnection<ConfigKey>>,
}

impl Subscription {
    pub fn try_next(&self) -> Option<ConfigKey> {
        self.queue.try_recv().ok().flatten()
    }

    pub fn drain(&self) -> Vec<ConfigKey> {
        self.queue.drain().unwrap_or_default()
    }
}
