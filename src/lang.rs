//! JSON-based localization: supported locales, bundle sources, active catalog.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::watch;
use crate::fetch::{get_typed, Fetch, FetchError, FetchOptions};

// Generated by build.rs from lang/*.json
// Provides: pub static EMBEDDED_LANGS: &[(&str, &str)]
include!(concat!(env!("OUT_DIR"), "/lang_data.rs"));

/// Preference key holding the chosen locale code.
pub const STORAGE_KEY: &str = "lang";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    ZhCn,
}

impl Locale {
    /// Display order of the language toggle.
    pub const SUPPORTED: [Locale; 2] = [Locale::ZhCn, Locale::En];

    pub fn code(self) -> &'static str {
        match self { Locale::En => "en", Locale::ZhCn => "zh-CN" }
    }

    pub fn label(self) -> &'static str {
        match self { Locale::En => "EN", Locale::ZhCn => "简体中文" }
    }

    pub fn parse(code: &str) -> Option<Locale> {
        Locale::SUPPORTED.into_iter().find(|l| l.code() == code)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.code()) }
}

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("no translation bundle for {0}")]
    Missing(Locale),
    #[error("failed to load translation bundle for {locale}: {source}")]
    Fetch {
        locale: Locale,
        #[source]
        source: FetchError,
    },
    #[error("translation bundle for {locale} is malformed: {reason}")]
    Malformed { locale: Locale, reason: String },
    #[error("translation bundle for {0} has not been loaded")]
    NotLoaded(Locale),
}

/// Flattened translation table (`a.b.c` keys); string arrays kept as lists.
#[derive(Debug, Default, Clone)]
pub struct LangMap {
    strings: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
}

impl LangMap {
    pub fn from_json(root: &Value) -> Result<Self, String> {
        let Value::Object(obj) = root else { return Err("root is not an object".into()) };
        let mut map = LangMap::default();
        for (k, v) in obj { map.flatten(k.clone(), v); }
        Ok(map)
    }

    fn flatten(&mut self, prefix: String, value: &Value) {
        match value {
            Value::Object(obj) => {
                for (k, v) in obj { self.flatten(format!("{prefix}.{k}"), v); }
            }
            Value::String(s) => { self.strings.insert(prefix, s.clone()); }
            Value::Array(items) => {
                let list = items.iter().filter_map(|i| i.as_str().map(str::to_string)).collect();
                self.lists.insert(prefix, list);
            }
            Value::Null => {}
            other => { self.strings.insert(prefix, other.to_string()); }
        }
    }

    /// Fetch key translation or return the key itself if missing.
    pub fn get(&self, key: &str) -> String {
        self.strings.get(key).cloned().unwrap_or_else(|| key.to_string())
    }

    /// Like [`LangMap::get`] with `{{name}}` placeholders substituted.
    pub fn get_fmt(&self, key: &str, vars: &[(&str, &str)]) -> String {
        let mut out = self.get(key);
        for (name, value) in vars { out = out.replace(&format!("{{{{{name}}}}}"), value); }
        out
    }

    pub fn list(&self, key: &str) -> Vec<String> {
        self.lists.get(key).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize { self.strings.len() + self.lists.len() }
}

/// Where translation bundles come from.
#[async_trait]
pub trait BundleSource: Send + Sync {
    async fn load(&self, locale: Locale) -> Result<LangMap, LocaleError>;
}

/// Bundles compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedBundles;

#[async_trait]
impl BundleSource for EmbeddedBundles {
    async fn load(&self, locale: Locale) -> Result<LangMap, LocaleError> {
        let raw = EMBEDDED_LANGS
            .iter()
            .find(|(c, _)| *c == locale.code())
            .map(|(_, raw)| *raw)
            .ok_or(LocaleError::Missing(locale))?;
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| LocaleError::Malformed { locale, reason: e.to_string() })?;
        LangMap::from_json(&value).map_err(|reason| LocaleError::Malformed { locale, reason })
    }
}

/// Bundles served next to the site assets at `locales/{code}.json`.
pub struct RemoteBundles {
    fetcher: Arc<dyn Fetch>,
}

impl RemoteBundles {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self { Self { fetcher } }

    pub fn path(locale: Locale) -> String { format!("locales/{}.json", locale.code()) }
}

#[async_trait]
impl BundleSource for RemoteBundles {
    async fn load(&self, locale: Locale) -> Result<LangMap, LocaleError> {
        let value: Value = get_typed(self.fetcher.as_ref(), &Self::path(locale), &FetchOptions::default())
            .await
            .map_err(|source| LocaleError::Fetch { locale, source })?;
        LangMap::from_json(&value).map_err(|reason| LocaleError::Malformed { locale, reason })
    }
}

/// Loaded bundles plus the locale currently used for rendering.
pub struct Catalog {
    source: Arc<dyn BundleSource>,
    bundles: DashMap<Locale, Arc<LangMap>>,
    active: RwLock<Locale>,
    changes: watch::Sender<Locale>,
    // serializes loads so one locale is never fetched twice concurrently
    load_gate: tokio::sync::Mutex<()>,
}

impl Catalog {
    pub fn new(source: Arc<dyn BundleSource>, initial: Locale) -> Self {
        let (changes, _) = watch::channel(initial);
        Self { source, bundles: DashMap::new(), active: RwLock::new(initial), changes, load_gate: tokio::sync::Mutex::new(()) }
    }

    /// Notified with the new locale every time [`Catalog::apply`] changes it.
    pub fn subscribe(&self) -> watch::Receiver<Locale> { self.changes.subscribe() }

    pub fn active(&self) -> Locale { *self.active.read() }

    pub fn is_loaded(&self, locale: Locale) -> bool { self.bundles.contains_key(&locale) }

    /// Load a locale's bundle. Already-loaded locales are left untouched;
    /// returns whether a fetch actually happened.
    pub async fn load(&self, locale: Locale) -> Result<bool, LocaleError> {
        if self.is_loaded(locale) { return Ok(false); }
        let _gate = self.load_gate.lock().await;
        if self.is_loaded(locale) { return Ok(false); }
        let map = self.source.load(locale).await?;
        tracing::debug!(%locale, entries = map.len(), "translation bundle loaded");
        self.bundles.insert(locale, Arc::new(map));
        Ok(true)
    }

    /// Make `locale` the rendering locale. Returns false when it already was.
    pub fn apply(&self, locale: Locale) -> Result<bool, LocaleError> {
        if !self.is_loaded(locale) { return Err(LocaleError::NotLoaded(locale)); }
        let mut active = self.active.write();
        if *active == locale { return Ok(false); }
        *active = locale;
        self.changes.send_replace(locale);
        Ok(true)
    }

    fn current(&self) -> Option<Arc<LangMap>> {
        self.bundles.get(&self.active()).map(|m| m.value().clone())
    }

    /// Translate a key using the active bundle (fallback to key).
    pub fn tr(&self, key: &str) -> String {
        self.current().map(|m| m.get(key)).unwrap_or_else(|| key.to_string())
    }

    pub fn tr_fmt(&self, key: &str, vars: &[(&str, &str)]) -> String {
        self.current().map(|m| m.get_fmt(key, vars)).unwrap_or_else(|| key.to_string())
    }

    pub fn tr_list(&self, key: &str) -> Vec<String> {
        self.current().map(|m| m.list(key)).unwrap_or_default()
    }
}
