use std::borrow::Cow;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use strum::IntoEnumIterator;
use tokio::sync::watch;
use tracing::{info, warn};

use super::keys::LocalizationKey;
use super::language::Language;
use super::preferences::{PreferenceError, PreferenceStore, LANGUAGE_PREFERENCE_KEY};
use super::tables;

/// Process-wide string lookup keyed by the active language.
///
/// One instance is built by the host and shared (`Arc`) with every consumer.
/// The active language lives in a watch channel: reads never block each other,
/// writers are serialized so the persisted and active language agree, and
/// every change is published to receivers from [`subscribe`](Self::subscribe)
/// so bound text can re-render.
pub struct LocalizationStore {
    active: watch::Sender<Language>,
    preferences: Arc<dyn PreferenceStore>,
    writer: Mutex<()>,
}

/// One entry of the rendered catalog for a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizationEntry {
    pub key: &'static str,
    pub value: &'static str,
}

impl LocalizationStore {
    /// Builds the store from the persisted preference, falling back to the
    /// default language when nothing usable is stored.
    pub fn load(preferences: Arc<dyn PreferenceStore>) -> Self {
        let initial = match preferences.get(LANGUAGE_PREFERENCE_KEY) {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                warn!(%code, "ignoring unsupported persisted language");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(err) => {
                warn!(error = %err, "could not read language preference");
                Language::default()
            }
        };

        let (active, _) = watch::channel(initial);
        Self {
            active,
            preferences,
            writer: Mutex::new(()),
        }
    }

    pub fn language(&self) -> Language {
        *self.active.borrow()
    }

    /// Switches the active language, persists it and notifies subscribers.
    ///
    /// Persistence is best effort: a failing preference store is logged and
    /// the in-memory switch still happens.
    pub fn set_language(&self, language: Language) {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = self.persist(language) {
            warn!(error = %err, language = language.code(), "could not persist language preference");
        }
        self.switch(language);
    }

    /// Persists `language` and only then makes it active. A failed write is
    /// returned and leaves the active language untouched.
    pub fn try_set_language(&self, language: Language) -> Result<(), PreferenceError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.persist(language)?;
        self.switch(language);
        Ok(())
    }

    fn persist(&self, language: Language) -> Result<(), PreferenceError> {
        self.preferences
            .set(LANGUAGE_PREFERENCE_KEY, language.code())
    }

    fn switch(&self, language: Language) {
        let changed = self.active.send_if_modified(|current| {
            if *current == language {
                false
            } else {
                *current = language;
                true
            }
        });

        if changed {
            info!(language = language.code(), "active language changed");
        }
    }

    /// Same as [`set_language`](Self::set_language) for a raw code. Unsupported
    /// codes are ignored and yield `None`.
    pub fn set_language_code(&self, code: &str) -> Option<Language> {
        let language = Language::from_code(code)?;
        self.set_language(language);
        Some(language)
    }

    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.active.subscribe()
    }

    pub fn text(&self, key: LocalizationKey) -> &'static str {
        tables::lookup(self.language(), key)
    }

    pub fn text_in(&self, language: Language, key: LocalizationKey) -> &'static str {
        tables::lookup(language, key)
    }

    /// Looks up a string key in the active language. Unknown keys come back
    /// verbatim so a missing translation is visible instead of fatal.
    pub fn localized<'a>(&self, key: &'a str) -> Cow<'a, str> {
        self.localized_in(self.language(), key)
    }

    pub fn localized_in<'a>(&self, language: Language, key: &'a str) -> Cow<'a, str> {
        match LocalizationKey::from_str(key) {
            Ok(known) => Cow::Borrowed(tables::lookup(language, known)),
            Err(_) => Cow::Borrowed(key),
        }
    }

    pub fn catalog(&self) -> Vec<LocalizationEntry> {
        self.catalog_for(self.language())
    }

    pub fn catalog_for(&self, language: Language) -> Vec<LocalizationEntry> {
        LocalizationKey::iter()
            .map(|key| LocalizationEntry {
                key: key.as_str(),
                value: tables::lookup(language, key),
            })
            .collect()
    }
}

impl std::fmt::Debug for LocalizationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationStore")
            .field("language", &self.language())
            .finish_non_exhaustive()
    }
}
