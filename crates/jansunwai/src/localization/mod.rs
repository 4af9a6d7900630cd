//! Bilingual string store with a persisted language preference.

mod keys;
mod language;
mod preferences;
mod router;
mod store;
mod tables;

pub use keys::LocalizationKey;
pub use language::Language;
pub use preferences::{
    FilePreferenceStore, InMemoryPreferenceStore, PreferenceError, PreferenceStore,
    LANGUAGE_PREFERENCE_KEY,
};
pub use router::{localization_router, LanguageQuery};
pub use store::{LocalizationEntry, LocalizationStore};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strum::IntoEnumIterator;

    struct BrokenPreferences;

    impl PreferenceStore for BrokenPreferences {
        fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
            Err(PreferenceError::Unavailable("disk offline".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
            Err(PreferenceError::Unavailable("disk offline".to_string()))
        }
    }

    fn store() -> (LocalizationStore, InMemoryPreferenceStore) {
        let preferences = InMemoryPreferenceStore::default();
        let store = LocalizationStore::load(Arc::new(preferences.clone()));
        (store, preferences)
    }

    #[test]
    fn every_key_is_translated_in_every_language() {
        for key in LocalizationKey::iter() {
            let english = tables::lookup(Language::English, key);
            assert!(!english.trim().is_empty(), "{key:?} missing English text");
            for language in Language::supported() {
                let value = tables::lookup(language, key);
                assert!(!value.trim().is_empty(), "{key:?} missing {language:?} text");
                if language != Language::English {
                    assert_ne!(value, english, "{key:?} not translated for {language:?}");
                }
            }
        }
    }

    #[test]
    fn key_strings_round_trip_through_lookup() {
        let (store, _) = store();
        for key in LocalizationKey::iter() {
            assert_eq!(store.localized(key.as_str()), store.text(key));
        }
        assert_eq!(LocalizationKey::SendOtp.as_str(), "send_otp");
    }

    #[test]
    fn defaults_to_english_without_a_saved_preference() {
        let (store, _) = store();
        assert_eq!(store.language(), Language::English);
        assert_eq!(store.localized("submit"), "Submit");
    }

    #[test]
    fn switching_language_changes_known_keys_only() {
        let (store, preferences) = store();
        let before = store.localized("please_select_department").into_owned();

        store.set_language(Language::Hindi);

        assert_ne!(store.localized("please_select_department"), before);
        assert_eq!(store.localized("please_select_department"), "कृपया एक विभाग चुनें");
        assert_eq!(store.localized("no_such_key"), "no_such_key");
        assert_eq!(
            preferences.get(LANGUAGE_PREFERENCE_KEY).expect("read"),
            Some("hi".to_string())
        );
    }

    #[test]
    fn unsupported_codes_are_ignored() {
        let (store, preferences) = store();
        assert_eq!(store.set_language_code("fr"), None);
        assert_eq!(store.language(), Language::English);
        assert_eq!(preferences.get(LANGUAGE_PREFERENCE_KEY).expect("read"), None);

        assert_eq!(store.set_language_code("hi-IN"), Some(Language::Hindi));
        assert_eq!(store.language(), Language::Hindi);
    }

    #[test]
    fn restores_persisted_language_on_load() {
        let preferences = InMemoryPreferenceStore::default();
        preferences
            .set(LANGUAGE_PREFERENCE_KEY, "hi")
            .expect("seed preference");

        let store = LocalizationStore::load(Arc::new(preferences));
        assert_eq!(store.language(), Language::Hindi);
    }

    #[test]
    fn garbage_preference_falls_back_to_default() {
        let preferences = InMemoryPreferenceStore::default();
        preferences
            .set(LANGUAGE_PREFERENCE_KEY, "klingon")
            .expect("seed preference");

        let store = LocalizationStore::load(Arc::new(preferences));
        assert_eq!(store.language(), Language::English);
    }

    #[test]
    fn broken_preferences_do_not_block_language_switches() {
        let store = LocalizationStore::load(Arc::new(BrokenPreferences));
        assert_eq!(store.language(), Language::English);

        store.set_language(Language::Hindi);
        assert_eq!(store.language(), Language::Hindi);
    }

    #[test]
    fn strict_switch_keeps_language_when_persisting_fails() {
        let store = LocalizationStore::load(Arc::new(BrokenPreferences));

        let result = store.try_set_language(Language::Hindi);
        assert!(matches!(result, Err(PreferenceError::Unavailable(_))));
        assert_eq!(store.language(), Language::English);
    }

    #[test]
    fn concurrent_switches_leave_persisted_and_active_in_agreement() {
        let (store, preferences) = store();

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for round in 0..200 {
                        let language = if (worker + round) % 2 == 0 {
                            Language::Hindi
                        } else {
                            Language::English
                        };
                        store.set_language(language);
                    }
                });
            }
        });

        assert_eq!(
            preferences.get(LANGUAGE_PREFERENCE_KEY).expect("read"),
            Some(store.language().code().to_string())
        );
    }

    #[test]
    fn subscribers_observe_changes() {
        let (store, _) = store();
        let mut receiver = store.subscribe();
        assert!(!receiver.has_changed().expect("sender alive"));

        store.set_language(Language::Hindi);
        assert!(receiver.has_changed().expect("sender alive"));
        assert_eq!(*receiver.borrow_and_update(), Language::Hindi);

        store.set_language(Language::Hindi);
        assert!(
            !receiver.has_changed().expect("sender alive"),
            "re-selecting the active language is not a change"
        );
    }

    #[test]
    fn catalog_covers_every_key() {
        let (store, _) = store();
        store.set_language(Language::Hindi);
        let catalog = store.catalog();
        assert_eq!(catalog.len(), LocalizationKey::iter().count());
        let title = catalog
            .iter()
            .find(|entry| entry.key == "app_title")
            .expect("app title entry");
        assert_eq!(title.value, "जनसुनवाई");
    }
}
