use jansunwai::config::{AppConfig, PreferencesConfig, TrackingConfig};
use jansunwai::error::AppError;
use jansunwai::localization::{
    FilePreferenceStore, InMemoryPreferenceStore, Language, LocalizationStore, PreferenceStore,
};
use jansunwai::workflows::complaint::ComplaintService;
use jansunwai::workflows::tracking::{
    ComplaintLedgerImporter, InMemoryComplaintDirectory, TrackingService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything the HTTP surface and the CLI commands share.
pub(crate) struct AppServices {
    pub(crate) localization: Arc<LocalizationStore>,
    pub(crate) complaints: Arc<ComplaintService<InMemoryComplaintDirectory>>,
    pub(crate) tracking: Arc<TrackingService<InMemoryComplaintDirectory>>,
}

impl AppServices {
    pub(crate) fn build(config: &AppConfig) -> Result<Self, AppError> {
        let localization = Arc::new(load_localization(&config.preferences));
        let directory = Arc::new(seed_directory(&config.tracking)?);

        let complaints = Arc::new(ComplaintService::new(
            directory.clone(),
            localization.clone(),
            &config.workflow,
        ));
        let tracking = Arc::new(TrackingService::new(
            config.tracking.mode,
            directory,
            localization.clone(),
        ));

        Ok(Self {
            localization,
            complaints,
            tracking,
        })
    }
}

pub(crate) fn preference_store(config: &PreferencesConfig) -> Arc<dyn PreferenceStore> {
    match &config.path {
        Some(path) => {
            info!(path = %path.display(), "using file preference store");
            Arc::new(FilePreferenceStore::new(path))
        }
        None => Arc::new(InMemoryPreferenceStore::default()),
    }
}

pub(crate) fn load_localization(config: &PreferencesConfig) -> LocalizationStore {
    LocalizationStore::load(preference_store(config))
}

/// Builds the complaint directory, pre-filled from the configured ledger.
pub(crate) fn seed_directory(
    config: &TrackingConfig,
) -> Result<InMemoryComplaintDirectory, AppError> {
    match &config.ledger_path {
        Some(path) => {
            let records = ComplaintLedgerImporter::from_path(path)?;
            Ok(InMemoryComplaintDirectory::seeded(records))
        }
        None => Ok(InMemoryComplaintDirectory::default()),
    }
}

/// Parses a `--lang` flag. Unknown codes are reported instead of ignored.
pub(crate) fn parse_language(raw: &str) -> Result<Language, String> {
    Language::from_code(raw).ok_or_else(|| {
        let supported: Vec<&str> = Language::supported()
            .into_iter()
            .map(Language::code)
            .collect();
        format!(
            "unsupported language '{raw}' (expected one of {})",
            supported.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jansunwai::config::TrackingMode;
    use std::io::Write;

    #[test]
    fn missing_ledger_is_an_empty_directory() {
        let directory = seed_directory(&TrackingConfig {
            mode: TrackingMode::Directory,
            ledger_path: None,
        })
        .expect("directory");
        assert!(directory.is_empty());
    }

    #[test]
    fn ledger_file_seeds_the_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ledger.csv");
        let mut file = std::fs::File::create(&path).expect("create ledger");
        writeln!(
            file,
            "Complaint ID,Subject,Department,Location,Filed On,Update Date,Update Time,Status,Detail"
        )
        .expect("write header");
        writeln!(
            file,
            "JS-20240301-5555,Drain blocked,Sanitation,Ward 9,2024-03-01,2024-03-01,10:00,Registered,"
        )
        .expect("write row");
        drop(file);

        let directory = seed_directory(&TrackingConfig {
            mode: TrackingMode::Directory,
            ledger_path: Some(path.clone()),
        })
        .expect("directory");
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn unreadable_ledger_is_an_error() {
        let result = seed_directory(&TrackingConfig {
            mode: TrackingMode::Directory,
            ledger_path: Some("/definitely/not/here.csv".into()),
        });
        assert!(matches!(result, Err(AppError::Ledger(_))));
    }

    #[test]
    fn language_flag_parsing() {
        assert_eq!(parse_language("HI"), Ok(Language::Hindi));
        assert!(parse_language("fr")
            .expect_err("unsupported")
            .contains("en, hi"));
    }
}
