use crate::infra::{load_localization, parse_language, seed_directory};
use clap::Args;
use jansunwai::config::{AppConfig, TrackingMode, WorkflowConfig};
use jansunwai::error::AppError;
use jansunwai::localization::{
    InMemoryPreferenceStore, Language, LocalizationKey, LocalizationStore,
};
use jansunwai::workflows::complaint::{
    ComplaintService, Coordinate, Department, SubmissionSession, SubmitOutcome, WorkflowPhase,
    WorkflowSnapshot, WorkflowTiming,
};
use jansunwai::workflows::tracking::{
    ComplaintRecord, InMemoryComplaintDirectory, TrackingService, TrackingServiceError,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Language for the demo output (en or hi).
    #[arg(long, value_parser = crate::infra::parse_language)]
    pub(crate) lang: Option<Language>,
    /// Code typed into the OTP screen.
    #[arg(long, default_value = "123456")]
    pub(crate) otp: String,
    /// Simulated OTP send and verification latency in milliseconds.
    #[arg(long, default_value_t = 300)]
    pub(crate) delay_ms: u64,
}

#[derive(Args, Debug)]
pub(crate) struct TrackArgs {
    /// Complaint identifier to look up.
    pub(crate) complaint_id: String,
    /// Language for status labels (defaults to the saved preference).
    #[arg(long, value_parser = crate::infra::parse_language)]
    pub(crate) lang: Option<Language>,
    /// CSV ledger to seed the directory from, overriding APP_TRACKING_LEDGER.
    #[arg(long)]
    pub(crate) ledger: Option<PathBuf>,
    /// Serve the fixed prototype record instead of a keyed lookup.
    #[arg(long)]
    pub(crate) mock: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { lang, otp, delay_ms } = args;

    let localization = Arc::new(LocalizationStore::load(Arc::new(
        InMemoryPreferenceStore::default(),
    )));
    if let Some(language) = lang {
        localization.set_language(language);
    }
    let language = localization.language();
    let text = |key: LocalizationKey| localization.text_in(language, key);

    let delay = Duration::from_millis(delay_ms);
    let workflow = WorkflowConfig {
        timing: WorkflowTiming {
            dispatch_delay: delay,
            verification_delay: delay,
            ..WorkflowTiming::default()
        },
        ..WorkflowConfig::default()
    };
    let directory = Arc::new(InMemoryComplaintDirectory::default());
    let complaints = ComplaintService::new(directory.clone(), localization.clone(), &workflow);
    let tracking = TrackingService::new(TrackingMode::Directory, directory, localization.clone());

    println!("{} demo ({})", text(LocalizationKey::AppTitle), language.display_name());

    let session = complaints.open();
    session.edit_form(|form| {
        form.subject = "Leak".to_string();
    })?;
    if let SubmitOutcome::Blocked(report) = session.submit()? {
        println!("\nIncomplete form blocked:");
        for error in report.visible_errors() {
            println!("  - {:?}: {}", error.field, text(error.message_key));
        }
        if let Some(field) = report.first_invalid() {
            println!("  focus -> {field:?}");
        }
    }

    session.edit_form(|form| {
        form.department = Some(Department::Water);
        form.description = "Main supply pipe leaking near the vegetable market".to_string();
        form.applicant_name = "Asha Verma".to_string();
        form.type_mobile_number("98765 43210");
        form.location.coordinate = Some(Coordinate {
            latitude: 26.8467,
            longitude: 80.9462,
        });
        form.photo = Some("leak.jpg".to_string());
    })?;
    let progress = session.snapshot().progress;
    println!(
        "\nForm progress: {}% ({})",
        progress.percent,
        text(progress.label_key)
    );

    let complaint_id = match session.submit()? {
        SubmitOutcome::Accepted { complaint_id } => complaint_id,
        SubmitOutcome::Blocked(report) => {
            println!("Form still invalid at {:?}", report.first_invalid());
            return Ok(());
        }
    };
    println!("Reserved complaint id {complaint_id}");

    let snapshot = session.wait_for_phase(WorkflowPhase::OtpPending).await;
    if let Some(otp) = &snapshot.otp {
        println!(
            "{} {} | {} {}s",
            text(LocalizationKey::OtpSentTo),
            otp.masked_mobile,
            text(LocalizationKey::ResendOtpIn),
            otp.resend_in
        );
    }

    session.enter_otp(&otp)?;
    session.verify()?;
    let outcome = wait_for_verdict(&session).await;

    match outcome.phase {
        WorkflowPhase::Succeeded => {
            println!("{}", text(LocalizationKey::ComplaintRegistered));
            let registered = outcome.complaint_id.as_ref().unwrap_or(&complaint_id);
            match tracking.track(registered.as_str()) {
                Ok(record) => render_record(&record, &localization, language),
                Err(err) => println!("  Tracking unavailable: {err}"),
            }
            complaints.acknowledge(session.id())?;
            return Ok(());
        }
        WorkflowPhase::OtpPending => {
            let message = outcome
                .otp
                .as_ref()
                .and_then(|otp| otp.error)
                .map_or("", text);
            println!("OTP not accepted: {message}");
        }
        phase => {
            let message = outcome
                .failure
                .map_or("", |failure| text(failure.message_key()));
            println!("Submission stopped in {phase}: {message}");
        }
    }

    complaints.cancel(session.id())?;
    Ok(())
}

async fn wait_for_verdict(session: &SubmissionSession) -> WorkflowSnapshot {
    let mut receiver = session.subscribe();
    let verdict = match receiver
        .wait_for(|snapshot| snapshot.phase != WorkflowPhase::Verifying)
        .await
    {
        Ok(snapshot) => (*snapshot).clone(),
        Err(_) => session.snapshot(),
    };
    verdict
}

pub(crate) fn run_track(args: TrackArgs) -> Result<(), AppError> {
    let TrackArgs {
        complaint_id,
        lang,
        ledger,
        mock,
    } = args;

    let mut config = AppConfig::load()?;
    if ledger.is_some() {
        config.tracking.ledger_path = ledger;
    }
    if mock {
        config.tracking.mode = TrackingMode::Mock;
    }

    let localization = Arc::new(load_localization(&config.preferences));
    let language = lang.unwrap_or_else(|| localization.language());
    let directory = Arc::new(seed_directory(&config.tracking)?);
    let tracking = TrackingService::new(config.tracking.mode, directory, localization.clone());

    match tracking.track(&complaint_id) {
        Ok(record) => render_record(&record, &localization, language),
        Err(TrackingServiceError::Tracking(err)) => match err.message_key() {
            Some(key) => println!("{}", localization.text_in(language, key)),
            None => println!("Tracking unavailable: {err}"),
        },
        Err(err) => println!("Tracking unavailable: {err}"),
    }
    Ok(())
}

pub(crate) fn show_language() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let localization = load_localization(&config.preferences);
    let active = localization.language();

    println!("Active language: {} ({})", active.display_name(), active.code());
    println!("Supported:");
    for language in Language::supported() {
        let marker = if language == active { "*" } else { " " };
        println!("  {marker} {} {}", language.code(), language.display_name());
    }
    Ok(())
}

pub(crate) fn set_language(code: &str) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let localization = load_localization(&config.preferences);

    match apply_language(&localization, code)? {
        Some(language) => {
            println!(
                "Language set to {} ({})",
                language.display_name(),
                language.code()
            );
            if config.preferences.path.is_none() {
                println!("  APP_PREFERENCES_PATH is unset; the choice lasts for this run only");
            }
        }
        None => {
            let message = parse_language(code).err().unwrap_or_default();
            println!("Language unchanged: {message}");
        }
    }
    Ok(())
}

/// Persists and activates `code`. Unsupported codes come back as `None`; a
/// preference store that cannot be written is an error.
fn apply_language(store: &LocalizationStore, code: &str) -> Result<Option<Language>, AppError> {
    let Some(language) = Language::from_code(code) else {
        return Ok(None);
    };
    store.try_set_language(language)?;
    Ok(Some(language))
}

fn render_record(record: &ComplaintRecord, store: &LocalizationStore, language: Language) {
    let text = |key: LocalizationKey| store.text_in(language, key);
    println!("\n{} {}", text(LocalizationKey::ComplaintId), record.id);
    println!("  {}: {}", text(LocalizationKey::Subject), record.subject);
    println!("  {}: {}", text(LocalizationKey::Department), record.department);
    if !record.location.is_empty() {
        println!("  {}: {}", text(LocalizationKey::Location), record.location);
    }
    println!(
        "  {}: {}",
        text(LocalizationKey::Status),
        text(record.status().label_key())
    );
    for update in record.updates() {
        println!(
            "    - {} {}: {}",
            update.recorded_at.format("%d %b %Y %H:%M"),
            text(update.status.label_key()),
            update.detail
        );
    }
}
