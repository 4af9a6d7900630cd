use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::domain::{FormField, FormState, LocationMethod, MOBILE_NUMBER_LENGTH};
use crate::localization::LocalizationKey;

pub const OTP_LENGTH: usize = 6;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@]+@[^@]+\.[A-Za-z]{2,}$").expect("email pattern is a valid regex")
    })
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

pub fn is_valid_mobile_number(value: &str) -> bool {
    value.len() == MOBILE_NUMBER_LENGTH && value.chars().all(|c| c.is_ascii_digit())
}

pub fn is_well_formed_otp(value: &str) -> bool {
    value.len() == OTP_LENGTH && value.chars().all(|c| c.is_ascii_digit())
}

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

fn has_choice(value: Option<&str>) -> bool {
    value.is_some_and(has_text)
}

/// Validity of a single field, independent of whether errors are shown yet.
pub fn is_field_valid(form: &FormState, field: FormField) -> bool {
    match field {
        FormField::Department => form.department.is_some(),
        FormField::Subject => has_text(&form.subject),
        FormField::Description => has_text(&form.description),
        FormField::ApplicantName => has_text(&form.applicant_name),
        FormField::MobileNumber => is_valid_mobile_number(form.mobile_number()),
        FormField::Email => form.email.is_empty() || is_valid_email(&form.email),
        FormField::Location => match form.location.method {
            LocationMethod::Map => form
                .location
                .coordinate
                .is_some_and(|coordinate| coordinate.is_on_earth()),
            LocationMethod::Manual => has_choice(form.location.area.district.as_deref()),
        },
    }
}

/// Message shown next to an invalid field.
pub fn error_key(form: &FormState, field: FormField) -> LocalizationKey {
    match field {
        FormField::Department => LocalizationKey::PleaseSelectDepartment,
        FormField::Subject => LocalizationKey::PleaseEnterSubject,
        FormField::Description => LocalizationKey::PleaseProvideDescription,
        FormField::ApplicantName => LocalizationKey::PleaseEnterName,
        FormField::MobileNumber => LocalizationKey::PleaseValidMobile,
        FormField::Email => LocalizationKey::PleaseValidEmail,
        FormField::Location => match form.location.method {
            LocationMethod::Map => LocalizationKey::PleaseSelectLocation,
            LocationMethod::Manual => LocalizationKey::PleaseSelectDistrict,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message_key: LocalizationKey,
}

/// Whole-form validation result.
///
/// `armed` reflects whether a submit has been attempted; until then no error
/// is visible even though `invalid` is always computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub armed: bool,
    invalid: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    pub fn first_invalid(&self) -> Option<FormField> {
        self.invalid.first().map(|error| error.field)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.invalid.iter().map(|error| error.field)
    }

    pub fn is_field_valid(&self, field: FormField) -> bool {
        self.invalid.iter().all(|error| error.field != field)
    }

    pub fn shows_error(&self, field: FormField) -> bool {
        self.armed && !self.is_field_valid(field)
    }

    pub fn visible_errors(&self) -> &[FieldError] {
        if self.armed {
            &self.invalid
        } else {
            &[]
        }
    }
}

pub fn validate(form: &FormState, armed: bool) -> ValidationReport {
    let invalid = FormField::priority_order()
        .into_iter()
        .filter(|field| !is_field_valid(form, *field))
        .map(|field| FieldError {
            field,
            message_key: error_key(form, field),
        })
        .collect();

    ValidationReport { armed, invalid }
}

const PROGRESS_STEPS: u8 = 5;

/// Completion indicator shown above the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormProgress {
    pub completed_steps: u8,
    pub total_steps: u8,
    pub percent: u8,
    pub label_key: LocalizationKey,
}

impl FormProgress {
    pub fn of(form: &FormState) -> Self {
        let steps = [
            is_field_valid(form, FormField::Department),
            is_field_valid(form, FormField::Subject)
                && is_field_valid(form, FormField::Description),
            is_field_valid(form, FormField::ApplicantName)
                && is_field_valid(form, FormField::MobileNumber),
            is_field_valid(form, FormField::Location),
            form.has_attachments(),
        ];
        let completed_steps = steps.iter().filter(|done| **done).count() as u8;
        let percent = (u16::from(completed_steps) * 100 / u16::from(PROGRESS_STEPS)) as u8;

        Self {
            completed_steps,
            total_steps: PROGRESS_STEPS,
            percent,
            label_key: progress_label(percent),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_steps == self.total_steps
    }
}

fn progress_label(percent: u8) -> LocalizationKey {
    match percent {
        0 => LocalizationKey::GettingStarted,
        1..=24 => LocalizationKey::JustStarted,
        25..=49 => LocalizationKey::MakingProgress,
        50..=74 => LocalizationKey::GettingThere,
        75..=99 => LocalizationKey::AlmostDone,
        _ => LocalizationKey::ReadyToSubmit,
    }
}
