use std::fmt;

use chrono::{Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPLAINT_ID_PREFIX: &str = "JS";

/// Reference number handed to the citizen, `PREFIX-yyyyMMdd-NNNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplaintId(pub String);

impl ComplaintId {
    pub fn compose(prefix: &str, filed_on: NaiveDate, suffix: u16) -> Self {
        Self(format!("{prefix}-{}-{suffix:04}", filed_on.format("%Y%m%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fresh complaint identifiers. A backend-backed implementation
/// would reserve the id server side.
pub trait ComplaintIdGenerator: Send + Sync {
    fn next_id(&self) -> ComplaintId;
}

/// Date-stamped identifier with a random four digit suffix in `1000..=9999`.
#[derive(Debug, Clone)]
pub struct RandomComplaintIdGenerator {
    prefix: String,
}

impl RandomComplaintIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn id_for_date(&self, filed_on: NaiveDate) -> ComplaintId {
        let suffix = rand::thread_rng().gen_range(1000..=9999);
        ComplaintId::compose(&self.prefix, filed_on, suffix)
    }
}

impl Default for RandomComplaintIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLAINT_ID_PREFIX)
    }
}

impl ComplaintIdGenerator for RandomComplaintIdGenerator {
    fn next_id(&self) -> ComplaintId {
        self.id_for_date(Local::now().date_naive())
    }
}
