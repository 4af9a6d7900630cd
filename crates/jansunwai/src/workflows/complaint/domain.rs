use serde::{Deserialize, Deserializer, Serialize};

use crate::localization::LocalizationKey;

pub const MOBILE_NUMBER_LENGTH: usize = 10;

/// Whether the citizen is reporting a problem or asking for something new.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    Complaint,
    Demand,
}

impl RequestType {
    pub const fn label_key(self) -> LocalizationKey {
        match self {
            Self::Complaint => LocalizationKey::Complaint,
            Self::Demand => LocalizationKey::Demand,
        }
    }
}

/// Department the complaint is routed to. An unselected department is modelled
/// as `None` on [`FormState`], never as a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Water,
    Electricity,
    Roads,
    Sanitation,
    PublicServices,
    NotSure,
}

impl Department {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Water,
            Self::Electricity,
            Self::Roads,
            Self::Sanitation,
            Self::PublicServices,
            Self::NotSure,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Electricity => "Electricity",
            Self::Roads => "Roads",
            Self::Sanitation => "Sanitation",
            Self::PublicServices => "Public Services",
            Self::NotSure => "Not Sure...",
        }
    }

    pub const fn label_key(self) -> LocalizationKey {
        match self {
            Self::Water => LocalizationKey::DepartmentWater,
            Self::Electricity => LocalizationKey::DepartmentElectricity,
            Self::Roads => LocalizationKey::DepartmentRoads,
            Self::Sanitation => LocalizationKey::DepartmentSanitation,
            Self::PublicServices => LocalizationKey::DepartmentPublicServices,
            Self::NotSure => LocalizationKey::DepartmentNotSure,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const fn label_key(self) -> LocalizationKey {
        match self {
            Self::Male => LocalizationKey::Male,
            Self::Female => LocalizationKey::Female,
            Self::Other => LocalizationKey::Other,
            Self::PreferNotToSay => LocalizationKey::PreferNotToSay,
        }
    }
}

/// How the complaint location is captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMethod {
    #[default]
    Map,
    Manual,
}

/// Point returned by the map picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn is_on_earth(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Administrative hierarchy used when the location is entered by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrativeArea {
    pub district: Option<String>,
    pub tehsil: Option<String>,
    pub thana: Option<String>,
    pub block: Option<String>,
    pub village_panchayat: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSelection {
    pub method: LocationMethod,
    pub coordinate: Option<Coordinate>,
    pub area: AdministrativeArea,
}

/// Form fields that carry validation rules, in the order the first invalid
/// one is focused after a blocked submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Department,
    Subject,
    Description,
    ApplicantName,
    MobileNumber,
    Email,
    Location,
}

impl FormField {
    pub const fn priority_order() -> [Self; 7] {
        [
            Self::Department,
            Self::Subject,
            Self::Description,
            Self::ApplicantName,
            Self::MobileNumber,
            Self::Email,
            Self::Location,
        ]
    }

    pub const fn label_key(self) -> LocalizationKey {
        match self {
            Self::Department => LocalizationKey::ComplaintType,
            Self::Subject => LocalizationKey::Subject,
            Self::Description => LocalizationKey::Description,
            Self::ApplicantName => LocalizationKey::ApplicantName,
            Self::MobileNumber => LocalizationKey::MobileNumber,
            Self::Email => LocalizationKey::Email,
            Self::Location => LocalizationKey::Location,
        }
    }
}

/// Everything the citizen has typed or picked so far.
///
/// The mobile number is only reachable through setters that drop non-digits
/// and cap the length, so the stored value is always at most ten ASCII digits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub request_type: RequestType,
    pub department: Option<Department>,
    pub subject: String,
    pub description: String,
    pub applicant_name: String,
    pub gender: Gender,
    mobile_number: String,
    pub email: String,
    pub location: LocationSelection,
    pub documents: Vec<String>,
    pub photo: Option<String>,
}

impl FormState {
    pub fn mobile_number(&self) -> &str {
        &self.mobile_number
    }

    /// Replaces the mobile number with the filtered form of `raw` (a paste).
    pub fn set_mobile_number(&mut self, raw: &str) {
        self.mobile_number = filter_mobile_input(raw);
    }

    /// Appends typed input to the current mobile number.
    pub fn type_mobile_number(&mut self, typed: &str) {
        let mut combined = std::mem::take(&mut self.mobile_number);
        combined.push_str(typed);
        self.mobile_number = filter_mobile_input(&combined);
    }

    pub fn has_attachments(&self) -> bool {
        !self.documents.is_empty() || self.photo.is_some()
    }
}

/// Partial form edit sent by a renderer. Absent fields are left untouched;
/// an explicit `null` clears the optional selections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormPatch {
    pub request_type: Option<RequestType>,
    #[serde(deserialize_with = "present")]
    pub department: Option<Option<Department>>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub applicant_name: Option<String>,
    pub gender: Option<Gender>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub location: Option<LocationSelection>,
    pub documents: Option<Vec<String>>,
    #[serde(deserialize_with = "present")]
    pub photo: Option<Option<String>>,
}

/// Marks a field that appeared in the payload, `null` included.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl FormPatch {
    pub fn apply(self, form: &mut FormState) {
        if let Some(request_type) = self.request_type {
            form.request_type = request_type;
        }
        if let Some(department) = self.department {
            form.department = department;
        }
        if let Some(subject) = self.subject {
            form.subject = subject;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(applicant_name) = self.applicant_name {
            form.applicant_name = applicant_name;
        }
        if let Some(gender) = self.gender {
            form.gender = gender;
        }
        if let Some(mobile_number) = self.mobile_number {
            form.set_mobile_number(&mobile_number);
        }
        if let Some(email) = self.email {
            form.email = email.trim().to_string();
        }
        if let Some(location) = self.location {
            form.location = location;
        }
        if let Some(documents) = self.documents {
            form.documents = documents;
        }
        if let Some(photo) = self.photo {
            form.photo = photo;
        }
    }
}

/// Drops every non-digit and keeps at most the first ten digits.
pub fn filter_mobile_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(MOBILE_NUMBER_LENGTH)
        .collect()
}

/// Sample administrative data offered by the manual location pickers.
#[derive(Debug, Clone)]
pub struct AdministrativeCatalogue {
    districts: Vec<&'static str>,
    tehsils: Vec<&'static str>,
    thanas: Vec<&'static str>,
    blocks: Vec<&'static str>,
    villages: Vec<&'static str>,
}

/// Level of the administrative hierarchy a picker searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdministrativeLevel {
    District,
    Tehsil,
    Thana,
    Block,
    VillagePanchayat,
}

impl AdministrativeCatalogue {
    pub fn standard() -> Self {
        Self {
            districts: vec![
                "Delhi",
                "Mumbai",
                "Kolkata",
                "Chennai",
                "Bengaluru",
                "Hyderabad",
                "Pune",
                "Ahmedabad",
            ],
            tehsils: vec!["Tehsil 1", "Tehsil 2", "Tehsil 3", "Tehsil 4", "Tehsil 5"],
            thanas: vec!["Thana 1", "Thana 2", "Thana 3", "Thana 4", "Thana 5"],
            blocks: vec!["Block 1", "Block 2", "Block 3", "Block 4", "Block 5"],
            villages: vec![
                "Village 1",
                "Village 2",
                "Village 3",
                "Village 4",
                "Village 5",
            ],
        }
    }

    pub fn entries(&self, level: AdministrativeLevel) -> &[&'static str] {
        match level {
            AdministrativeLevel::District => &self.districts,
            AdministrativeLevel::Tehsil => &self.tehsils,
            AdministrativeLevel::Thana => &self.thanas,
            AdministrativeLevel::Block => &self.blocks,
            AdministrativeLevel::VillagePanchayat => &self.villages,
        }
    }

    /// Case-insensitive substring search. A blank query lists everything.
    pub fn search(&self, level: AdministrativeLevel, query: &str) -> Vec<&'static str> {
        let needle = query.trim().to_lowercase();
        self.entries(level)
            .iter()
            .copied()
            .filter(|entry| needle.is_empty() || entry.to_lowercase().contains(&needle))
            .collect()
    }
}
