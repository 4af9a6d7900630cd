use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Every user-facing string the portal renders.
///
/// The string form (`LocalizationKey::SendOtp` is `"send_otp"`) is what thin
/// clients pass to [`super::LocalizationStore::localized`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocalizationKey {
    // App chrome
    AppTitle,
    Welcome,
    AppDescription,
    Login,
    RegisterComplaint,
    TrackComplaint,
    HelpSupport,
    SelectLanguage,
    Ok,
    Cancel,
    Back,
    Retry,
    Submit,
    Submitting,
    Success,
    SuccessTitle,
    Error,

    // OTP
    MobileNumber,
    MobilePlaceholder,
    SendOtp,
    SendingOtp,
    EnterOtp,
    OtpPlaceholder,
    OtpSentTo,
    ResendOtp,
    ResendOtpIn,
    Verify,
    Verifying,
    InvalidOtp,
    OtpLocked,
    OtpDispatchFailed,
    RegistrationFailed,

    // Form progress
    GettingStarted,
    JustStarted,
    MakingProgress,
    GettingThere,
    AlmostDone,
    ReadyToSubmit,

    // Validation messages
    PleaseSelectDepartment,
    PleaseEnterSubject,
    PleaseProvideDescription,
    PleaseEnterName,
    PleaseValidMobile,
    PleaseValidEmail,
    PleaseSelectLocation,
    PleaseSelectDistrict,

    // Complaint form
    RequestType,
    Complaint,
    Demand,
    ComplaintType,
    Subject,
    Description,
    ApplicantName,
    Gender,
    Male,
    Female,
    Other,
    PreferNotToSay,
    Email,
    Location,
    SelectOnMap,
    EnterManually,
    District,
    UploadDocuments,
    DepartmentWater,
    DepartmentElectricity,
    DepartmentRoads,
    DepartmentSanitation,
    DepartmentPublicServices,
    DepartmentNotSure,
    ComplaintRegistered,
    ComplaintId,

    // Tracking
    TrackYourComplaint,
    EnterComplaintId,
    ComplaintIdRequired,
    ComplaintNotFound,
    ComplaintDetails,
    Department,
    DateFiled,
    Status,
    StatusUpdates,
    StatusRegistered,
    StatusAssignedToDepartment,
    StatusUnderReview,
    StatusInProgress,
    StatusResolved,

    // Dashboard
    Total,
    Pending,
    Resolved,
    AllComplaints,
    PendingComplaints,
    ResolvedComplaints,

    // Feedback and escalation
    ProvideFeedback,
    VeryDissatisfied,
    Dissatisfied,
    Neutral,
    Satisfied,
    VerySatisfied,
    InvalidRating,
    FeedbackSubmitted,
    EscalationReasonRequired,
    EscalationSubmitted,
}

impl LocalizationKey {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
