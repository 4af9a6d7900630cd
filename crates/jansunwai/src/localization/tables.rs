use super::keys::LocalizationKey;
use super::language::Language;

pub(crate) fn lookup(language: Language, key: LocalizationKey) -> &'static str {
    match language {
        Language::English => english(key),
        Language::Hindi => hindi(key),
    }
}

fn english(key: LocalizationKey) -> &'static str {
    use LocalizationKey::*;

    match key {
        AppTitle => "JanSunwai",
        Welcome => "Welcome to JanSunwai",
        AppDescription => {
            "A platform to register and track your complaints and grievances with government departments"
        }
        Login => "Login",
        RegisterComplaint => "Register New Complaint (without Login)",
        TrackComplaint => "Track Complaint (Complaint ID)",
        HelpSupport => "Help & Support",
        SelectLanguage => "Select Language",
        Ok => "OK",
        Cancel => "Cancel",
        Back => "Back",
        Retry => "Try Again",
        Submit => "Submit",
        Submitting => "Submitting...",
        Success => "Success",
        SuccessTitle => "Complaint Submitted",
        Error => "Error",

        MobileNumber => "Mobile Number",
        MobilePlaceholder => "10-digit mobile number",
        SendOtp => "Send OTP",
        SendingOtp => "Sending OTP...",
        EnterOtp => "Enter OTP",
        OtpPlaceholder => "6-digit OTP",
        OtpSentTo => "OTP sent to",
        ResendOtp => "Resend OTP",
        ResendOtpIn => "Resend OTP in",
        Verify => "Verify",
        Verifying => "Verifying...",
        InvalidOtp => "Invalid OTP. Please enter the 6-digit code you received.",
        OtpLocked => "Too many incorrect attempts. Please request a new OTP.",
        OtpDispatchFailed => "We could not send the OTP. Please try again.",
        RegistrationFailed => "We could not register your complaint. Please try again.",

        GettingStarted => "Getting started",
        JustStarted => "Just started",
        MakingProgress => "Making progress",
        GettingThere => "Getting there",
        AlmostDone => "Almost done",
        ReadyToSubmit => "Ready to submit!",

        PleaseSelectDepartment => "Please select a department",
        PleaseEnterSubject => "Please enter a subject",
        PleaseProvideDescription => "Please provide a description",
        PleaseEnterName => "Please enter your name",
        PleaseValidMobile => "Please enter a valid 10-digit mobile number",
        PleaseValidEmail => "Please enter a valid email address",
        PleaseSelectLocation => "Please select a location on the map",
        PleaseSelectDistrict => "Please select a district",

        RequestType => "Request Type",
        Complaint => "Complaint",
        Demand => "Demand",
        ComplaintType => "Complaint Type",
        Subject => "Subject",
        Description => "Description",
        ApplicantName => "Applicant Name",
        Gender => "Gender",
        Male => "Male",
        Female => "Female",
        Other => "Other",
        PreferNotToSay => "Prefer not to say",
        Email => "Email",
        Location => "Location",
        SelectOnMap => "Select on Map",
        EnterManually => "Enter Manually",
        District => "District",
        UploadDocuments => "Upload Documents",
        DepartmentWater => "Water",
        DepartmentElectricity => "Electricity",
        DepartmentRoads => "Roads",
        DepartmentSanitation => "Sanitation",
        DepartmentPublicServices => "Public Services",
        DepartmentNotSure => "Not Sure...",
        ComplaintRegistered => "Your complaint has been registered successfully",
        ComplaintId => "Complaint ID",

        TrackYourComplaint => "Track Your Complaint",
        EnterComplaintId => "Enter your complaint ID (e.g., JS-20230501-1234)",
        ComplaintIdRequired => "Please enter a complaint ID",
        ComplaintNotFound => {
            "No complaint was found with this ID. Please check the ID from your SMS or email."
        }
        ComplaintDetails => "Complaint Details",
        Department => "Department",
        DateFiled => "Date Filed",
        Status => "Status",
        StatusUpdates => "Status Updates",
        StatusRegistered => "Complaint Registered",
        StatusAssignedToDepartment => "Assigned to Department",
        StatusUnderReview => "Under Review",
        StatusInProgress => "In Progress",
        StatusResolved => "Resolved",

        Total => "Total",
        Pending => "Pending",
        Resolved => "Resolved",
        AllComplaints => "All Complaints",
        PendingComplaints => "Pending Complaints",
        ResolvedComplaints => "Resolved Complaints",

        ProvideFeedback => "Provide Feedback",
        VeryDissatisfied => "Very Dissatisfied",
        Dissatisfied => "Dissatisfied",
        Neutral => "Neutral",
        Satisfied => "Satisfied",
        VerySatisfied => "Very Satisfied",
        InvalidRating => "Please choose a rating between 1 and 5",
        FeedbackSubmitted => "Thank you! Your feedback has been submitted.",
        EscalationReasonRequired => "Please describe why you want to escalate",
        EscalationSubmitted => "Your escalation request has been submitted.",
    }
}

fn hindi(key: LocalizationKey) -> &'static str {
    use LocalizationKey::*;

    match key {
        AppTitle => "जनसुनवाई",
        Welcome => "जनसुनवाई में आपका स्वागत है",
        AppDescription => {
            "सरकारी विभागों में अपनी शिकायतें दर्ज करने और उनकी स्थिति जानने का मंच"
        }
        Login => "लॉगिन",
        RegisterComplaint => "नई शिकायत दर्ज करें (बिना लॉगिन)",
        TrackComplaint => "शिकायत ट्रैक करें (शिकायत आईडी)",
        HelpSupport => "सहायता और समर्थन",
        SelectLanguage => "भाषा चुनें",
        Ok => "ठीक है",
        Cancel => "रद्द करें",
        Back => "वापस",
        Retry => "पुनः प्रयास करें",
        Submit => "जमा करें",
        Submitting => "जमा हो रहा है...",
        Success => "सफल",
        SuccessTitle => "शिकायत जमा हो गई",
        Error => "त्रुटि",

        MobileNumber => "मोबाइल नंबर",
        MobilePlaceholder => "10 अंकों का मोबाइल नंबर",
        SendOtp => "ओटीपी भेजें",
        SendingOtp => "ओटीपी भेजा जा रहा है...",
        EnterOtp => "ओटीपी दर्ज करें",
        OtpPlaceholder => "6 अंकों का ओटीपी",
        OtpSentTo => "ओटीपी भेजा गया",
        ResendOtp => "ओटीपी दोबारा भेजें",
        ResendOtpIn => "ओटीपी दोबारा भेजें इतने समय में",
        Verify => "सत्यापित करें",
        Verifying => "सत्यापन हो रहा है...",
        InvalidOtp => "अमान्य ओटीपी। कृपया प्राप्त 6 अंकों का कोड दर्ज करें।",
        OtpLocked => "बहुत अधिक गलत प्रयास। कृपया नया ओटीपी मंगाएं।",
        OtpDispatchFailed => "ओटीपी नहीं भेजा जा सका। कृपया पुनः प्रयास करें।",
        RegistrationFailed => "आपकी शिकायत दर्ज नहीं हो सकी। कृपया पुनः प्रयास करें।",

        GettingStarted => "शुरुआत",
        JustStarted => "अभी शुरू किया",
        MakingProgress => "प्रगति हो रही है",
        GettingThere => "लगभग पहुंच गए",
        AlmostDone => "लगभग पूरा",
        ReadyToSubmit => "जमा करने के लिए तैयार!",

        PleaseSelectDepartment => "कृपया एक विभाग चुनें",
        PleaseEnterSubject => "कृपया विषय दर्ज करें",
        PleaseProvideDescription => "कृपया विवरण दें",
        PleaseEnterName => "कृपया अपना नाम दर्ज करें",
        PleaseValidMobile => "कृपया मान्य 10 अंकों का मोबाइल नंबर दर्ज करें",
        PleaseValidEmail => "कृपया मान्य ईमेल पता दर्ज करें",
        PleaseSelectLocation => "कृपया मानचित्र पर स्थान चुनें",
        PleaseSelectDistrict => "कृपया जिला चुनें",

        RequestType => "अनुरोध का प्रकार",
        Complaint => "शिकायत",
        Demand => "मांग",
        ComplaintType => "शिकायत का प्रकार",
        Subject => "विषय",
        Description => "विवरण",
        ApplicantName => "आवेदक का नाम",
        Gender => "लिंग",
        Male => "पुरुष",
        Female => "महिला",
        Other => "अन्य",
        PreferNotToSay => "बताना नहीं चाहते",
        Email => "ईमेल",
        Location => "स्थान",
        SelectOnMap => "मानचित्र पर चुनें",
        EnterManually => "स्वयं दर्ज करें",
        District => "जिला",
        UploadDocuments => "दस्तावेज़ अपलोड करें",
        DepartmentWater => "जल",
        DepartmentElectricity => "बिजली",
        DepartmentRoads => "सड़कें",
        DepartmentSanitation => "स्वच्छता",
        DepartmentPublicServices => "सार्वजनिक सेवाएं",
        DepartmentNotSure => "पता नहीं...",
        ComplaintRegistered => "आपकी शिकायत सफलतापूर्वक दर्ज हो गई है",
        ComplaintId => "शिकायत आईडी",

        TrackYourComplaint => "अपनी शिकायत ट्रैक करें",
        EnterComplaintId => "अपनी शिकायत आईडी दर्ज करें (जैसे, JS-20230501-1234)",
        ComplaintIdRequired => "कृपया शिकायत आईडी दर्ज करें",
        ComplaintNotFound => {
            "इस आईडी से कोई शिकायत नहीं मिली। कृपया एसएमएस या ईमेल में मिली आईडी जांचें।"
        }
        ComplaintDetails => "शिकायत का विवरण",
        Department => "विभाग",
        DateFiled => "दर्ज करने की तिथि",
        Status => "स्थिति",
        StatusUpdates => "स्थिति अपडेट",
        StatusRegistered => "शिकायत दर्ज",
        StatusAssignedToDepartment => "विभाग को सौंपा गया",
        StatusUnderReview => "समीक्षाधीन",
        StatusInProgress => "कार्य प्रगति पर",
        StatusResolved => "समाधान हो गया",

        Total => "कुल",
        Pending => "लंबित",
        Resolved => "हल किया गया",
        AllComplaints => "सभी शिकायतें",
        PendingComplaints => "लंबित शिकायतें",
        ResolvedComplaints => "हल की गई शिकायतें",

        ProvideFeedback => "प्रतिक्रिया दें",
        VeryDissatisfied => "बहुत असंतुष्ट",
        Dissatisfied => "असंतुष्ट",
        Neutral => "सामान्य",
        Satisfied => "संतुष्ट",
        VerySatisfied => "बहुत संतुष्ट",
        InvalidRating => "कृपया 1 से 5 के बीच रेटिंग चुनें",
        FeedbackSubmitted => "धन्यवाद! आपकी प्रतिक्रिया जमा हो गई है।",
        EscalationReasonRequired => "कृपया बताएं कि आप मामला आगे क्यों बढ़ाना चाहते हैं",
        EscalationSubmitted => "आपका एस्केलेशन अनुरोध जमा हो गया है।",
    }
}
