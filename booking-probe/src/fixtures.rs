use serde::Serialize;
use serde_json::{json, Value};
use time::{Date, Duration, OffsetDateTime};

pub const DEFAULT_PROPERTY_IDS: [u64; 3] = [84656, 174947, 186289];

/// Stay dates relative to a given day: a one night stay ten days out and a
/// six month availability window starting at check-in.
///
/// `Date` displays as `YYYY-MM-DD`, the format the booking endpoints take.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StayDates {
    pub check_in: Date,
    pub check_out: Date,
    pub calendar_end: Date,
}

impl StayDates {
    pub fn starting_from(today: Date) -> Self {
        Self {
            check_in: today + Duration::days(10),
            check_out: today + Duration::days(11),
            calendar_end: today + Duration::days(180),
        }
    }

    pub fn from_today() -> Self {
        Self::starting_from(OffsetDateTime::now_utc().date())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BookingScenario {
    Valid,
    /// More adults than any of the properties sleeps.
    OverCapacity,
    /// An empty request.
    MissingFields,
    /// Unparseable identifiers and dates, everything else absent.
    InvalidValues,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adults: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaning_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing_consent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BookingRequest {
    pub fn for_scenario(scenario: BookingScenario, property_id: u64, dates: &StayDates) -> Self {
        match scenario {
            BookingScenario::Valid => Self {
                property_id: Some(property_id.to_string()),
                check_in: Some(dates.check_in.to_string()),
                check_out: Some(dates.check_out.to_string()),
                adults: Some(2),
                children: Some(0),
                infants: Some(0),
                guest_name: Some("Emma Schmidt".into()),
                guest_email: Some("emma.schmidt@example.com".into()),
                guest_phone: Some("+41 79 123 4567".into()),
                accommodation_total: Some(266.0),
                cleaning_fee: Some(169.0),
                marketing_consent: Some(false),
                notes: None,
            },
            BookingScenario::OverCapacity => Self {
                adults: Some(10),
                accommodation_total: None,
                cleaning_fee: None,
                marketing_consent: None,
                ..Self::for_scenario(BookingScenario::Valid, property_id, dates)
            },
            BookingScenario::MissingFields => Self::default(),
            BookingScenario::InvalidValues => Self {
                property_id: Some("invalid-id".into()),
                check_in: Some("invalid-date".into()),
                ..Self::default()
            },
        }
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

pub fn pricing_request(property_ids: &[u64], dates: &StayDates) -> Value {
    let property_ids: Vec<String> = property_ids.iter().map(u64::to_string).collect();

    json!({
        "propertyIds": property_ids,
        "from": dates.check_in.to_string(),
        "to": dates.check_out.to_string(),
    })
}

/// A webhook call without a payment provider signature.
pub fn unsigned_webhook_event() -> Value {
    json!({ "test": "invalid" })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormKind {
    Contact,
    CleaningServices,
    RentalServices,
    Jobs,
}

impl FormKind {
    pub const ALL: [FormKind; 4] = [
        FormKind::Contact,
        FormKind::CleaningServices,
        FormKind::RentalServices,
        FormKind::Jobs,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            FormKind::Contact => "/api/forms/contact",
            FormKind::CleaningServices => "/api/forms/cleaning-services",
            FormKind::RentalServices => "/api/forms/rental-services",
            FormKind::Jobs => "/api/forms/jobs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormKind::Contact => "Contact Form API",
            FormKind::CleaningServices => "Cleaning Services API",
            FormKind::RentalServices => "Rental Services API",
            FormKind::Jobs => "Jobs Application API",
        }
    }

    /// A submission carrying every field the form requires.
    pub fn complete_submission(&self) -> Value {
        match self {
            FormKind::Contact => json!({
                "name": "Sarah Johnson",
                "email": "sarah.johnson@example.com",
                "phone": "+41 79 987 6543",
                "inquiryType": "guest",
                "subject": "Booking Inquiry",
                "message": "I'm interested in booking property 84656.",
            }),
            FormKind::CleaningServices => json!({
                "name": "Michael Weber",
                "email": "michael.weber@example.com",
                "phone": "+41 79 555 1234",
                "serviceType": "deep-cleaning",
                "propertyAddress": "Grächen, Wallis",
                "message": "Need deep cleaning service.",
            }),
            FormKind::RentalServices => json!({
                "name": "Anna Müller",
                "email": "anna.mueller@example.com",
                "phone": "+41 79 444 5678",
                "propertyAddress": "Grächen, Wallis",
                "propertyType": "apartment",
                "bedrooms": "3",
                "message": "Looking for rental management services.",
            }),
            FormKind::Jobs => json!({
                "name": "David Thompson",
                "email": "david.thompson@example.com",
                "phone": "+41 79 333 9876",
                "position": "Guest Services Coordinator",
                "location": "Remote",
                "resume": "Experienced hospitality professional...",
                "coverLetter": "I am excited to apply...",
            }),
        }
    }

    /// A submission the form has to reject for missing required fields.
    pub fn incomplete_submission(&self) -> Value {
        match self {
            FormKind::Contact => json!({
                "inquiryType": "guest",
                "name": "John Doe",
            }),
            FormKind::CleaningServices => json!({
                "name": "Test User",
                "email": "test@example.com",
            }),
            FormKind::RentalServices | FormKind::Jobs => json!({
                "name": "Test User",
                "email": "test@example.com",
                "phone": "+41791234567",
            }),
        }
    }
}
