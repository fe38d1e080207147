use crate::{
    error::Error,
    fixtures::{
        pricing_request, unsigned_webhook_event, BookingRequest, BookingScenario, FormKind,
        StayDates, DEFAULT_PROPERTY_IDS,
    },
};
use endpoint_probe::{Severity, TestCase};
use regex::Regex;
use std::time::Duration;

/// Payment intent creation talks to the payment provider and the database,
/// so it gets more time than the other calls.
pub const PAYMENT_TIMEOUT: Duration = Duration::from_secs(60);

const LIVE_BOOKING_NOTE: &str =
    "Test booking from automated API testing - Please cancel if created";

#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// The first id is the one used for availability, pricing and payments.
    pub property_ids: Vec<u64>,
    pub dates: StayDates,
    pub payment_timeout: Duration,
    /// Adds a call that creates a real booking upstream.
    pub include_live_booking: bool,
}

impl CatalogOptions {
    pub fn new(dates: StayDates) -> Self {
        Self {
            property_ids: DEFAULT_PROPERTY_IDS.to_vec(),
            dates,
            payment_timeout: PAYMENT_TIMEOUT,
            include_live_booking: false,
        }
    }
}

/// Every check the booking application is verified with, critical ones
/// first.
pub fn catalog(options: &CatalogOptions) -> Result<Vec<TestCase>, Error> {
    let primary = *options.property_ids.first().ok_or(Error::NoProperties)?;

    let mut test_cases = critical_checks(options, primary)?;
    test_cases.extend(high_priority_checks(options, primary)?);
    test_cases.extend(form_checks());
    test_cases.push(notification_check());

    Ok(test_cases)
}

fn critical_checks(options: &CatalogOptions, primary: u64) -> Result<Vec<TestCase>, Error> {
    let dates = &options.dates;
    let mut property_patterns = Vec::with_capacity(options.property_ids.len());
    for property_id in &options.property_ids {
        property_patterns.push(Regex::new(&format!(r#""id":"?{}\b"#, property_id))?);
    }

    let expected_count = options.property_ids.len();
    let mut test_cases = vec![TestCase::get("Properties API - List all properties", "/api/properties")
        .with_severity(Severity::Critical)
        .inspect(move |inspections| {
            inspections.array_min_len("/properties", expected_count);
            for pattern in property_patterns {
                inspections.body_matches(pattern);
            }
            inspections
        })];

    for property_id in &options.property_ids {
        test_cases.push(
            TestCase::get(
                format!("Single Property API - Property {}", property_id),
                format!("/api/properties/{}", property_id),
            )
            .with_severity(Severity::Critical)
            .inspect(|inspections| {
                inspections
                    .field_present("/property/name")
                    .field_present("/property/maximum_capacity")
            }),
        );
    }

    test_cases.push(
        TestCase::get(
            format!("Availability API - Property {} (6-month calendar)", primary),
            format!(
                "/api/availability/{}?from={}&to={}",
                primary, dates.check_in, dates.calendar_end
            ),
        )
        .with_severity(Severity::Critical)
        .inspect(|inspections| {
            inspections
                .array_min_len("/calendar/days", 1)
                .field_present("/calendar/days/0/minimum_length_of_stay")
                .max_decimal_places("/pricing", 2)
        }),
    );

    test_cases.push(
        TestCase::post(
            "Pricing Calculator API - Decimal precision",
            "/api/pricing",
            pricing_request(&[primary], dates),
        )
        .with_severity(Severity::Critical)
        .inspect(|inspections| {
            inspections
                .array_min_len("/results", 1)
                .max_decimal_places("/results", 2)
        }),
    );

    test_cases.push(
        TestCase::post(
            "Stripe Payment Intent API - Create booking payment",
            "/api/stripe/create-payment-intent",
            BookingRequest::for_scenario(BookingScenario::Valid, primary, dates).to_json()?,
        )
        .with_severity(Severity::Critical)
        .with_timeout(options.payment_timeout)
        .inspect(|inspections| {
            inspections
                .field_present("/clientSecret")
                .field_present("/paymentIntentId")
                .field_present("/bookingId")
                .max_decimal_places("/pricing", 2)
        }),
    );

    test_cases.push(
        TestCase::post(
            "Stripe Webhook Handler - Security validation",
            "/api/stripe/webhook",
            unsigned_webhook_event(),
        )
        .expect_status(400)
        .with_severity(Severity::Critical)
        .inspect(|inspections| inspections.field_present("/error")),
    );

    if options.include_live_booking {
        test_cases.push(
            TestCase::post(
                "Booking API - Create live booking",
                "/api/bookings",
                BookingRequest::for_scenario(BookingScenario::Valid, primary, dates)
                    .with_notes(LIVE_BOOKING_NOTE)
                    .to_json()?,
            )
            .with_severity(Severity::Critical)
            .with_timeout(options.payment_timeout)
            .ordered()
            .inspect(|inspections| {
                inspections
                    .field_present("/bookingId")
                    .field_present("/paymentUrl")
            }),
        );
    }

    Ok(test_cases)
}

fn high_priority_checks(options: &CatalogOptions, primary: u64) -> Result<Vec<TestCase>, Error> {
    let dates = &options.dates;
    let publishable_key = Regex::new(r#""publishableKey":"pk_(test|live)_"#)?;

    Ok(vec![
        TestCase::get("Stripe Config API - Get publishable key", "/api/stripe/config")
            .with_severity(Severity::High)
            .inspect(move |inspections| {
                inspections
                    .field_present("/publishableKey")
                    .body_matches(publishable_key)
            }),
        TestCase::get("Error Test - Invalid Property ID", "/api/properties/999999")
            .expect_status(404)
            .with_severity(Severity::High),
        TestCase::get(
            "Error Test - Invalid Date Format",
            format!("/api/availability/{}?from=invalid&to=invalid", primary),
        )
        .expect_status(400)
        .with_severity(Severity::High),
        TestCase::post(
            "Error Test - Missing Required Parameters",
            "/api/stripe/create-payment-intent",
            BookingRequest::for_scenario(BookingScenario::MissingFields, primary, dates)
                .to_json()?,
        )
        .expect_status(400)
        .with_severity(Severity::High),
        TestCase::post(
            "Error Test - Guest Count Exceeding Capacity",
            "/api/stripe/create-payment-intent",
            BookingRequest::for_scenario(BookingScenario::OverCapacity, primary, dates)
                .to_json()?,
        )
        .expect_status(400)
        .with_severity(Severity::High)
        .with_timeout(options.payment_timeout),
        TestCase::post(
            "Error Test - Booking API invalid values",
            "/api/bookings",
            BookingRequest::for_scenario(BookingScenario::InvalidValues, primary, dates)
                .to_json()?,
        )
        .expect_status(400)
        .with_severity(Severity::High),
    ])
}

fn form_checks() -> Vec<TestCase> {
    let mut test_cases = Vec::with_capacity(FormKind::ALL.len() * 2);

    for form in FormKind::ALL.iter() {
        test_cases.push(
            TestCase::post(form.label(), form.path(), form.complete_submission())
                .with_severity(Severity::Medium)
                .inspect(|inspections| inspections.field_present("/success")),
        );
        test_cases.push(
            TestCase::post(
                format!("{} - Validation", form.label()),
                form.path(),
                form.incomplete_submission(),
            )
            .expect_status(400)
            .with_severity(Severity::Medium)
            .inspect(|inspections| inspections.field_present("/error")),
        );
    }

    test_cases
}

/// Sends the test alerts. Mail delivery never blocks a release.
fn notification_check() -> TestCase {
    TestCase::get("Email Alert System - Test notifications", "/api/test-email")
        .with_severity(Severity::Medium)
        .inspect(|inspections| {
            inspections
                .field_present("/success")
                .field_present("/results/simpleAlert")
                .field_present("/results/bookingFailureAlert")
        })
}
