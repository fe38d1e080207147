#[cfg(test)]
mod tests {
    use booking_probe::{catalog, fixtures::StayDates, verify, CatalogOptions};
    use endpoint_probe::{
        summarize, CaseState, Harness, HarnessConfiguration, Method, NullReporter, Reporter,
        ResponseBody, RunSummary, Severity, StubResponse, StubRoutes, StubServer, TestCase,
        TestOutcome, Verdict,
    };
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use time::{Date, Month};

    #[derive(Debug, Default)]
    struct RecordingReporter {
        events: Vec<String>,
        summaries: usize,
    }

    impl Reporter for RecordingReporter {
        fn case_started(&mut self, test_case: &TestCase) {
            self.events.push(format!("started {}", test_case.name()));
        }

        fn case_finished(&mut self, outcome: &TestOutcome<'_>) {
            self.events
                .push(format!("finished {} {:?}", outcome.name(), outcome.state));
        }

        fn summary(&mut self, _summary: &RunSummary) {
            self.summaries += 1;
        }
    }

    fn start(routes: StubRoutes) -> (StubServer, Harness) {
        let server = StubServer::start(routes).unwrap();
        let harness = Harness::new(server.base_url()).unwrap();
        (server, harness)
    }

    fn unused_local_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", address)
    }

    #[tokio::test]
    async fn property_list_passes_with_its_json_body() {
        let (_server, harness) = start(StubRoutes::new().route(
            Method::Get,
            "/api/properties",
            StubResponse::json(
                200,
                json!({"properties": [{"id": 84656, "name": "Sunny Alps View"}]}),
            ),
        ));
        let case = TestCase::get("Properties API", "/api/properties").with_severity(Severity::Critical);

        let outcome = harness.execute(&case).await;

        assert!(outcome.passed);
        assert_eq!(outcome.state, CaseState::Passed);
        assert_eq!(outcome.http_status, Some(200));
        assert!(outcome.error_detail.is_none());
        let properties = outcome.json().unwrap()["properties"].as_array().unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0]["name"], "Sunny Alps View");
    }

    #[tokio::test]
    async fn expected_rejection_counts_as_a_pass() {
        let (server, harness) = start(StubRoutes::new().route(
            Method::Post,
            "/api/stripe/webhook",
            StubResponse::json(400, json!({"error": "Missing signature"})),
        ));
        let case = TestCase::post("Webhook", "/api/stripe/webhook", json!({"test": "invalid"}))
            .expect_status(400)
            .with_severity(Severity::Critical);

        let outcome = harness.execute(&case).await;

        assert!(outcome.passed);
        assert!(outcome.error_detail.is_none());
        assert_eq!(outcome.json().unwrap()["error"], "Missing signature");

        let received = server.received_requests().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].method, "POST");
        assert_eq!(
            received[0].headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(received[0].body, r#"{"test":"invalid"}"#);
    }

    #[tokio::test]
    async fn unexpected_status_reports_the_error_field() {
        let (_server, harness) = start(StubRoutes::new().route(
            Method::Post,
            "/api/pricing",
            StubResponse::json(500, json!({"error": "Upstream pricing unavailable"})),
        ));
        let case = TestCase::post("Pricing", "/api/pricing", json!({"propertyIds": ["84656"]}));

        let outcome = harness.execute(&case).await;

        assert!(!outcome.passed);
        assert_eq!(outcome.state, CaseState::FailedStatus);
        assert_eq!(outcome.http_status, Some(500));
        assert_eq!(
            outcome.error_detail.as_deref(),
            Some("Upstream pricing unavailable")
        );
    }

    #[tokio::test]
    async fn unexpected_status_falls_back_to_raw_text() {
        let (_server, harness) = start(StubRoutes::new().route(
            Method::Get,
            "/api/stripe/config",
            StubResponse::text(502, "Bad Gateway"),
        ));
        let case = TestCase::get("Config", "/api/stripe/config");

        let outcome = harness.execute(&case).await;

        assert_eq!(outcome.state, CaseState::FailedStatus);
        assert_eq!(outcome.error_detail.as_deref(), Some("Bad Gateway"));
    }

    #[tokio::test]
    async fn non_json_success_keeps_the_raw_text() {
        let (_server, harness) = start(StubRoutes::new().route(
            Method::Get,
            "/robots.txt",
            StubResponse::text(200, "User-agent: *"),
        ));
        let case = TestCase::get("Robots", "/robots.txt");

        let outcome = harness.execute(&case).await;

        assert!(outcome.passed);
        assert_eq!(
            outcome.response_body,
            Some(ResponseBody::Text("User-agent: *".into()))
        );
    }

    #[tokio::test]
    async fn deployments_under_a_sub_path_keep_their_prefix() {
        let server = StubServer::start(StubRoutes::new().route(
            Method::Get,
            "/staging/api/properties",
            StubResponse::json(200, json!({"properties": []})),
        ))
        .unwrap();
        let harness = Harness::new(format!("{}/staging", server.base_url())).unwrap();
        let case = TestCase::get("Properties API", "/api/properties");

        let outcome = harness.execute(&case).await;

        assert!(outcome.passed);
        assert_eq!(
            server.received_requests().unwrap()[0].uri,
            "/staging/api/properties"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_failure() {
        let harness = Harness::new(unused_local_url()).unwrap();
        let case = TestCase::get("Properties API", "/api/properties").with_severity(Severity::Critical);

        let outcome = harness.execute(&case).await;

        assert!(!outcome.passed);
        assert_eq!(outcome.state, CaseState::FailedNetwork);
        assert!(outcome.http_status.is_none());
        assert!(outcome.response_body.is_none());
        assert!(!outcome.error_detail.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn slow_responses_hit_the_case_timeout() {
        let (_server, harness) = start(StubRoutes::new().route(
            Method::Post,
            "/api/stripe/create-payment-intent",
            StubResponse::json(200, json!({"clientSecret": "pi_secret"}))
                .with_delay(Duration::from_millis(500)),
        ));
        let case = TestCase::post("Payment", "/api/stripe/create-payment-intent", json!({}))
            .with_timeout(Duration::from_millis(100));

        let outcome = harness.execute(&case).await;

        assert_eq!(outcome.state, CaseState::FailedNetwork);
        assert!(outcome.http_status.is_none());
        assert!(outcome.error_detail.is_some());
    }

    #[tokio::test]
    async fn inspections_annotate_without_failing() {
        let (_server, harness) = start(StubRoutes::new().route(
            Method::Get,
            "/api/availability/84656",
            StubResponse::json(
                200,
                json!({"calendar": {"days": []}, "pricing": {"averageRate": 133.333}}),
            ),
        ));
        let case = TestCase::get("Availability", "/api/availability/84656?from=2026-10-29&to=2027-04-17")
            .inspect(|inspections| {
                inspections
                    .array_min_len("/calendar/days", 1)
                    .max_decimal_places("/pricing", 2)
            });

        let outcome = harness.execute(&case).await;

        assert!(outcome.passed);
        assert_eq!(outcome.findings.len(), 2);
        assert!(outcome.findings.iter().all(|finding| !finding.satisfied));
    }

    #[tokio::test]
    async fn every_case_yields_one_outcome_in_order() {
        let (server, harness) = start(
            StubRoutes::new()
                .route(Method::Get, "/a", StubResponse::json(200, json!({})))
                .route(Method::Get, "/b", StubResponse::json(500, json!({"error": "b"}))),
        );
        let cases = vec![
            TestCase::get("a", "/a"),
            TestCase::get("b", "/b"),
            TestCase::get("c", "http://[::1"),
            TestCase::get("d", "/missing"),
        ];
        let mut reporter = RecordingReporter::default();

        let outcomes = harness.run(&cases, &mut reporter).await;

        let states: Vec<(&str, CaseState)> = outcomes
            .iter()
            .map(|outcome| (outcome.name(), outcome.state))
            .collect();
        assert_eq!(
            states,
            vec![
                ("a", CaseState::Passed),
                ("b", CaseState::FailedStatus),
                ("c", CaseState::FailedNetwork),
                ("d", CaseState::FailedStatus),
            ]
        );
        assert_eq!(
            reporter.events,
            vec![
                "started a",
                "finished a Passed",
                "started b",
                "finished b FailedStatus",
                "started c",
                "finished c FailedNetwork",
                "started d",
                "finished d FailedStatus",
            ]
        );
        assert_eq!(server.received_requests().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn concurrent_runs_keep_input_order() {
        let server = StubServer::start(
            StubRoutes::new()
                .route(
                    Method::Get,
                    "/slow",
                    StubResponse::json(200, json!({})).with_delay(Duration::from_millis(200)),
                )
                .route(Method::Get, "/fast", StubResponse::json(200, json!({})))
                .route(Method::Post, "/api/bookings", StubResponse::json(200, json!({}))),
        )
        .unwrap();
        let mut configuration = HarnessConfiguration::new(server.base_url()).unwrap();
        configuration.set_concurrency(4);
        let harness = Harness::with_configuration(configuration);
        let cases = vec![
            TestCase::get("slow", "/slow"),
            TestCase::get("fast", "/fast"),
            TestCase::post("booking", "/api/bookings", json!({})).ordered(),
            TestCase::get("after", "/fast"),
        ];

        let outcomes = harness.run_concurrently(&cases, &mut NullReporter).await;

        let names: Vec<&str> = outcomes.iter().map(TestOutcome::name).collect();
        assert_eq!(names, vec!["slow", "fast", "booking", "after"]);
        assert!(outcomes.iter().all(|outcome| outcome.passed));

        let received = server.received_requests().unwrap();
        let booking_index = received
            .iter()
            .position(|request| request.uri == "/api/bookings")
            .unwrap();
        assert_eq!(booking_index, 2);
    }

    fn booking_options() -> CatalogOptions {
        CatalogOptions::new(StayDates::starting_from(
            Date::from_calendar_date(2026, Month::October, 19).unwrap(),
        ))
    }

    fn booking_site(webhook_status: u16) -> StubRoutes {
        let mut routes = StubRoutes::new()
            .route(
                Method::Get,
                "/api/properties",
                StubResponse::json(
                    200,
                    json!({"properties": [{"id": 84656}, {"id": 174947}, {"id": 186289}]}),
                ),
            )
            .route(
                Method::Get,
                "/api/properties/999999",
                StubResponse::json(404, json!({"error": "Property not found"})),
            )
            .route(
                Method::Get,
                "/api/availability/84656",
                StubResponse::json(
                    200,
                    json!({
                        "calendar": {"days": [{"date": "2026-10-29", "minimum_length_of_stay": 2}]},
                        "pricing": {"averageRate": 266.0, "total": 435.0, "available": true}
                    }),
                ),
            )
            .route(
                Method::Get,
                "/api/availability/84656?from=invalid&to=invalid",
                StubResponse::json(400, json!({"error": "Invalid date format"})),
            )
            .route(
                Method::Post,
                "/api/pricing",
                StubResponse::json(
                    200,
                    json!({"results": [{"propertyId": "84656", "pricing": {"total": 451.53}}]}),
                ),
            )
            .route(
                Method::Post,
                "/api/stripe/create-payment-intent",
                StubResponse::json(
                    200,
                    json!({
                        "clientSecret": "pi_1_secret_2",
                        "paymentIntentId": "pi_1",
                        "bookingId": "b-1",
                        "pricing": {"grandTotal": 451.53, "taxes": [{"name": "Tourist tax", "amount": 16.53}]}
                    }),
                ),
            )
            .route(
                Method::Post,
                "/api/stripe/webhook",
                StubResponse::json(webhook_status, json!({"error": "Missing signature"})),
            )
            .route(
                Method::Get,
                "/api/stripe/config",
                StubResponse::json(200, json!({"publishableKey": "pk_test_abc"})),
            )
            .route(
                Method::Post,
                "/api/bookings",
                StubResponse::json(400, json!({"error": "Invalid booking"})),
            )
            .route(
                Method::Get,
                "/api/test-email",
                StubResponse::json(
                    200,
                    json!({
                        "success": true,
                        "results": {
                            "simpleAlert": {"messageId": "m-1"},
                            "bookingFailureAlert": {"messageId": "m-2"}
                        }
                    }),
                ),
            );

        for form in &[
            "/api/forms/contact",
            "/api/forms/cleaning-services",
            "/api/forms/rental-services",
            "/api/forms/jobs",
        ] {
            routes = routes.route(
                Method::Post,
                *form,
                StubResponse::json(200, json!({"success": true, "id": "sub-1"})),
            );
        }

        for property_id in &[84656, 174947, 186289] {
            routes = routes.route(
                Method::Get,
                format!("/api/properties/{}", property_id),
                StubResponse::json(
                    200,
                    json!({"property": {"name": "Chalet", "maximum_capacity": 6}}),
                ),
            );
        }

        routes
    }

    #[tokio::test]
    async fn booking_catalog_is_acceptable_when_only_lower_tiers_fail() {
        let (_server, harness) = start(booking_site(400));
        let test_cases = catalog(&booking_options()).unwrap();
        let mut reporter = RecordingReporter::default();

        let summary = verify(&harness, &test_cases, &mut reporter).await;

        assert_eq!(reporter.summaries, 1);
        assert_eq!(summary.tally(Severity::Critical).passed, 8);
        assert_eq!(summary.tally(Severity::Critical).total, 8);
        // the stub can't tell a bad payment request or form from a good one
        assert_eq!(summary.tally(Severity::High).passed, 4);
        assert_eq!(summary.tally(Severity::High).total, 6);
        assert_eq!(summary.tally(Severity::Medium).passed, 5);
        assert_eq!(summary.tally(Severity::Medium).total, 9);
        assert_eq!(summary.verdict(), Verdict::Acceptable);
        assert_eq!(summary.exit_code(), 0);

        let unsatisfied: Vec<_> = summary
            .entries_for(Severity::Critical)
            .flat_map(|entry| entry.findings.iter())
            .filter(|finding| !finding.satisfied)
            .collect();
        assert!(unsatisfied.is_empty(), "{:?}", unsatisfied);
    }

    #[tokio::test]
    async fn accepted_unsigned_webhook_fails_the_run() {
        let (_server, harness) = start(booking_site(200));
        let test_cases = catalog(&booking_options()).unwrap();

        let summary = verify(&harness, &test_cases, &mut NullReporter).await;

        assert_eq!(summary.tally(Severity::Critical).failed(), 1);
        assert_eq!(summary.verdict(), Verdict::Failed);
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn summarizing_a_run_twice_is_stable() {
        let harness = Harness::new(unused_local_url()).unwrap();
        let cases = vec![
            TestCase::get("Properties", "/api/properties").with_severity(Severity::Critical),
            TestCase::get("Config", "/api/stripe/config"),
        ];

        let outcomes = harness.run(&cases, &mut NullReporter).await;

        assert_eq!(outcomes.len(), cases.len());
        assert_eq!(summarize(&outcomes), summarize(&outcomes));
        assert_eq!(summarize(&outcomes).verdict(), Verdict::Failed);
    }
}
