use crate::{
    error::Error, http_client::HttpClient, report::Reporter, HarnessConfiguration, RequestData,
    ResponseBody, TestCase, TestOutcome,
};
use futures::stream::{self, StreamExt};
use std::{collections::HashMap, sync::Arc, time::Instant};

/// Executes test cases against one deployment and turns every result,
/// transport failures included, into a `TestOutcome`.
#[derive(Debug, Clone)]
pub struct Harness {
    configuration: HarnessConfiguration,
    http_client: Arc<dyn HttpClient + Send + Sync>,
}

impl Harness {
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Error> {
        Ok(Self::with_configuration(HarnessConfiguration::new(base_url)?))
    }

    pub fn with_configuration(configuration: HarnessConfiguration) -> Self {
        let http_client = configuration.http_client();

        Self {
            configuration,
            http_client,
        }
    }

    pub fn configuration(&self) -> &HarnessConfiguration {
        &self.configuration
    }

    pub async fn execute<'a>(&self, test_case: &'a TestCase) -> TestOutcome<'a> {
        let started = Instant::now();

        let request_data = match self.request_data(test_case) {
            Ok(request_data) => request_data,
            Err(e) => return TestOutcome::network_failure(test_case, e.to_string(), started.elapsed()),
        };

        let timeout = test_case
            .timeout()
            .unwrap_or_else(|| self.configuration.default_timeout());

        // the client gets the timeout too, this only bounds clients that ignore it
        let response =
            match tokio::time::timeout(timeout, self.http_client.send(&request_data, timeout)).await
            {
                Ok(response) => response,
                Err(_) => Err(Error::Timeout(timeout)),
            };

        match response {
            Ok(response_data) => {
                if response_data.status_code == test_case.expected_status() {
                    TestOutcome::success(
                        test_case,
                        response_data.status_code,
                        ResponseBody::parse(response_data.body),
                        started.elapsed(),
                    )
                } else {
                    TestOutcome::status_mismatch(
                        test_case,
                        response_data.status_code,
                        response_data.body,
                        started.elapsed(),
                    )
                }
            }
            Err(e) => TestOutcome::network_failure(test_case, e.to_string(), started.elapsed()),
        }
    }

    /// Runs the cases one after another, in order.
    pub async fn run<'a>(
        &self,
        test_cases: &'a [TestCase],
        reporter: &mut dyn Reporter,
    ) -> Vec<TestOutcome<'a>> {
        let mut outcomes = Vec::with_capacity(test_cases.len());

        for test_case in test_cases {
            reporter.case_started(test_case);
            let outcome = self.execute(test_case).await;
            reporter.case_finished(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Runs independent cases with up to `concurrency` requests in flight.
    ///
    /// An ordered case waits for every case before it and runs on its own.
    /// Outcomes come back in input order either way.
    pub async fn run_concurrently<'a>(
        &self,
        test_cases: &'a [TestCase],
        reporter: &mut dyn Reporter,
    ) -> Vec<TestOutcome<'a>> {
        let limit = self.configuration.concurrency();
        let mut outcomes = Vec::with_capacity(test_cases.len());

        for batch in batches(test_cases) {
            for test_case in batch {
                reporter.case_started(test_case);
            }

            let mut in_flight = stream::iter(batch)
                .map(|test_case| self.execute(test_case))
                .buffered(limit);

            while let Some(outcome) = in_flight.next().await {
                reporter.case_finished(&outcome);
                outcomes.push(outcome);
            }
        }

        outcomes
    }

    fn request_data(&self, test_case: &TestCase) -> Result<RequestData, Error> {
        let url = self.configuration.resolve(test_case.target())?;
        let mut headers = HashMap::new();
        headers.insert(String::from("accept"), String::from("application/json"));

        let body = match test_case.request_body() {
            Some(body) => {
                headers.insert(
                    String::from("content-type"),
                    String::from("application/json"),
                );
                serde_json::to_string(body)?
            }
            None => String::new(),
        };

        Ok(RequestData {
            uri: url.into(),
            method: test_case.method().as_str().into(),
            headers,
            body,
        })
    }
}

/// Splits the cases into runs of independent cases, with every ordered case
/// in a batch of its own.
fn batches(test_cases: &[TestCase]) -> Vec<&[TestCase]> {
    let mut batches = Vec::new();
    let mut start = 0;

    for (index, test_case) in test_cases.iter().enumerate() {
        if test_case.is_ordered() {
            if start < index {
                batches.push(&test_cases[start..index]);
            }
            batches.push(&test_cases[index..=index]);
            start = index + 1;
        }
    }

    if start < test_cases.len() {
        batches.push(&test_cases[start..]);
    }

    batches
}
