use crate::inspections::{Finding, Inspection, InspectionsBuilder};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{collections::HashMap, fmt::Display, sync::Arc, time::Duration};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much a failing check matters for the overall verdict.
///
/// Variants are declared in reporting order, so `Critical < High < Medium`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::High, Severity::Medium];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single declared HTTP probe.
///
/// Cases are built once with the consuming setters below and then only read.
/// The `target` is either an absolute URL or a path the harness joins onto
/// its base URL.
#[derive(Debug, Clone)]
pub struct TestCase {
    name: String,
    method: Method,
    target: String,
    request_body: Option<Value>,
    expected_status: u16,
    severity: Severity,
    timeout: Option<Duration>,
    ordered: bool,
    inspections: Vec<Arc<dyn Inspection + Send + Sync>>,
}

impl TestCase {
    pub fn get<S1: Into<String>, S2: Into<String>>(name: S1, target: S2) -> Self {
        Self::new(name, Method::Get, target, None)
    }

    pub fn post<S1: Into<String>, S2: Into<String>>(name: S1, target: S2, body: Value) -> Self {
        Self::new(name, Method::Post, target, Some(body))
    }

    /// GET cases never carry a body and POST cases always do; a POST
    /// without one sends an empty JSON object.
    pub fn new<S1: Into<String>, S2: Into<String>>(
        name: S1,
        method: Method,
        target: S2,
        request_body: Option<Value>,
    ) -> Self {
        let request_body = match method {
            Method::Get => None,
            Method::Post => Some(request_body.unwrap_or_else(|| Value::Object(Map::new()))),
        };

        Self {
            name: name.into(),
            method,
            target: target.into(),
            request_body,
            expected_status: 200,
            severity: Severity::High,
            timeout: None,
            ordered: false,
            inspections: Vec::new(),
        }
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Overrides the harness default timeout for this case only.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Marks the case as depending on side effects of the cases before it.
    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    pub fn inspect<F: FnOnce(&mut InspectionsBuilder) -> &mut InspectionsBuilder>(
        mut self,
        func: F,
    ) -> Self {
        let mut inspections = InspectionsBuilder::new();
        let _ = func(&mut inspections);
        self.inspections.extend(inspections.into_inspections());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn request_body(&self) -> Option<&Value> {
        self.request_body.as_ref()
    }

    pub fn expected_status(&self) -> u16 {
        self.expected_status
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn inspections(&self) -> &[Arc<dyn Inspection + Send + Sync>] {
        &self.inspections
    }
}

/// Lifecycle of a case within a run. Only the last three are terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseState {
    Pending,
    InFlight,
    Passed,
    FailedStatus,
    FailedNetwork,
}

impl CaseState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CaseState::Passed | CaseState::FailedStatus | CaseState::FailedNetwork
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parses the body as JSON, keeping the raw text when it isn't.
    pub fn parse<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }

    /// The `error` field of a JSON object, with non-string values rendered
    /// as JSON.
    pub fn error_field(&self) -> Option<String> {
        match self.as_json()?.get("error")? {
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// The recorded result of executing one `TestCase`.
#[derive(Debug, Clone)]
pub struct TestOutcome<'a> {
    pub test_case: &'a TestCase,
    pub state: CaseState,
    pub passed: bool,
    pub http_status: Option<u16>,
    pub response_body: Option<ResponseBody>,
    pub error_detail: Option<String>,
    pub elapsed: Duration,
    pub findings: Vec<Finding>,
}

impl<'a> TestOutcome<'a> {
    pub(crate) fn success(
        test_case: &'a TestCase,
        http_status: u16,
        response_body: ResponseBody,
        elapsed: Duration,
    ) -> Self {
        let findings = match response_body.as_json() {
            Some(json) => test_case
                .inspections()
                .iter()
                .map(|inspection| inspection.inspect(json))
                .collect(),
            None => Vec::new(),
        };

        Self {
            test_case,
            state: CaseState::Passed,
            passed: true,
            http_status: Some(http_status),
            response_body: Some(response_body),
            error_detail: None,
            elapsed,
            findings,
        }
    }

    /// The detail is the body's `error` field, or the raw body as received
    /// when there is none.
    pub(crate) fn status_mismatch(
        test_case: &'a TestCase,
        http_status: u16,
        raw_body: String,
        elapsed: Duration,
    ) -> Self {
        let raw_message = raw_body.trim().to_string();
        let response_body = ResponseBody::parse(raw_body);
        let message = response_body.error_field().unwrap_or(raw_message);
        let error_detail = if message.is_empty() {
            format!(
                "Expected status {}, got {}",
                test_case.expected_status(),
                http_status
            )
        } else {
            message
        };

        Self {
            test_case,
            state: CaseState::FailedStatus,
            passed: false,
            http_status: Some(http_status),
            response_body: Some(response_body),
            error_detail: Some(error_detail),
            elapsed,
            findings: Vec::new(),
        }
    }

    pub(crate) fn network_failure<S: Into<String>>(
        test_case: &'a TestCase,
        error_detail: S,
        elapsed: Duration,
    ) -> Self {
        Self {
            test_case,
            state: CaseState::FailedNetwork,
            passed: false,
            http_status: None,
            response_body: None,
            error_detail: Some(error_detail.into()),
            elapsed,
            findings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.test_case.name()
    }

    pub fn severity(&self) -> Severity {
        self.test_case.severity()
    }

    pub fn json(&self) -> Option<&Value> {
        self.response_body.as_ref().and_then(ResponseBody::as_json)
    }
}

#[derive(Debug, Clone)]
pub struct RequestData {
    pub uri: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}
