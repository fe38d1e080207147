mod data;
mod error;
mod harness;
mod harness_configuration;
mod http_client;
pub mod inspections;
pub mod report;
pub mod stub_server;
pub mod summary;
mod util;

pub use data::{
    CaseState, Method, RequestData, ResponseBody, ResponseData, Severity, TestCase, TestOutcome,
};
pub use error::Error;
pub use harness::Harness;
pub use harness_configuration::{HarnessConfiguration, DEFAULT_TIMEOUT};
pub use http_client::{HttpClient, ReqwestHttpClient};
pub use report::{ConsoleReporter, JsonReporter, NullReporter, Reporter};
pub use stub_server::{StubResponse, StubRoutes, StubServer};
pub use summary::{summarize, RunSummary, Tally, Verdict};
