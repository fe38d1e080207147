pub mod catalog;
pub mod error;
pub mod fixtures;

pub use catalog::{catalog, CatalogOptions, PAYMENT_TIMEOUT};
pub use error::Error;

use endpoint_probe::{summarize, Harness, Reporter, RunSummary, TestCase};

/// Runs the cases, hands the summary to the reporter and returns it.
///
/// With a concurrency above one, independent cases overlap.
pub async fn verify(
    harness: &Harness,
    test_cases: &[TestCase],
    reporter: &mut dyn Reporter,
) -> RunSummary {
    let outcomes = if harness.configuration().concurrency() > 1 {
        harness.run_concurrently(test_cases, reporter).await
    } else {
        harness.run(test_cases, reporter).await
    };

    let summary = summarize(&outcomes);
    reporter.summary(&summary);
    summary
}
