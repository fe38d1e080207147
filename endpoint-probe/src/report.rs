use crate::{
    data::CaseState,
    summary::{RunSummary, Verdict},
    Severity, TestCase, TestOutcome,
};
use serde::Serialize;
use std::io::{self, Write};

/// Receives run events. Reporters only present results, they never affect
/// them.
pub trait Reporter {
    /// Called before the case is dispatched.
    fn case_started(&mut self, _test_case: &TestCase) {}

    fn case_finished(&mut self, outcome: &TestOutcome<'_>);

    fn summary(&mut self, summary: &RunSummary);
}

#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn case_finished(&mut self, _outcome: &TestOutcome<'_>) {}

    fn summary(&mut self, _summary: &RunSummary) {}
}

const RULE: &str =
    "================================================================================";

/// Human readable progress and summary.
///
/// Write failures don't interrupt the run; the first one is kept and can be
/// inspected with `take_error`.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn keep_error(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    fn write_case_started(&mut self, test_case: &TestCase) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "[{}] {}", test_case.severity(), test_case.name())?;
        writeln!(self.out, "  {} {}", test_case.method(), test_case.target())
    }

    fn write_case_finished(&mut self, outcome: &TestOutcome<'_>) -> io::Result<()> {
        let elapsed = outcome.elapsed.as_millis();
        let detail = outcome.error_detail.as_deref().unwrap_or_default();

        match (outcome.state, outcome.http_status) {
            (CaseState::Passed, Some(status)) => {
                writeln!(self.out, "  PASS {} ({} ms)", status, elapsed)?
            }
            (CaseState::FailedStatus, Some(status)) => writeln!(
                self.out,
                "  FAIL expected {}, got {} ({} ms): {}",
                outcome.test_case.expected_status(),
                status,
                elapsed,
                detail
            )?,
            _ => writeln!(self.out, "  ERROR no response ({} ms): {}", elapsed, detail)?,
        }

        for finding in &outcome.findings {
            let marker = if finding.satisfied { "ok" } else { "warn" };
            writeln!(self.out, "    {}: {}", marker, finding.description)?;
        }

        Ok(())
    }

    fn write_summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", RULE)?;
        writeln!(self.out, "RUN SUMMARY")?;
        writeln!(self.out, "{}", RULE)?;

        for severity in Severity::ALL.iter() {
            if summary.tally(*severity).total == 0 {
                continue;
            }

            writeln!(self.out)?;
            writeln!(self.out, "{}:", severity)?;
            for entry in summary.entries_for(*severity) {
                let status = if entry.passed { "PASS" } else { "FAIL" };
                writeln!(self.out, "  {} {}", status, entry.name)?;
            }
        }

        writeln!(self.out)?;
        writeln!(self.out, "RESULTS:")?;
        for severity in Severity::ALL.iter() {
            let tally = summary.tally(*severity);
            if tally.total > 0 {
                writeln!(self.out, "  {}: {}", severity, tally)?;
            }
        }
        let overall = summary.overall();
        writeln!(
            self.out,
            "  TOTAL: {} ({:.1}%)",
            overall,
            overall.pass_rate()
        )?;

        writeln!(self.out)?;
        let verdict = summary.verdict();
        match verdict {
            Verdict::Failed => writeln!(self.out, "{} - NOT READY FOR DEPLOYMENT", verdict)?,
            _ => writeln!(self.out, "{} - READY FOR DEPLOYMENT", verdict)?,
        }

        self.out.flush()
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn case_started(&mut self, test_case: &TestCase) {
        let result = self.write_case_started(test_case);
        self.keep_error(result);
    }

    fn case_finished(&mut self, outcome: &TestOutcome<'_>) {
        let result = self.write_case_finished(outcome);
        self.keep_error(result);
    }

    fn summary(&mut self, summary: &RunSummary) {
        let result = self.write_summary(summary);
        self.keep_error(result);
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    verdict: Verdict,
    exit_code: u8,
    summary: &'a RunSummary,
}

/// Writes nothing while cases run and the whole summary as one JSON document
/// at the end.
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn case_finished(&mut self, _outcome: &TestOutcome<'_>) {}

    fn summary(&mut self, summary: &RunSummary) {
        let report = JsonReport {
            verdict: summary.verdict(),
            exit_code: summary.exit_code(),
            summary,
        };

        let result = serde_json::to_writer_pretty(&mut self.out, &report)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());

        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }
}
