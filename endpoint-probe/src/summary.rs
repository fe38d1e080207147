use crate::{data::CaseState, inspections::Finding, Severity, TestOutcome};
use serde::Serialize;
use std::{collections::BTreeMap, fmt::Display};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub total: usize,
}

impl Tally {
    fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    /// True for an empty tally as well.
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.passed as f64 * 100.0 / self.total as f64
        }
    }
}

impl Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} passed", self.passed, self.total)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Every case passed.
    Ready,
    /// Every critical case passed, something less important did not.
    Acceptable,
    /// At least one critical case failed.
    Failed,
}

impl Verdict {
    pub fn is_acceptable(&self) -> bool {
        *self != Verdict::Failed
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Verdict::Ready | Verdict::Acceptable => 0,
            Verdict::Failed => 1,
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Ready => write!(f, "ALL SYSTEMS OPERATIONAL"),
            Verdict::Acceptable => write!(f, "CRITICAL SYSTEMS OPERATIONAL"),
            Verdict::Failed => write!(f, "CRITICAL FAILURES DETECTED"),
        }
    }
}

/// What a summary keeps of one outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub name: String,
    pub severity: Severity,
    pub state: CaseState,
    pub passed: bool,
    pub http_status: Option<u16>,
    pub error_detail: Option<String>,
    pub elapsed_ms: u64,
    pub findings: Vec<Finding>,
}

impl SummaryEntry {
    fn from_outcome(outcome: &TestOutcome<'_>) -> Self {
        Self {
            name: outcome.name().into(),
            severity: outcome.severity(),
            state: outcome.state,
            passed: outcome.passed,
            http_status: outcome.http_status,
            error_detail: outcome.error_detail.clone(),
            elapsed_ms: outcome.elapsed.as_millis() as u64,
            findings: outcome.findings.clone(),
        }
    }
}

/// Pass/fail counts per severity tier and overall, plus the outcomes they
/// were computed from, in the order they were recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    entries: Vec<SummaryEntry>,
    tiers: BTreeMap<Severity, Tally>,
    overall: Tally,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            tiers: Severity::ALL
                .iter()
                .map(|severity| (*severity, Tally::default()))
                .collect(),
            overall: Tally::default(),
        }
    }

    pub fn record(&mut self, outcome: &TestOutcome<'_>) {
        self.tiers
            .entry(outcome.severity())
            .or_default()
            .record(outcome.passed);
        self.overall.record(outcome.passed);
        self.entries.push(SummaryEntry::from_outcome(outcome));
    }

    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    pub fn entries_for(&self, severity: Severity) -> impl Iterator<Item = &SummaryEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.severity == severity)
    }

    pub fn tally(&self, severity: Severity) -> Tally {
        self.tiers.get(&severity).copied().unwrap_or_default()
    }

    pub fn overall(&self) -> Tally {
        self.overall
    }

    /// Failed critical cases fail the run; nothing else does.
    pub fn verdict(&self) -> Verdict {
        if !self.tally(Severity::Critical).all_passed() {
            Verdict::Failed
        } else if self.overall.all_passed() {
            Verdict::Ready
        } else {
            Verdict::Acceptable
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.verdict().exit_code()
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

pub fn summarize(outcomes: &[TestOutcome<'_>]) -> RunSummary {
    let mut summary = RunSummary::new();
    for outcome in outcomes {
        summary.record(outcome);
    }
    summary
}
