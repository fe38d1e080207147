use super::{Finding, Inspection};
use regex::Regex;
use serde_json::Value;

#[derive(Debug)]
pub struct BodyPatternInspection {
    pattern: Regex,
}

impl BodyPatternInspection {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Inspection for BodyPatternInspection {
    fn inspect(&self, body: &Value) -> Finding {
        // matched against the compact serialization
        let serialized = body.to_string();

        Finding::new(
            format!("body matches /{}/", self.pattern.as_str()),
            self.pattern.is_match(&serialized),
        )
    }
}
