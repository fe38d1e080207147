use super::{Finding, Inspection};
use serde_json::Value;

#[derive(Debug)]
pub struct FieldPresentInspection {
    pointer: String,
}

impl FieldPresentInspection {
    pub fn new<S: Into<String>>(pointer: S) -> Self {
        Self {
            pointer: pointer.into(),
        }
    }
}

impl Inspection for FieldPresentInspection {
    fn inspect(&self, body: &Value) -> Finding {
        let present = body
            .pointer(&self.pointer)
            .map(|value| !value.is_null())
            .unwrap_or(false);

        Finding::new(format!("{} is present", self.pointer), present)
    }
}
