use super::{Finding, Inspection};
use serde_json::Value;

#[derive(Debug)]
pub struct ArrayLengthInspection {
    pointer: String,
    min_len: usize,
}

impl ArrayLengthInspection {
    pub fn new<S: Into<String>>(pointer: S, min_len: usize) -> Self {
        Self {
            pointer: pointer.into(),
            min_len,
        }
    }
}

impl Inspection for ArrayLengthInspection {
    fn inspect(&self, body: &Value) -> Finding {
        match body.pointer(&self.pointer).and_then(Value::as_array) {
            Some(items) => Finding::new(
                format!(
                    "{} has {} item(s), expected at least {}",
                    self.pointer,
                    items.len(),
                    self.min_len
                ),
                items.len() >= self.min_len,
            ),
            None => Finding::new(format!("{} is not an array", self.pointer), false),
        }
    }
}
