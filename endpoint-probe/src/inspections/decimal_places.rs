use super::{Finding, Inspection};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Number, Value};

lazy_static! {
    static ref FRACTION_REGEX: Regex = Regex::new(
        r"^-?[0-9]+(?:\.(?P<fraction>[0-9]+))?(?:[eE](?P<exponent>[+-]?[0-9]+))?$"
    )
    .unwrap();
}

/// Checks that every number under `pointer`, nested ones included, carries
/// no more than `max_places` decimal places.
#[derive(Debug)]
pub struct DecimalPlacesInspection {
    pointer: String,
    max_places: usize,
}

impl DecimalPlacesInspection {
    pub fn new<S: Into<String>>(pointer: S, max_places: usize) -> Self {
        Self {
            pointer: pointer.into(),
            max_places,
        }
    }

    /// Counts places after the point, exponent notation (`1.5e-7`) included.
    fn decimal_places(number: &Number) -> usize {
        let rendered = number.to_string();
        let captures = match FRACTION_REGEX.captures(&rendered) {
            Some(captures) => captures,
            None => return 0,
        };

        let fraction = captures
            .name("fraction")
            .map_or(0, |fraction| fraction.as_str().len() as i64);
        let exponent = captures
            .name("exponent")
            .and_then(|exponent| exponent.as_str().parse::<i64>().ok())
            .unwrap_or(0);

        (fraction - exponent).max(0) as usize
    }

    fn collect_violations(&self, value: &Value, path: String, violations: &mut Vec<String>) {
        match value {
            Value::Number(number) => {
                if Self::decimal_places(number) > self.max_places {
                    violations.push(format!("{}={}", path, number));
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.collect_violations(item, format!("{}/{}", path, index), violations);
                }
            }
            Value::Object(fields) => {
                for (key, field) in fields {
                    self.collect_violations(field, format!("{}/{}", path, key), violations);
                }
            }
            _ => {}
        }
    }
}

impl Inspection for DecimalPlacesInspection {
    fn inspect(&self, body: &Value) -> Finding {
        let value = match body.pointer(&self.pointer) {
            Some(value) => value,
            None => return Finding::new(format!("{} is missing", self.pointer), false),
        };

        let mut violations = Vec::new();
        self.collect_violations(value, self.pointer.clone(), &mut violations);

        if violations.is_empty() {
            Finding::new(
                format!(
                    "amounts under {} use at most {} decimal places",
                    self.pointer, self.max_places
                ),
                true,
            )
        } else {
            Finding::new(
                format!(
                    "amounts under {} exceed {} decimal places: {}",
                    self.pointer,
                    self.max_places,
                    violations.join(", ")
                ),
                false,
            )
        }
    }
}
