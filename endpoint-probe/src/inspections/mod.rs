mod array_length;
mod body_pattern;
mod decimal_places;
mod field_present;

use array_length::ArrayLengthInspection;
use body_pattern::BodyPatternInspection;
use decimal_places::DecimalPlacesInspection;
use field_present::FieldPresentInspection;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::{fmt::Debug, sync::Arc};

/// A response-shape check run against the JSON body of a passed case.
///
/// Inspections are advisory: their findings are reported next to the outcome
/// but never change whether the case passed.
pub trait Inspection: Debug {
    fn inspect(&self, body: &Value) -> Finding;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub description: String,
    pub satisfied: bool,
}

impl Finding {
    pub fn new<S: Into<String>>(description: S, satisfied: bool) -> Self {
        Self {
            description: description.into(),
            satisfied,
        }
    }
}

pub struct InspectionsBuilder {
    inspections: Vec<Arc<dyn Inspection + Send + Sync>>,
}

impl InspectionsBuilder {
    pub(crate) fn new() -> Self {
        Self {
            inspections: Vec::new(),
        }
    }

    /// `pointer` is an RFC 6901 JSON pointer such as `/property/name`.
    pub fn field_present<S: Into<String>>(&mut self, pointer: S) -> &mut Self {
        self.add_inspection(FieldPresentInspection::new(pointer))
    }

    pub fn array_min_len<S: Into<String>>(&mut self, pointer: S, min_len: usize) -> &mut Self {
        self.add_inspection(ArrayLengthInspection::new(pointer, min_len))
    }

    pub fn body_matches(&mut self, pattern: Regex) -> &mut Self {
        self.add_inspection(BodyPatternInspection::new(pattern))
    }

    pub fn max_decimal_places<S: Into<String>>(
        &mut self,
        pointer: S,
        max_places: usize,
    ) -> &mut Self {
        self.add_inspection(DecimalPlacesInspection::new(pointer, max_places))
    }

    pub fn add_inspection<I: Inspection + Send + Sync + 'static>(
        &mut self,
        inspection: I,
    ) -> &mut Self {
        self.inspections.push(Arc::new(inspection));
        self
    }

    pub fn into_inspections(self) -> Vec<Arc<dyn Inspection + Send + Sync>> {
        self.inspections
    }
}

impl Default for InspectionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
