use crate::cwqi::IndexSet;
use crate::model::Measurement;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Index of one factor in a composite evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CwqiResult {
    pub code: String,
    pub name: String,
    pub value: Measurement,
    /// `None` when the factor was not measured.
    pub index: Option<Decimal>,
}

/// Composite water quality index: the unrounded sum of all present factor
/// indices, with one result per factor of the index set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeIndex {
    pub index_set: IndexSet,
    pub total: Decimal,
    pub results: Vec<CwqiResult>,
}

impl CompositeIndex {
    pub fn measured_count(&self) -> usize {
        self.results.iter().filter(|r| r.index.is_some()).count()
    }

    /// False when no factor of the set was measured; `total` is then zero.
    pub fn has_data(&self) -> bool {
        self.measured_count() > 0
    }
}
