pub mod classify;
pub mod cwqi;
pub mod error;
pub mod model;
pub mod rounding;
pub mod standard;
pub mod validators;

use classify::outcome::OverallClassification;
use cwqi::{CompositeIndex, IndexSet};
use error::WaterQualityError;
use model::{FactorReading, WaterBody};
use serde::{Deserialize, Serialize};
use standard::schema::OptInFactor;
use standard::StandardTable;

/// Options for aggregate evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Selects the lake thresholds for total phosphorus.
    pub water_body: WaterBody,
    /// Count total nitrogen towards the overall class (reference-only otherwise).
    pub include_total_nitrogen: bool,
    /// Count fecal coliform towards the overall class (reference-only otherwise).
    pub include_fecal_coliform: bool,
    /// Factor set for the composite index.
    pub index_set: IndexSet,
}

impl EvaluationOptions {
    pub fn includes(&self, factor: OptInFactor) -> bool {
        match factor {
            OptInFactor::TotalNitrogen => self.include_total_nitrogen,
            OptInFactor::FecalColiform => self.include_fecal_coliform,
        }
    }
}

/// Overall class and composite index of one sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub overall: OverallClassification,
    pub cwqi: CompositeIndex,
}

/// Main API entry point: classify a sample and compute its composite index.
///
/// The overall class is taken over every classifiable reading; the composite
/// index only sees readings whose factor belongs to `options.index_set`.
pub fn assess(
    readings: &[FactorReading],
    standard: &StandardTable,
    options: &EvaluationOptions,
) -> Result<Assessment, WaterQualityError> {
    let overall = classify::assess_overall(standard, readings, options)?;

    let indexed: Vec<FactorReading> = readings
        .iter()
        .filter(|r| standard.index_set_contains(options.index_set, &r.code))
        .cloned()
        .collect();
    let cwqi = cwqi::composite_index(standard, options.index_set, &indexed, options.water_body)?;

    tracing::debug!(
        "Assessed {} readings: {} (CWQI {})",
        readings.len(),
        overall.overall_class.label(),
        cwqi.total
    );

    Ok(Assessment { overall, cwqi })
}
