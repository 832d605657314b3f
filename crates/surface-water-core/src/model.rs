use crate::error::WaterQualityError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Water quality class, from Ⅰ (best) to 劣Ⅴ (worse than class Ⅴ).
///
/// The derived ordering follows the class number, so the worst of a set of
/// classes is simply its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QualityClass {
    Class1 = 1,
    Class2 = 2,
    Class3 = 3,
    Class4 = 4,
    Class5 = 5,
    Class6 = 6,
}

impl QualityClass {
    /// The five classes that have a threshold boundary, best first.
    pub const BOUNDED: [QualityClass; 5] = [
        QualityClass::Class1,
        QualityClass::Class2,
        QualityClass::Class3,
        QualityClass::Class4,
        QualityClass::Class5,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Result<QualityClass, WaterQualityError> {
        match n {
            1 => Ok(QualityClass::Class1),
            2 => Ok(QualityClass::Class2),
            3 => Ok(QualityClass::Class3),
            4 => Ok(QualityClass::Class4),
            5 => Ok(QualityClass::Class5),
            6 => Ok(QualityClass::Class6),
            _ => Err(WaterQualityError::InvalidArgument(format!(
                "{n} is not a water quality class (expected 1-6)"
            ))),
        }
    }

    /// Report label, e.g. "Ⅲ类" or "劣Ⅴ类".
    pub fn label(self) -> String {
        format!("{self}类")
    }
}

impl fmt::Display for QualityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityClass::Class1 => write!(f, "Ⅰ"),
            QualityClass::Class2 => write!(f, "Ⅱ"),
            QualityClass::Class3 => write!(f, "Ⅲ"),
            QualityClass::Class4 => write!(f, "Ⅳ"),
            QualityClass::Class5 => write!(f, "Ⅴ"),
            QualityClass::Class6 => write!(f, "劣Ⅴ"),
        }
    }
}

impl TryFrom<u8> for QualityClass {
    type Error = WaterQualityError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        QualityClass::from_number(n)
    }
}

impl From<QualityClass> for u8 {
    fn from(class: QualityClass) -> u8 {
        class.number()
    }
}

/// Water body type. Only total phosphorus has distinct lake limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterBody {
    #[default]
    River,
    Lake,
}

impl WaterBody {
    pub fn from_is_lake(is_lake: bool) -> WaterBody {
        if is_lake {
            WaterBody::Lake
        } else {
            WaterBody::River
        }
    }

    pub fn is_lake(self) -> bool {
        self == WaterBody::Lake
    }
}

impl fmt::Display for WaterBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterBody::River => write!(f, "river"),
            WaterBody::Lake => write!(f, "lake"),
        }
    }
}

/// A factor value as supplied by the caller: measured, or explicitly not measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Measured(Decimal),
    NotMeasured,
}

impl Measurement {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Measurement::Measured(v) => Some(*v),
            Measurement::NotMeasured => None,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Measurement::Measured(_))
    }
}

impl From<Option<Decimal>> for Measurement {
    fn from(value: Option<Decimal>) -> Self {
        match value {
            Some(v) => Measurement::Measured(v),
            None => Measurement::NotMeasured,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Measured(v) => write!(f, "{v}"),
            Measurement::NotMeasured => write!(f, "n/a"),
        }
    }
}

/// One factor's value for a single evaluation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorReading {
    pub code: String,
    pub value: Measurement,
}

impl FactorReading {
    pub fn measured(code: impl Into<String>, value: Decimal) -> FactorReading {
        FactorReading {
            code: code.into(),
            value: Measurement::Measured(value),
        }
    }

    pub fn not_measured(code: impl Into<String>) -> FactorReading {
        FactorReading {
            code: code.into(),
            value: Measurement::NotMeasured,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    Physical,
    Biological,
    Metal,
    Inorganic,
    Oil,
    Phenol,
    Other,
}

impl fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorCategory::Physical => write!(f, "物理和综合指标"),
            FactorCategory::Biological => write!(f, "生物指标"),
            FactorCategory::Metal => write!(f, "金属及金属化合物"),
            FactorCategory::Inorganic => write!(f, "无机污染物"),
            FactorCategory::Oil => write!(f, "油类"),
            FactorCategory::Phenol => write!(f, "酚"),
            FactorCategory::Other => write!(f, "其他指标"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mg/L")]
    #[default]
    MgPerL,
    #[serde(rename = "dimensionless")]
    Dimensionless,
    #[serde(rename = "count/L")]
    CountPerL,
    #[serde(rename = "celsius")]
    Celsius,
    #[serde(rename = "uS/cm")]
    MicroSiemensPerCm,
    #[serde(rename = "NTU")]
    Ntu,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::MgPerL => write!(f, "mg/L"),
            Unit::Dimensionless => write!(f, "无量纲"),
            Unit::CountPerL => write!(f, "个/L"),
            Unit::Celsius => write!(f, "℃"),
            Unit::MicroSiemensPerCm => write!(f, "μS/cm"),
            Unit::Ntu => write!(f, "NTU"),
        }
    }
}

/// Reporting decimal places for a factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    /// Raw and hourly data.
    #[serde(default)]
    pub hourly: u32,
    /// Values used for assessment and ranking.
    #[serde(default)]
    pub assessment: u32,
}

/// Identity and reporting metadata of a monitored factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    /// HJ 525 code, stored lowercase.
    pub code: String,
    pub name: String,
    pub category: FactorCategory,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub precision: Precision,
}
