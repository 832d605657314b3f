use crate::cwqi::IndexSet;
use crate::error::WaterQualityError;
use crate::model::{Factor, QualityClass, WaterBody};
use crate::standard::schema::{ClassRuleDef, OptInFactor, StandardDef};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Five class boundaries, class Ⅰ first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassThresholds([Decimal; 5]);

impl ClassThresholds {
    pub fn new(values: [Decimal; 5]) -> ClassThresholds {
        ClassThresholds(values)
    }

    /// Boundary of `class`; `None` for 劣Ⅴ, which has no upper boundary.
    pub fn get(&self, class: QualityClass) -> Option<Decimal> {
        match class {
            QualityClass::Class6 => None,
            c => Some(self.0[usize::from(c.number()) - 1]),
        }
    }

    pub fn class3(&self) -> Decimal {
        self.0[2]
    }

    pub fn class5(&self) -> Decimal {
        self.0[4]
    }

    /// (class, boundary) pairs, class Ⅰ first.
    pub fn iter(&self) -> impl Iterator<Item = (QualityClass, Decimal)> + '_ {
        QualityClass::BOUNDED.into_iter().zip(self.0.iter().copied())
    }
}

/// Class Ⅰ band on a bounded scale (pH).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeutralRange {
    pub min: Decimal,
    pub max: Decimal,
    pub scale_min: Decimal,
    pub scale_max: Decimal,
    pub neutral: Decimal,
}

impl NeutralRange {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRule {
    Range(NeutralRange),
    Descending(ClassThresholds),
    Ascending {
        river: ClassThresholds,
        lake: Option<ClassThresholds>,
    },
}

impl ClassRule {
    /// Thresholds applicable to `water_body`; `None` for range rules.
    pub fn thresholds(&self, water_body: WaterBody) -> Option<ClassThresholds> {
        match self {
            ClassRule::Range(_) => None,
            ClassRule::Descending(t) => Some(*t),
            ClassRule::Ascending { river, lake } => {
                Some(*select_variant(river, lake.as_ref(), water_body))
            }
        }
    }
}

/// Lake thresholds when the factor has them and the water body is a lake.
pub(crate) fn select_variant<'a>(
    river: &'a ClassThresholds,
    lake: Option<&'a ClassThresholds>,
    water_body: WaterBody,
) -> &'a ClassThresholds {
    match (water_body, lake) {
        (WaterBody::Lake, Some(lake)) => lake,
        _ => river,
    }
}

#[derive(Debug, Clone)]
struct ClassEntry {
    rule: ClassRule,
    opt_in: Option<OptInFactor>,
}

/// Compiled, read-only view of a standard document.
///
/// Built once and shared by reference; every lookup is case-insensitive on
/// the factor code.
#[derive(Debug, Clone)]
pub struct StandardTable {
    name: String,
    version: String,
    factors: HashMap<String, Factor>,
    class_rules: HashMap<String, ClassEntry>,
    class_order: Vec<String>,
    single_limits: HashMap<String, Decimal>,
    index_sets: HashMap<IndexSet, Vec<String>>,
}

pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

fn thresholds_from(code: &str, values: &[Decimal]) -> Result<ClassThresholds, WaterQualityError> {
    let array: [Decimal; 5] = values.try_into().map_err(|_| {
        WaterQualityError::StandardInvalid(format!(
            "factor '{}' must have exactly 5 class thresholds, found {}",
            code,
            values.len()
        ))
    })?;
    Ok(ClassThresholds::new(array))
}

impl StandardTable {
    /// Validate a standard document and compile it into lookup tables.
    pub fn compile(def: &StandardDef) -> Result<StandardTable, WaterQualityError> {
        super::validate_standard(def)?;

        let factors: HashMap<String, Factor> = def
            .factors
            .iter()
            .map(|f| {
                let code = normalize_code(&f.code);
                (
                    code.clone(),
                    Factor {
                        code,
                        ..f.clone()
                    },
                )
            })
            .collect();

        let mut class_rules = HashMap::new();
        let mut class_order = Vec::new();
        for rule_def in &def.class_rules {
            let code = normalize_code(rule_def.code());
            let entry = match rule_def {
                ClassRuleDef::Range {
                    min,
                    max,
                    scale_min,
                    scale_max,
                    neutral,
                    ..
                } => ClassEntry {
                    rule: ClassRule::Range(NeutralRange {
                        min: *min,
                        max: *max,
                        scale_min: *scale_min,
                        scale_max: *scale_max,
                        neutral: *neutral,
                    }),
                    opt_in: None,
                },
                ClassRuleDef::Descending { thresholds, .. } => ClassEntry {
                    rule: ClassRule::Descending(thresholds_from(&code, thresholds)?),
                    opt_in: None,
                },
                ClassRuleDef::Ascending {
                    thresholds,
                    lake_thresholds,
                    opt_in,
                    ..
                } => ClassEntry {
                    rule: ClassRule::Ascending {
                        river: thresholds_from(&code, thresholds)?,
                        lake: lake_thresholds
                            .as_deref()
                            .map(|t| thresholds_from(&code, t))
                            .transpose()?,
                    },
                    opt_in: *opt_in,
                },
            };
            class_order.push(code.clone());
            class_rules.insert(code, entry);
        }

        let single_limits = def
            .single_limits
            .iter()
            .map(|(code, limit)| (normalize_code(code), *limit))
            .collect();

        let mut index_sets = HashMap::new();
        for (key, codes) in &def.index_sets {
            let set = IndexSet::from_key(key).ok_or_else(|| {
                WaterQualityError::StandardInvalid(format!("unknown index set '{}'", key))
            })?;
            index_sets.insert(set, codes.iter().map(|c| normalize_code(c)).collect());
        }

        tracing::info!(
            "Compiled standard '{}' (v{}): {} factors, {} class rules, {} single limits",
            def.name,
            def.version,
            factors.len(),
            class_order.len(),
            def.single_limits.len()
        );

        Ok(StandardTable {
            name: def.name.clone(),
            version: def.version.clone(),
            factors,
            class_rules,
            class_order,
            single_limits,
            index_sets,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Factor metadata by code.
    pub fn factor(&self, code: &str) -> Option<&Factor> {
        self.factors.get(&normalize_code(code))
    }

    /// Display name for a code, falling back to the code itself.
    pub fn factor_name(&self, code: &str) -> String {
        self.factor(code)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| code.to_string())
    }

    pub fn is_classifiable(&self, code: &str) -> bool {
        self.class_rules.contains_key(&normalize_code(code))
    }

    pub fn is_secondary(&self, code: &str) -> bool {
        self.single_limits.contains_key(&normalize_code(code))
    }

    /// Codes of all classifiable factors, in document order.
    pub fn classifiable_codes(&self) -> &[String] {
        &self.class_order
    }

    pub fn class_rule(&self, code: &str) -> Result<&ClassRule, WaterQualityError> {
        self.class_rules
            .get(&normalize_code(code))
            .map(|e| &e.rule)
            .ok_or_else(|| WaterQualityError::UnknownFactor {
                code: code.to_string(),
                context: "classification".into(),
            })
    }

    pub(crate) fn opt_in(&self, code: &str) -> Option<OptInFactor> {
        self.class_rules
            .get(&normalize_code(code))
            .and_then(|e| e.opt_in)
    }

    /// Class thresholds of a factor. `water_body` only matters for factors
    /// with a lake variant (total phosphorus).
    pub fn thresholds(
        &self,
        code: &str,
        water_body: WaterBody,
    ) -> Result<ClassThresholds, WaterQualityError> {
        self.class_rule(code)?.thresholds(water_body).ok_or_else(|| {
            WaterQualityError::InvalidArgument(format!(
                "{} is classified by range and has no class thresholds",
                self.factor_name(code)
            ))
        })
    }

    /// One class boundary, addressed by class number 1-5.
    pub fn threshold_for_class(
        &self,
        code: &str,
        class_number: u8,
        water_body: WaterBody,
    ) -> Result<Decimal, WaterQualityError> {
        let thresholds = self.thresholds(code, water_body)?;
        let class = QualityClass::from_number(class_number)?;
        thresholds.get(class).ok_or_else(|| {
            WaterQualityError::InvalidArgument(format!(
                "class {} has no threshold (expected 1-5)",
                class_number
            ))
        })
    }

    pub fn single_limit(&self, code: &str) -> Result<Decimal, WaterQualityError> {
        self.single_limits
            .get(&normalize_code(code))
            .copied()
            .ok_or_else(|| WaterQualityError::UnknownFactor {
                code: code.to_string(),
                context: "single-limit".into(),
            })
    }

    /// Factor codes of an index set, in reporting order.
    pub fn index_set(&self, set: IndexSet) -> Result<&[String], WaterQualityError> {
        self.index_sets
            .get(&set)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                WaterQualityError::InvalidArgument(format!(
                    "standard '{}' does not define index set '{}'",
                    self.name, set
                ))
            })
    }

    pub fn index_set_contains(&self, set: IndexSet, code: &str) -> bool {
        let code = normalize_code(code);
        self.index_sets
            .get(&set)
            .is_some_and(|codes| codes.contains(&code))
    }
}
