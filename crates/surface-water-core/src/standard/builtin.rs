use crate::error::WaterQualityError;
use crate::standard::schema::StandardDef;
use crate::standard::table::StandardTable;
use std::sync::LazyLock;

const GB3838_2002_JSON: &str = include_str!("../../../../standards/gb3838-2002.json");

/// Available predefined standards.
pub const PRESETS: &[&str] = &["gb3838-2002"];

static GB3838_2002: LazyLock<Result<StandardTable, String>> = LazyLock::new(|| {
    compile_embedded(GB3838_2002_JSON).map_err(|e| {
        tracing::error!("embedded GB 3838-2002 standard is invalid: {}", e);
        e.to_string()
    })
});

fn compile_embedded(json: &str) -> Result<StandardTable, WaterQualityError> {
    let def: StandardDef = serde_json::from_str(json)?;
    StandardTable::compile(&def)
}

/// The process-wide GB 3838-2002 table, compiled on first use.
pub fn gb3838_2002() -> Result<&'static StandardTable, WaterQualityError> {
    GB3838_2002
        .as_ref()
        .map_err(|reason| WaterQualityError::StandardInvalid(reason.clone()))
}

/// Compile a fresh copy of a predefined standard by name.
pub fn load_preset(name: &str) -> Result<StandardTable, WaterQualityError> {
    match name.to_lowercase().as_str() {
        "gb3838-2002" | "gb3838" => compile_embedded(GB3838_2002_JSON),
        _ => Err(WaterQualityError::InvalidArgument(format!(
            "unknown standard preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}
