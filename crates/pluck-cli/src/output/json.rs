use pluck_core::error::PluckError;
use pluck_core::summary::Summary;
use pluck_core::trace::ExtractionTrace;
use pluck_core::ExtractionResult;

/// `{"kind": ..., "records": [...]}`, plus `trace` and `summary` when asked for.
pub fn print(
    result: &ExtractionResult,
    trace: Option<&ExtractionTrace>,
    summary: Option<&Summary>,
) -> Result<(), PluckError> {
    let mut value = serde_json::to_value(result)?;
    if let Some(obj) = value.as_object_mut() {
        if let Some(trace) = trace {
            obj.insert("trace".into(), serde_json::to_value(trace)?);
        }
        if let Some(summary) = summary {
            obj.insert("summary".into(), serde_json::to_value(summary)?);
        }
    }
    let json = serde_json::to_string_pretty(&value)?;
    println!("{json}");
    Ok(())
}
