//! Interpretation of the scanner's JSON body.
//!
//! Expected shape: `{"data":{"result":[{"name":..,"is_infected":..,"viruses":[..]}]}}`.

use serde_json::Value;

use inbound_core::types::ScanFailure;

/// Signature reported when an entry is flagged without naming a virus.
pub const UNIDENTIFIED_SIGNATURE: &str = "unidentified";

/// A flagged entry, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Entry name as reported by the scanner.
    pub name: Option<String>,
    /// Reported signatures, never empty.
    pub signatures: Vec<String>,
}

/// First flagged entry, or `None` when every entry is clean.
///
/// Stops at the first infected entry.
pub fn first_detection(body: &Value) -> Result<Option<Detection>, ScanFailure> {
    let results = body
        .get("data")
        .and_then(|data| data.get("result"))
        .and_then(Value::as_array)
        .ok_or_else(|| ScanFailure::MalformedResponse("missing data.result array".into()))?;

    Ok(results
        .iter()
        .find(|entry| is_truthy(entry.get("is_infected")))
        .map(|entry| {
            let mut signatures: Vec<String> = entry
                .get("viruses")
                .and_then(Value::as_array)
                .map(|v| v.iter().filter_map(Value::as_str).map(str::to_owned).collect())
                .unwrap_or_default();
            if signatures.is_empty() {
                signatures.push(UNIDENTIFIED_SIGNATURE.to_string());
            }
            Detection {
                name: entry.get("name").and_then(Value::as_str).map(str::to_owned),
                signatures,
            }
        }))
}

/// Loose truthiness: absent, null, false, zero, `""`, `"0"` and empty
/// collections are false.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty() && s != "0",
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
