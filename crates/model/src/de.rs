//! Lenient field decoders shared by the wire types.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes a nullable string, mapping `null` to an empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes function call arguments into raw JSON text.
///
/// Most endpoints send the arguments as a JSON-encoded string, but some
/// send the object itself. The latter is re-encoded in compact form.
pub(crate) fn arguments_text<'de, D>(
    deserializer: D,
) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        other => Ok(other.to_string()),
    }
}
