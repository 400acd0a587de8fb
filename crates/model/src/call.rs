use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::de::arguments_text;

const FUNCTION_KIND: &str = "function";

/// A request from the model to invoke a declared [`Tool`](crate::Tool).
///
/// The arguments are kept as the raw JSON text the model produced. Parsing
/// and executing them is up to the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FunctionCall {
    /// The identifier of the call, if the endpoint assigned one.
    pub id: Option<String>,
    /// The kind of the call. Calls built with [`FunctionCall::new`] or
    /// decoded without a `type` are `"function"`.
    pub kind: Option<String>,
    /// Name of the function to invoke.
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

impl FunctionCall {
    /// Creates a call without an identifier.
    #[inline]
    pub fn new<N: Into<String>, A: Into<String>>(name: N, arguments: A) -> Self {
        Self {
            id: None,
            kind: Some(FUNCTION_KIND.to_owned()),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Sets the identifier of the call.
    #[inline]
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Decodes the arguments into `T`.
    pub fn parse_arguments<T: DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}

#[derive(Serialize)]
struct FunctionRef<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Serialize)]
struct CallRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(rename = "type")]
    kind: &'a str,
    function: FunctionRef<'a>,
}

impl Serialize for FunctionCall {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CallRef {
            id: self.id.as_deref(),
            kind: self.kind.as_deref().unwrap_or(FUNCTION_KIND),
            function: FunctionRef {
                name: &self.name,
                arguments: &self.arguments,
            },
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default, deserialize_with = "arguments_text")]
    arguments: String,
}

// Modern endpoints nest the function under `function`, legacy ones put
// `name` and `arguments` at the top level.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireCall {
    Nested {
        #[serde(default)]
        id: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
        function: WireFunction,
    },
    Flat {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        call_id: Option<String>,
        name: String,
        #[serde(default, deserialize_with = "arguments_text")]
        arguments: String,
    },
}

impl<'de> Deserialize<'de> for FunctionCall {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let call = match WireCall::deserialize(deserializer)? {
            WireCall::Nested { id, kind, function } => FunctionCall {
                id,
                kind: kind.or_else(|| Some(FUNCTION_KIND.to_owned())),
                name: function.name,
                arguments: function.arguments,
            },
            WireCall::Flat {
                id,
                call_id,
                name,
                arguments,
            } => FunctionCall {
                id: id.or(call_id),
                kind: Some(FUNCTION_KIND.to_owned()),
                name,
                arguments,
            },
        };
        Ok(call)
    }
}
