use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Describes a capability offered to the remote model.
///
/// A tool is purely declarative. The model may answer with a
/// [`FunctionCall`](crate::FunctionCall) naming it, and the caller decides
/// what to do with that request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Always `"function"`.
    pub r#type: String,
    /// The function being declared.
    pub function: ToolFunction,
}

impl Tool {
    /// Declares a function tool.
    #[inline]
    pub fn function(function: ToolFunction) -> Self {
        Self {
            r#type: "function".to_owned(),
            function,
        }
    }

    /// Starts building a function tool with the given name.
    #[inline]
    pub fn builder<S: Into<String>>(name: S) -> ToolBuilder {
        ToolBuilder::new(name)
    }
}

/// The function part of a [`Tool`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFunction {
    /// Identifier the model uses to call the function.
    pub name: String,
    /// What the function does.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The accepted arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ToolParameters>,
}

/// An object schema describing the arguments of a [`ToolFunction`].
///
/// `required` and `additional_properties` are hints for the model; nothing
/// in this workspace validates call arguments against them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolParameters {
    /// Always `"object"`.
    pub r#type: String,
    /// Properties keyed by argument name.
    pub properties: BTreeMap<String, ToolProperty>,
    /// Names of the mandatory arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Whether arguments not listed in `properties` are accepted.
    #[serde(default)]
    pub additional_properties: bool,
}

impl Default for ToolParameters {
    #[inline]
    fn default() -> Self {
        Self {
            r#type: "object".to_owned(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }
}

/// A single argument of a [`ToolFunction`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolProperty {
    /// JSON type of the argument.
    pub r#type: ParamType,
    /// What the argument means.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The allowed values, for string enumerations.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

/// JSON type of a [`ToolProperty`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A whole JSON number.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

/// Builder for function [`Tool`]s.
///
/// ```
/// use hf_adaptor_model::{ParamType, Tool};
///
/// let tool = Tool::builder("get_current_weather")
///     .description("Get the current weather in a given location")
///     .required_param("location", ParamType::String, "The city")
///     .enum_param("unit", "Temperature unit", ["celsius", "fahrenheit"], false)
///     .build();
/// assert_eq!(tool.function.name, "get_current_weather");
/// ```
#[derive(Clone, Debug)]
pub struct ToolBuilder {
    name: String,
    description: String,
    parameters: Option<ToolParameters>,
    additional_properties: bool,
}

impl ToolBuilder {
    /// Creates a builder for a function with the given name.
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: None,
            additional_properties: false,
        }
    }

    /// Sets the description of the function.
    #[inline]
    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Declares an optional argument.
    #[inline]
    pub fn param<N: Into<String>, D: Into<String>>(
        self,
        name: N,
        ty: ParamType,
        description: D,
    ) -> Self {
        self.property(name.into(), ty, description.into(), None, false)
    }

    /// Declares a mandatory argument.
    #[inline]
    pub fn required_param<N: Into<String>, D: Into<String>>(
        self,
        name: N,
        ty: ParamType,
        description: D,
    ) -> Self {
        self.property(name.into(), ty, description.into(), None, true)
    }

    /// Declares a string argument restricted to the given values.
    pub fn enum_param<N, D, I, V>(
        self,
        name: N,
        description: D,
        values: I,
        required: bool,
    ) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let allowed = values.into_iter().map(Into::into).collect();
        self.property(
            name.into(),
            ParamType::String,
            description.into(),
            Some(allowed),
            required,
        )
    }

    /// Sets whether undeclared arguments are accepted.
    #[inline]
    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = allowed;
        self
    }

    fn property(
        mut self,
        name: String,
        ty: ParamType,
        description: String,
        allowed: Option<Vec<String>>,
        required: bool,
    ) -> Self {
        let parameters = self.parameters.get_or_insert_with(Default::default);
        // Redeclaring an argument replaces it, so it must not stay required.
        parameters.required.retain(|n| n != &name);
        if required {
            parameters.required.push(name.clone());
        }
        parameters.properties.insert(
            name,
            ToolProperty {
                r#type: ty,
                description,
                allowed,
            },
        );
        self
    }

    /// Builds the tool.
    pub fn build(self) -> Tool {
        let additional_properties = self.additional_properties;
        Tool::function(ToolFunction {
            name: self.name,
            description: self.description,
            parameters: self.parameters.map(|p| ToolParameters {
                additional_properties,
                ..p
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_tool_json() {
        let tool = Tool::builder("get_current_weather")
            .description("Get the current weather in a given location")
            .required_param(
                "location",
                ParamType::String,
                "The city and state, e.g. San Francisco, CA",
            )
            .param(
                "unit",
                ParamType::String,
                "Unit for temperature, e.g. celsius or fahrenheit",
            )
            .build();
        let expected: Value = serde_json::from_str(
            r#"{"type":"function","function":{"name":"get_current_weather","description":"Get the current weather in a given location","parameters":{"type":"object","properties":{"location":{"type":"string","description":"The city and state, e.g. San Francisco, CA"},"unit":{"type":"string","description":"Unit for temperature, e.g. celsius or fahrenheit"}},"required":["location"],"additionalProperties":false}}}"#,
        )
        .unwrap();
        assert_eq!(serde_json::to_value(&tool).unwrap(), expected);
    }

    #[test]
    fn test_required_keeps_supplied_order() {
        let tool = Tool::builder("book")
            .required_param("to", ParamType::String, "")
            .param("note", ParamType::String, "")
            .required_param("from", ParamType::String, "")
            .required_param("date", ParamType::String, "")
            .param("seats", ParamType::Integer, "")
            .build();
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(
            value["function"]["parameters"]["required"],
            json!(["to", "from", "date"])
        );
    }

    #[test]
    fn test_redeclared_param_is_not_duplicated() {
        let tool = Tool::builder("f")
            .required_param("a", ParamType::String, "")
            .param("a", ParamType::Number, "")
            .build();
        let parameters = tool.function.parameters.unwrap();
        assert!(parameters.required.is_empty());
        assert_eq!(parameters.properties["a"].r#type, ParamType::Number);
    }

    #[test]
    fn test_enum_param() {
        let tool = Tool::builder("convert")
            .enum_param("unit", "Target unit", ["celsius", "fahrenheit"], true)
            .additional_properties(true)
            .build();
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(
            value["function"]["parameters"],
            json!({
                "type": "object",
                "properties": {
                    "unit": {
                        "type": "string",
                        "description": "Target unit",
                        "enum": ["celsius", "fahrenheit"]
                    }
                },
                "required": ["unit"],
                "additionalProperties": true
            })
        );
    }

    #[test]
    fn test_no_params_omits_parameters() {
        let tool = Tool::builder("now").build();
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value, json!({ "type": "function", "function": { "name": "now" } }));
    }
}
