//! Company record normalization and rendering.
//!
//! The company tool does not promise a payload shape. Servers have been seen
//! to return the records as JSON text inside an MCP content block, as a bare
//! list, wrapped under `companies`, or as a single object. [`PayloadShape`]
//! names each recognized form; [`normalize`] reduces all of them to a list.

use serde_json::Value;

use crate::error::NormalizationError;

/// Rendered context when there are no records.
pub const NO_DATA_PLACEHOLDER: &str = "No company data available.";

/// Rendered context when the payload could not be parsed.
pub const PARSE_ERROR_PLACEHOLDER: &str = "Error parsing company data.";

/// Recognized payload forms, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// `{"content": [{"text": "<json>"}, ...]}`
    EmbeddedText(&'a str),
    /// `[record, ...]`
    List(&'a [Value]),
    /// `{"companies": [record, ...]}`
    Companies(&'a [Value]),
    /// Any other non-empty object, taken as one record.
    Single(&'a Value),
    /// Nothing usable.
    Unrecognized,
}

impl<'a> PayloadShape<'a> {
    /// Classify a raw tool payload.
    pub fn classify(payload: &'a Value) -> Self {
        if let Some(text) = embedded_text(payload) {
            return Self::EmbeddedText(text);
        }
        match payload {
            Value::Array(items) => Self::List(items),
            Value::Object(map) => match map.get("companies") {
                Some(Value::Array(items)) => Self::Companies(items),
                _ if !map.is_empty() => Self::Single(payload),
                _ => Self::Unrecognized,
            },
            _ => Self::Unrecognized,
        }
    }
}

fn embedded_text(payload: &Value) -> Option<&str> {
    payload
        .get("content")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
}

/// Reduce a tool payload to a list of raw records.
///
/// Only unparseable embedded text is an error; an unrecognized shape yields
/// an empty list.
pub fn normalize(payload: &Value) -> Result<Vec<Value>, NormalizationError> {
    match PayloadShape::classify(payload) {
        PayloadShape::EmbeddedText(text) => {
            let parsed: Value =
                serde_json::from_str(text).map_err(NormalizationError::UnparseableText)?;
            Ok(match parsed {
                Value::Array(items) => items,
                Value::Object(mut map) => match map.remove("companies") {
                    Some(Value::Array(items)) => items,
                    Some(other) => {
                        map.insert("companies".to_string(), other);
                        vec![Value::Object(map)]
                    }
                    None => vec![Value::Object(map)],
                },
                other => vec![other],
            })
        }
        PayloadShape::List(items) | PayloadShape::Companies(items) => Ok(items.to_vec()),
        PayloadShape::Single(value) => Ok(vec![value.clone()]),
        PayloadShape::Unrecognized => Ok(Vec::new()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// A model a company uses, with an optional specialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelUse {
    pub name: String,
    pub specialization: Option<String>,
}

/// One company, read leniently from a raw record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    pub chatbots: Vec<String>,
    pub models: Vec<ModelUse>,
}

impl CompanyRecord {
    /// Read a record. Missing or mistyped fields are left empty; a bare
    /// string is taken as the company name.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self {
                name: string_field(value, &["company", "name"]),
                description: string_field(value, &["description"]),
                chatbots: list_field(value, "chats")
                    .filter_map(|c| match c {
                        Value::String(s) => Some(s.clone()),
                        other => string_field(other, &["chatbot", "name"]),
                    })
                    .collect(),
                models: list_field(value, "llms")
                    .filter_map(|m| match m {
                        Value::String(s) => Some(ModelUse {
                            name: s.clone(),
                            specialization: None,
                        }),
                        other => string_field(other, &["llm", "name"]).map(|name| ModelUse {
                            name,
                            specialization: string_field(other, &["specialization"]),
                        }),
                    })
                    .collect(),
            },
            Value::String(name) => Self {
                name: Some(name.clone()),
                ..Default::default()
            },
            _ => Self::default(),
        }
    }

    /// Render as labeled lines.
    pub fn render(&self) -> String {
        let chatbots = if self.chatbots.is_empty() {
            "None".to_string()
        } else {
            self.chatbots.join(", ")
        };

        let models = if self.models.is_empty() {
            "None".to_string()
        } else {
            self.models
                .iter()
                .map(|m| match m.specialization {
                    Some(ref focus) => format!("{} ({})", m.name, focus),
                    None => m.name.clone(),
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Company: {}\nDescription: {}\nChatbots: {}\nLLM Models: {}",
            self.name.as_deref().unwrap_or("Unknown"),
            self.description.as_deref().unwrap_or("No description"),
            chatbots,
            models
        )
    }
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn list_field<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

/// Render records into a context block, one block per record separated by a
/// blank line. An empty list renders the no-data placeholder.
pub fn render_records(records: &[CompanyRecord]) -> String {
    if records.is_empty() {
        return NO_DATA_PLACEHOLDER.to_string();
    }
    records
        .iter()
        .map(CompanyRecord::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Normalize and render any payload, substituting the placeholders on failure.
pub fn format_company_data(payload: &Value) -> String {
    match normalize(payload) {
        Ok(raw) => {
            let records: Vec<CompanyRecord> = raw.iter().map(CompanyRecord::from_value).collect();
            render_records(&records)
        }
        Err(e) => {
            tracing::debug!(error = %e, "company payload could not be normalized");
            PARSE_ERROR_PLACEHOLDER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn acme_text_payload() -> Value {
        json!({"content": [{
            "type": "text",
            "text": "[{\"company\":\"Acme\",\"description\":\"d\",\"chats\":[{\"chatbot\":\"c1\"}],\"llms\":[{\"llm\":\"m1\",\"specialization\":\"s1\"}]}]"
        }]})
    }

    #[test]
    fn test_embedded_text_renders_exactly() {
        assert_eq!(
            format_company_data(&acme_text_payload()),
            "Company: Acme\nDescription: d\nChatbots: c1\nLLM Models: m1 (s1)"
        );
    }

    #[test]
    fn test_classify_order() {
        let payload = acme_text_payload();
        assert!(matches!(
            PayloadShape::classify(&payload),
            PayloadShape::EmbeddedText(_)
        ));
        assert!(matches!(
            PayloadShape::classify(&json!([1])),
            PayloadShape::List(_)
        ));
        assert!(matches!(
            PayloadShape::classify(&json!({"companies": []})),
            PayloadShape::Companies(_)
        ));
        assert!(matches!(
            PayloadShape::classify(&json!({"company": "Solo"})),
            PayloadShape::Single(_)
        ));
        assert_eq!(PayloadShape::classify(&json!({})), PayloadShape::Unrecognized);
        assert_eq!(PayloadShape::classify(&json!(null)), PayloadShape::Unrecognized);
        assert_eq!(PayloadShape::classify(&json!("x")), PayloadShape::Unrecognized);
    }

    #[test]
    fn test_embedded_text_variants() {
        let wrapped = json!({"content": [{"text": "{\"companies\":[{\"company\":\"A\"},{\"company\":\"B\"}]}"}]});
        assert_eq!(normalize(&wrapped).unwrap().len(), 2);

        let single = json!({"content": [{"text": "{\"company\":\"A\"}"}]});
        assert_eq!(normalize(&single).unwrap(), vec![json!({"company": "A"})]);

        let scalar = json!({"content": [{"text": "42"}]});
        assert_eq!(normalize(&scalar).unwrap(), vec![json!(42)]);
    }

    #[test]
    fn test_unparseable_text_is_an_error() {
        let payload = json!({"content": [{"text": "Company list unavailable"}]});
        assert!(matches!(
            normalize(&payload),
            Err(NormalizationError::UnparseableText(_))
        ));
        assert_eq!(format_company_data(&payload), PARSE_ERROR_PLACEHOLDER);
    }

    #[test]
    fn test_unrecognized_and_empty_shapes_render_placeholder() {
        assert_eq!(format_company_data(&json!(null)), NO_DATA_PLACEHOLDER);
        assert_eq!(format_company_data(&json!({})), NO_DATA_PLACEHOLDER);
        assert_eq!(format_company_data(&json!([])), NO_DATA_PLACEHOLDER);
        assert_eq!(format_company_data(&json!({"companies": []})), NO_DATA_PLACEHOLDER);
    }

    #[test]
    fn test_missing_fields_and_string_children() {
        let payload = json!([
            {"company": "Globex", "chats": ["helper", {"chatbot": "concierge"}], "llms": ["gpt-4o"]},
            {"description": "anonymous"}
        ]);
        assert_eq!(
            format_company_data(&payload),
            "Company: Globex\nDescription: No description\nChatbots: helper, concierge\nLLM Models: gpt-4o\n\n\
             Company: Unknown\nDescription: anonymous\nChatbots: None\nLLM Models: None"
        );
    }

    #[test]
    fn test_multiple_models_with_qualifiers() {
        let record = CompanyRecord::from_value(&json!({
            "company": "Initech",
            "description": "TPS reports",
            "chats": [],
            "llms": [
                {"llm": "m1", "specialization": "s1"},
                {"llm": "m2", "specialization": "s2"},
                {"specialization": "orphan"}
            ]
        }));
        assert_eq!(record.models.len(), 2);
        assert!(record.render().ends_with("LLM Models: m1 (s1), m2 (s2)"));
    }

    #[test]
    fn test_bare_string_record() {
        let record = CompanyRecord::from_value(&json!("Umbrella"));
        assert_eq!(record.name.as_deref(), Some("Umbrella"));
    }
}
