use indexmap::IndexMap;
use sechtml_core::escape_html_attr;
use serde_json::Value;

/// Ordered attribute list for a widget element.
///
/// A `None` or empty value keeps its slot but is left out of the markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: IndexMap<String, Option<String>>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|value| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Serializes as `name="value"` pairs separated by single spaces.
    pub fn to_html(&self) -> String {
        self.entries
            .iter()
            .filter_map(|(name, value)| match value.as_deref() {
                Some(value) if !value.is_empty() => {
                    Some(format!("{}=\"{}\"", name, escape_html_attr(value)))
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Converts a `data-*` value to its attribute text.
///
/// Strings and numbers pass through, `true` becomes `"1"` and `false` an empty
/// (omitted) value. Arrays, objects and `null` are encoded as JSON.
pub fn data_value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Null | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
