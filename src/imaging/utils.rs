use serde::{Deserialize, Deserializer};

/// Converts a scalar serde_yaml::Value to the text a form field would hold.
///
/// Sequences and mappings have no form equivalent and yield `None`; a null
/// is an empty field.
pub fn yaml_value_to_str(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_value_to_str(&tagged.value),
    }
}

/// Accept `elevation: 30` as well as `elevation: "30"` for string fields.
pub fn deserialize_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    yaml_value_to_str(&value)
        .ok_or_else(|| serde::de::Error::custom("expected a single value, not a list or mapping"))
}
