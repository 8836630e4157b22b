use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Product → modules → submodules tree returned by the extraction step.
///
/// Every field tolerates being absent, `null` or of the wrong type in the
/// model's reply and falls back to an empty value. List entries that are not
/// objects are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyResult {
    #[serde(default, deserialize_with = "lenient_text")]
    pub product: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub overview: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default, deserialize_with = "lenient_text")]
    pub module_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub purpose: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub submodules: Vec<Submodule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submodule {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub details: String,
}

impl HierarchyResult {
    pub fn is_empty(&self) -> bool {
        self.product.is_empty() && self.overview.is_empty() && self.modules.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.modules.iter().map(|m| m.submodules.len()).sum()
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        _ => Ok(String::new()),
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
