use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::kind::ConditionKind;
use super::value::Value;

/// Kind-specific parameters of a condition, keyed by param name.
pub type Params = BTreeMap<String, Value>;

/// Opaque identifier of a condition, unique within its document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(String);

impl ConditionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConditionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ConditionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single condition of a rule document.
///
/// Serializes as `{"id", "type", "label"?, "negate", "params"?}`. Reading also
/// accepts the flat layout older editors wrote, where the condition id is
/// called `guid` and params sit directly on the condition object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCondition")]
pub struct ConditionNode {
    pub id: ConditionId,
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub negate: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: Params,
}

impl ConditionNode {
    /// A non-negated, unlabeled condition with no params.
    #[must_use]
    pub fn new(id: impl Into<ConditionId>, kind: ConditionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            negate: false,
            params: Params::new(),
        }
    }

    #[must_use]
    pub fn negated(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into()).filter(|l| !l.trim().is_empty());
        self
    }

    #[must_use]
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn get_param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// The user's label, else the catalog label, else the raw kind tag.
    #[must_use]
    pub fn display_label(&self) -> &str {
        match &self.label {
            Some(label) if !label.is_empty() => label,
            _ => self.kind.info().map_or(self.kind.tag(), |info| info.label),
        }
    }
}

/// Wire form accepted on read; normalized into [`ConditionNode`].
///
/// Every field is read as raw JSON so that one badly typed field falls back to
/// its default instead of rejecting the whole document.
#[derive(Deserialize)]
struct RawCondition {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    guid: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    kind: Option<serde_json::Value>,
    #[serde(default)]
    label: Option<serde_json::Value>,
    #[serde(default)]
    negate: Option<serde_json::Value>,
    #[serde(default)]
    params: Option<serde_json::Value>,
    #[serde(flatten)]
    flat: BTreeMap<String, serde_json::Value>,
}

/// Editor bookkeeping that older documents persisted next to the params.
fn is_editor_key(key: &str) -> bool {
    key == "operator" || key.starts_with('_')
}

fn param_value(key: &str, raw: serde_json::Value) -> Option<Value> {
    match serde_json::from_value(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(param = key, error = %err, "dropping unreadable condition param");
            None
        }
    }
}

fn text_field(field: &'static str, raw: Option<serde_json::Value>) -> Option<String> {
    match raw? {
        serde_json::Value::String(text) => Some(text),
        other => {
            tracing::debug!(field, value = %other, "ignoring non-string condition field");
            None
        }
    }
}

fn id_field(field: &'static str, raw: Option<serde_json::Value>) -> Option<ConditionId> {
    match raw? {
        serde_json::Value::String(id) => Some(ConditionId(id)),
        serde_json::Value::Number(id) => Some(ConditionId(id.to_string())),
        other => {
            tracing::debug!(field, value = %other, "ignoring unreadable condition id");
            None
        }
    }
}

fn negate_field(raw: Option<serde_json::Value>) -> bool {
    match raw {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(negate)) => negate,
        Some(other) => {
            tracing::debug!(value = %other, "non-boolean negate read as false");
            false
        }
    }
}

fn params_field(raw: Option<serde_json::Value>) -> serde_json::Map<String, serde_json::Value> {
    match raw {
        None | Some(serde_json::Value::Null) => serde_json::Map::new(),
        Some(serde_json::Value::Object(params)) => params,
        Some(other) => {
            tracing::debug!(value = %other, "non-object params read as empty");
            serde_json::Map::new()
        }
    }
}

impl From<RawCondition> for ConditionNode {
    fn from(raw: RawCondition) -> Self {
        let mut params = Params::new();
        let flat = raw
            .flat
            .into_iter()
            .filter(|(key, _)| !is_editor_key(key));
        for (key, raw_value) in flat.chain(params_field(raw.params)) {
            if let Some(value) = param_value(&key, raw_value) {
                params.insert(key, value);
            }
        }

        // `id` wins over the legacy `guid` when a document carries both.
        let id = id_field("id", raw.id)
            .or_else(|| id_field("guid", raw.guid))
            .unwrap_or_default();
        // A condition without a readable type reads as an unknown kind.
        let tag = text_field("type", raw.kind).unwrap_or_default();

        Self {
            id,
            kind: ConditionKind::from_tag(&tag),
            label: text_field("label", raw.label).filter(|l| !l.is_empty()),
            negate: negate_field(raw.negate),
            params,
        }
    }
}
