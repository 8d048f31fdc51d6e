use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::{ConditionId, ConditionNode};
use super::context::EvaluationContext;
use super::error::DocumentError;
use super::evaluation_report::EvaluationReport;

/// What to do with the block when the conditions match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Render the block if and only if the conditions match.
    #[default]
    Show,
    /// Render the block if and only if the conditions do not match.
    Hide,
}

impl Action {
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Action::Show => Action::Hide,
            Action::Hide => Action::Show,
        }
    }

    /// Whether the block renders given whether its conditions matched.
    #[must_use]
    pub fn decide(self, matched: bool) -> bool {
        match self {
            Action::Show => matched,
            Action::Hide => !matched,
        }
    }
}

/// How the conditions of a document combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Logic {
    /// Every condition must hold.
    #[default]
    #[serde(rename = "and")]
    All,
    /// At least one condition must hold.
    #[serde(rename = "or")]
    Any,
}

impl Logic {
    #[must_use]
    pub fn dual(self) -> Self {
        match self {
            Logic::All => Logic::Any,
            Logic::Any => Logic::All,
        }
    }

    fn is_default(&self) -> bool {
        *self == Logic::All
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Show => f.write_str("show"),
            Action::Hide => f.write_str("hide"),
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::All => f.write_str("and"),
            Logic::Any => f.write_str("or"),
        }
    }
}

/// The visibility policy attached to one content block.
///
/// A new document shows the block unconditionally:
///
/// ```
/// use block_conditions::{Action, RuleDocument};
///
/// let doc = RuleDocument::default();
/// assert_eq!(doc.action, Action::Show);
/// assert!(doc.conditions.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub action: Action,
    #[serde(default, skip_serializing_if = "Logic::is_default")]
    pub logic: Logic,
    #[serde(default)]
    pub conditions: Vec<ConditionNode>,
}

impl RuleDocument {
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            action,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn logic(mut self, logic: Logic) -> Self {
        self.logic = logic;
        self
    }

    #[must_use]
    pub fn condition(mut self, node: ConditionNode) -> Self {
        self.conditions.push(node);
        self
    }

    #[must_use]
    pub fn find(&self, id: &ConditionId) -> Option<&ConditionNode> {
        self.conditions.iter().find(|node| &node.id == id)
    }

    /// Whether the block should render in `ctx`. See [`crate::evaluate()`].
    #[must_use]
    pub fn evaluate(&self, ctx: &EvaluationContext) -> bool {
        crate::evaluate::evaluate(self, ctx)
    }

    /// Evaluate with per-condition diagnostics.
    pub fn evaluate_detailed(&self, ctx: &EvaluationContext) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(self, ctx)
    }

    /// Check that condition ids are unique.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DuplicateId`] naming the first repeated id.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(self.conditions.len());
        for node in &self.conditions {
            if !seen.insert(&node.id) {
                return Err(DocumentError::DuplicateId {
                    id: node.id.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Read a document from its JSON attribute value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] if the input is not a document object.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }
}
