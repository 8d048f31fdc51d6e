//! Editor-side state machine for authoring a [`RuleDocument`].
//!
//! A [`Session`] pairs a document snapshot with the set of conditions whose
//! parameter form is open. Every operation returns a new session and leaves
//! the receiver untouched, so a live preview holding the previous snapshot
//! never observes a half-applied edit. The open/closed state belongs to the
//! session only and is never written into the document.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::parse::parse_list;
use crate::{
    Action, AuthoringError, ConditionId, ConditionKind, ConditionNode, ConditionsError,
    FieldInput, Logic, ParamField, RuleDocument, Value,
};

/// Source of fresh condition ids.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> ConditionId;
}

/// Random v4 UUIDs, the default id source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> ConditionId {
        ConditionId::new(Uuid::new_v4().to_string())
    }
}

/// Whether a condition's parameter form is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Collapsed,
    Editing,
}

/// A set of changes to one condition.
///
/// ```
/// use block_conditions::{ConditionKind, ConditionPatch};
///
/// let patch = ConditionPatch::new()
///     .kind(ConditionKind::PostSlug)
///     .param("slug", "about")
///     .negate(true);
/// # let _ = patch;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct ConditionPatch {
    kind: Option<ConditionKind>,
    label: Option<Option<String>>,
    negate: Option<bool>,
    params: Vec<(String, Option<Value>)>,
}

impl ConditionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the condition to another kind. Switching drops every param the
    /// condition had before this patch.
    pub fn kind(mut self, kind: ConditionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Override the display label. A blank label clears the override.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = Some(Some(label).filter(|l| !l.trim().is_empty()));
        self
    }

    pub fn clear_label(mut self) -> Self {
        self.label = Some(None);
        self
    }

    pub fn negate(mut self, negate: bool) -> Self {
        self.negate = Some(negate);
        self
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.push((key.to_owned(), Some(value.into())));
        self
    }

    pub fn unset_param(mut self, key: &str) -> Self {
        self.params.push((key.to_owned(), None));
        self
    }

    /// Record raw form text typed into `field`, converted the way the field's
    /// input stores it. An empty or non-numeric number field unsets the param.
    pub fn input(self, field: &ParamField, raw: &str) -> Self {
        match field.input {
            FieldInput::Number => match raw.trim().parse::<i64>() {
                Ok(n) => self.param(field.key, n),
                Err(_) => self.unset_param(field.key),
            },
            FieldInput::CommaList => self.param(field.key, parse_list(raw)),
            FieldInput::Text | FieldInput::Date | FieldInput::Select { .. } => {
                self.param(field.key, raw)
            }
        }
    }

    fn apply(&self, node: &mut ConditionNode) {
        if let Some(kind) = &self.kind
            && *kind != node.kind
        {
            node.params.clear();
            node.kind = kind.clone();
        }
        if let Some(label) = &self.label {
            node.label.clone_from(label);
        }
        if let Some(negate) = self.negate {
            node.negate = negate;
        }
        for (key, value) in &self.params {
            match value {
                Some(value) => {
                    node.params.insert(key.clone(), value.clone());
                }
                None => {
                    node.params.remove(key);
                }
            }
        }
    }
}

/// An authoring session over one block's rule document.
#[derive(Clone)]
#[must_use]
pub struct Session {
    document: RuleDocument,
    editing: HashSet<ConditionId>,
    ids: Arc<dyn IdSource>,
}

impl Session {
    /// Start a session with random condition ids.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError::Document`] if `document` repeats a condition id.
    pub fn new(document: RuleDocument) -> Result<Self, AuthoringError> {
        Self::with_ids(document, Arc::new(UuidSource))
    }

    /// Start a session drawing new condition ids from `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError::Document`] if `document` repeats a condition id.
    pub fn with_ids(
        document: RuleDocument,
        ids: Arc<dyn IdSource>,
    ) -> Result<Self, AuthoringError> {
        document.validate()?;
        Ok(Self {
            document,
            editing: HashSet::new(),
            ids,
        })
    }

    /// Start a session from a stored JSON attribute value.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionsError`] if the JSON is malformed or repeats an id.
    pub fn from_json(json: &str) -> Result<Self, ConditionsError> {
        let document = RuleDocument::from_json(json)?;
        Ok(Self::new(document)?)
    }

    #[must_use]
    pub fn document(&self) -> &RuleDocument {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> RuleDocument {
        self.document
    }

    /// Edit state of a condition, or `None` if the document has no such id.
    #[must_use]
    pub fn state(&self, id: &ConditionId) -> Option<EditState> {
        self.document.find(id)?;
        Some(if self.editing.contains(id) {
            EditState::Editing
        } else {
            EditState::Collapsed
        })
    }

    /// Ids of conditions whose form is open, in document order.
    pub fn editing(&self) -> impl Iterator<Item = &ConditionId> {
        self.document
            .conditions
            .iter()
            .map(|node| &node.id)
            .filter(|id| self.editing.contains(*id))
    }

    /// Append a new condition of `kind`. Kinds that take parameters open in
    /// the editing state.
    pub fn add_condition(&self, kind: ConditionKind) -> (Self, ConditionId) {
        let id = self.fresh_id();
        let opens = kind.needs_config();
        debug!(condition = %id, kind = %kind, editing = opens, "condition added");

        let mut next = self.clone();
        next.document
            .conditions
            .push(ConditionNode::new(id.clone(), kind));
        if opens {
            next.editing.insert(id.clone());
        }
        (next, id)
    }

    /// Apply `patch` to the condition `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError::UnknownCondition`] if no condition has `id`.
    pub fn update_condition(
        &self,
        id: &ConditionId,
        patch: &ConditionPatch,
    ) -> Result<Self, AuthoringError> {
        let mut next = self.clone();
        let node = next
            .document
            .conditions
            .iter_mut()
            .find(|node| &node.id == id)
            .ok_or_else(|| unknown(id))?;
        patch.apply(node);
        debug!(condition = %id, kind = %node.kind, "condition updated");
        Ok(next)
    }

    /// Remove the condition `id`. Asking the user for confirmation is up to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError::UnknownCondition`] if no condition has `id`.
    pub fn delete_condition(&self, id: &ConditionId) -> Result<Self, AuthoringError> {
        self.document.find(id).ok_or_else(|| unknown(id))?;
        let mut next = self.clone();
        next.document.conditions.retain(|node| &node.id != id);
        next.editing.remove(id);
        debug!(condition = %id, "condition deleted");
        Ok(next)
    }

    /// Open the parameter form of condition `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError::UnknownCondition`] if no condition has `id`.
    pub fn begin_edit(&self, id: &ConditionId) -> Result<Self, AuthoringError> {
        self.document.find(id).ok_or_else(|| unknown(id))?;
        let mut next = self.clone();
        next.editing.insert(id.clone());
        Ok(next)
    }

    /// Close the parameter form of condition `id`. Params are not checked for
    /// completeness; closing an already closed form changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError::UnknownCondition`] if no condition has `id`.
    pub fn commit_edit(&self, id: &ConditionId) -> Result<Self, AuthoringError> {
        self.document.find(id).ok_or_else(|| unknown(id))?;
        let mut next = self.clone();
        next.editing.remove(id);
        Ok(next)
    }

    pub fn set_action(&self, action: Action) -> Self {
        let mut next = self.clone();
        next.document.action = action;
        next
    }

    pub fn set_logic(&self, logic: Logic) -> Self {
        let mut next = self.clone();
        next.document.logic = logic;
        next
    }

    /// A new id not yet used in the document. A colliding id from the source
    /// gets a numeric suffix.
    fn fresh_id(&self) -> ConditionId {
        let base = self.ids.next_id();
        if self.document.find(&base).is_none() {
            return base;
        }
        let mut suffix = 1_usize;
        loop {
            let candidate = ConditionId::new(format!("{base}-{suffix}"));
            if self.document.find(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }
}

fn unknown(id: &ConditionId) -> AuthoringError {
    AuthoringError::UnknownCondition { id: id.to_string() }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("document", &self.document)
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}
