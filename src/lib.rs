//! Display-condition rules for content blocks.
//!
//! A [`RuleDocument`] attached to a block says whether to show or hide it and
//! under which conditions. [`evaluate()`] turns a document and an
//! [`EvaluationContext`] into a render decision; an [`authoring::Session`]
//! edits documents on the editor side. The [`catalog()`] of condition kinds is
//! shared by both.
//!
//! ```
//! use block_conditions::{Action, ConditionKind, ConditionNode, EvaluationContext, RuleDocument};
//!
//! let doc = RuleDocument::new(Action::Show)
//!     .condition(ConditionNode::new("c1", ConditionKind::UserLoggedIn));
//!
//! assert!(doc.evaluate(&EvaluationContext::new().logged_in(true)));
//! assert!(!doc.evaluate(&EvaluationContext::new()));
//! ```

pub mod authoring;
pub mod error;
mod evaluate;
pub mod parse;
pub mod render;
mod types;

pub use authoring::{ConditionPatch, EditState, IdSource, Session, UuidSource};
pub use error::ConditionsError;
pub use evaluate::{evaluate, evaluate_detailed, evaluate_node};
pub use render::{RenderMode, filter_content, should_render};
pub use types::{
    Action, AuthoringError, ConditionId, ConditionKind, ConditionNode, ContentFacts,
    DocumentError, EvaluationContext, EvaluationReport, FieldInput, FunctionTable, GROUP_ADVANCED,
    GROUP_DATE, GROUP_POST, GROUP_USER, KindInfo, Logic, NodeOutcome, ParamField, Params, Reason,
    RuleDocument, SelectOption, UnknownTag, UserFunctions, Value, catalog, catalog_by_group,
};
