mod condition;
mod context;
mod document;
mod error;
mod evaluation_report;
mod kind;
mod value;

pub use condition::{ConditionId, ConditionNode, Params};
pub use context::{ContentFacts, EvaluationContext, FunctionTable, UserFunctions};
pub use document::{Action, Logic, RuleDocument};
pub use error::{AuthoringError, DocumentError};
pub use evaluation_report::{EvaluationReport, NodeOutcome, Reason};
pub use kind::{
    ConditionKind, FieldInput, GROUP_ADVANCED, GROUP_DATE, GROUP_POST, GROUP_USER, KindInfo,
    ParamField, SelectOption, UnknownTag, catalog, catalog_by_group,
};
pub use value::Value;
