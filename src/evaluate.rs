use std::time::Instant;

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::parse::parse_date;
use crate::types::{NodeOutcome, Reason};
use crate::{
    ConditionKind, ConditionNode, ContentFacts, EvaluationContext, EvaluationReport, Logic,
    RuleDocument, Value,
};

/// Decide whether the block carrying `document` should render.
///
/// Never fails: malformed conditions degrade to their documented default
/// (`false` for known kinds, `true` for unknown kinds).
#[must_use]
pub fn evaluate(document: &RuleDocument, ctx: &EvaluationContext) -> bool {
    let now = ctx.current_time();
    let holds = |node: &ConditionNode| {
        let (raw, _) = check(node, ctx, now);
        raw != node.negate
    };
    let matched = match document.logic {
        Logic::All => document.conditions.iter().all(holds),
        Logic::Any => document.conditions.is_empty() || document.conditions.iter().any(holds),
    };
    document.action.decide(matched)
}

/// Evaluate one condition, negation applied.
#[must_use]
pub fn evaluate_node(node: &ConditionNode, ctx: &EvaluationContext) -> bool {
    let (raw, _) = check(node, ctx, ctx.current_time());
    raw != node.negate
}

/// Evaluate every condition and report each outcome.
pub fn evaluate_detailed(document: &RuleDocument, ctx: &EvaluationContext) -> EvaluationReport {
    let start = Instant::now();
    let now = ctx.current_time();

    let outcomes: Vec<NodeOutcome> = document
        .conditions
        .iter()
        .map(|node| {
            let (raw, reason) = check(node, ctx, now);
            let result = raw != node.negate;
            trace!(
                condition = %node.id,
                kind = %node.kind,
                raw,
                result,
                %reason,
                "condition evaluated"
            );
            NodeOutcome {
                id: node.id.clone(),
                kind: node.kind.tag().to_owned(),
                raw,
                result,
                reason,
            }
        })
        .collect();

    let matched = outcomes.is_empty()
        || match document.logic {
            Logic::All => outcomes.iter().all(|o| o.result),
            Logic::Any => outcomes.iter().any(|o| o.result),
        };

    EvaluationReport::new(document.action, outcomes, matched, start.elapsed())
}

/// Raw (un-negated) result of a condition and why. `now` is read once per
/// evaluation so every date condition sees the same instant.
fn check(node: &ConditionNode, ctx: &EvaluationContext, now: NaiveDateTime) -> (bool, Reason) {
    let outcome = match &node.kind {
        ConditionKind::UserLoggedIn => Ok(ctx.is_logged_in()),
        ConditionKind::UserNotLoggedIn => Ok(!ctx.is_logged_in()),
        ConditionKind::UserHasRole => {
            list_param(node, "roles").map(|roles| ctx.has_any_role(roles.as_slice()))
        }
        ConditionKind::PostId => post_id(node, ctx),
        ConditionKind::PostSlug => {
            let slug = str_param(node, "slug");
            slug.and_then(|slug| with_content(ctx, |content| content.slug == slug))
        }
        ConditionKind::PostHasTerm => post_has_term(node, ctx),
        ConditionKind::PostStatus => {
            let status = str_param(node, "status");
            status.and_then(|status| with_content(ctx, |content| content.status == status))
        }
        ConditionKind::CurrentDate => current_date(node, now),
        ConditionKind::UserFunction => str_param(node, "function")
            .and_then(|name| ctx.call_user_function(name).ok_or(Reason::UnresolvedFunction)),
        ConditionKind::QueryString => query_string(node, ctx),
        ConditionKind::Unknown(_) => Err(Reason::UnknownKind),
    };

    match outcome {
        Ok(raw) => (raw, Reason::Evaluated),
        Err(reason) => {
            let raw = reason == Reason::UnknownKind;
            debug!(
                condition = %node.id,
                kind = %node.kind,
                %reason,
                raw,
                "condition degraded to default"
            );
            (raw, reason)
        }
    }
}

fn post_id(node: &ConditionNode, ctx: &EvaluationContext) -> Result<bool, Reason> {
    let wanted = node
        .get_param("postId")
        .ok_or(Reason::MissingParam("postId"))?
        .as_i64()
        .ok_or(Reason::InvalidParam("postId"))?;
    with_content(ctx, |content| {
        u64::try_from(wanted).is_ok_and(|wanted| wanted == content.id)
    })
}

fn post_has_term(node: &ConditionNode, ctx: &EvaluationContext) -> Result<bool, Reason> {
    let taxonomy = str_param(node, "taxonomy")?;
    let terms = list_param(node, "terms")?;
    with_content(ctx, |content| {
        content
            .terms_in(taxonomy)
            .is_some_and(|assigned| terms.iter().any(|term| assigned.contains(term)))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateCompare {
    Before,
    After,
    SameDay,
}

fn date_compare(raw: &str) -> Option<DateCompare> {
    match raw {
        "before" => Some(DateCompare::Before),
        "after" => Some(DateCompare::After),
        "same day" | "same_day" | "same-day" => Some(DateCompare::SameDay),
        _ => None,
    }
}

fn current_date(node: &ConditionNode, now: NaiveDateTime) -> Result<bool, Reason> {
    let compare =
        date_compare(str_param(node, "compare")?).ok_or(Reason::InvalidParam("compare"))?;
    let date: NaiveDateTime =
        parse_date(str_param(node, "date")?).map_err(|_| Reason::InvalidParam("date"))?;
    Ok(match compare {
        DateCompare::Before => now < date,
        DateCompare::After => now > date,
        DateCompare::SameDay => now.date() == date.date(),
    })
}

fn query_string(node: &ConditionNode, ctx: &EvaluationContext) -> Result<bool, Reason> {
    let parameter = str_param(node, "parameter")?;
    // An empty expected value is legitimate (`?preview=`).
    let expected = match node.get_param("value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Int(i)) => i.to_string(),
        Some(_) => return Err(Reason::InvalidParam("value")),
        None => return Err(Reason::MissingParam("value")),
    };
    Ok(ctx.query_value(parameter) == Some(expected.as_str()))
}

fn str_param<'a>(node: &'a ConditionNode, key: &'static str) -> Result<&'a str, Reason> {
    node.get_param(key)
        .and_then(Value::as_str)
        .ok_or(Reason::MissingParam(key))
}

fn list_param(node: &ConditionNode, key: &'static str) -> Result<Vec<String>, Reason> {
    node.get_param(key)
        .and_then(Value::as_list)
        .filter(|items| !items.is_empty())
        .ok_or(Reason::MissingParam(key))
}

fn with_content(
    ctx: &EvaluationContext,
    f: impl FnOnce(&ContentFacts) -> bool,
) -> Result<bool, Reason> {
    ctx.content_facts().map(f).ok_or(Reason::NoContent)
}
