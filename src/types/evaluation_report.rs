use std::fmt;
use std::time::Duration;

use super::condition::ConditionId;
use super::document::Action;

/// Why a condition produced its raw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// All required params were present and the check ran.
    Evaluated,
    /// A required param was absent or empty; the condition cannot match.
    MissingParam(&'static str),
    /// A param was present but could not be interpreted.
    InvalidParam(&'static str),
    /// The kind is not in the catalog; the condition matches.
    UnknownKind,
    /// The named user function is not registered; the condition cannot match.
    UnresolvedFunction,
    /// A post condition was evaluated outside of any post.
    NoContent,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Evaluated => f.write_str("evaluated"),
            Reason::MissingParam(key) => write!(f, "missing param '{key}'"),
            Reason::InvalidParam(key) => write!(f, "invalid param '{key}'"),
            Reason::UnknownKind => f.write_str("unknown kind"),
            Reason::UnresolvedFunction => f.write_str("unresolved function"),
            Reason::NoContent => f.write_str("no content"),
        }
    }
}

/// Result of one condition inside an [`EvaluationReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutcome {
    pub id: ConditionId,
    pub kind: String,
    /// Result before negation.
    pub raw: bool,
    /// Result after negation.
    pub result: bool,
    pub reason: Reason,
}

/// Detailed evaluation report returned by
/// [`evaluate_detailed()`](crate::evaluate_detailed).
///
/// Unlike [`evaluate()`](crate::evaluate) every condition is evaluated, so an
/// editor preview can show each outcome.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    action: Action,
    outcomes: Vec<NodeOutcome>,
    conditions_matched: bool,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        action: Action,
        outcomes: Vec<NodeOutcome>,
        conditions_matched: bool,
        duration: Duration,
    ) -> Self {
        Self {
            action,
            outcomes,
            conditions_matched,
            duration,
        }
    }

    /// Per-condition outcomes in document order.
    #[must_use]
    pub fn outcomes(&self) -> &[NodeOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn conditions_matched(&self) -> bool {
        self.conditions_matched
    }

    /// The final decision, same as [`evaluate()`](crate::evaluate).
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.action.decide(self.conditions_matched)
    }

    /// Outcomes that did not run their check normally.
    pub fn degraded(&self) -> impl Iterator<Item = &NodeOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.reason != Reason::Evaluated)
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: matched = {}, render = {}",
            self.action,
            self.conditions_matched,
            self.should_render()
        )?;
        let failed: Vec<&str> = self
            .outcomes
            .iter()
            .filter(|o| !o.result)
            .map(|o| o.id.as_str())
            .collect();
        write!(f, ", failed: [{}]", failed.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, result: bool, reason: Reason) -> NodeOutcome {
        NodeOutcome {
            id: ConditionId::new(id),
            kind: "post_id".into(),
            raw: result,
            result,
            reason,
        }
    }

    #[test]
    fn report_accessors() {
        let report = EvaluationReport::new(
            Action::Hide,
            vec![
                outcome("a", true, Reason::Evaluated),
                outcome("b", false, Reason::MissingParam("postId")),
            ],
            false,
            Duration::from_nanos(500),
        );

        assert!(!report.conditions_matched());
        assert!(report.should_render());
        assert_eq!(report.outcomes().len(), 2);
        assert_eq!(report.degraded().count(), 1);
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn report_display() {
        let report = EvaluationReport::new(
            Action::Show,
            vec![
                outcome("a", true, Reason::Evaluated),
                outcome("b", false, Reason::Evaluated),
            ],
            false,
            Duration::from_nanos(100),
        );
        let s = report.to_string();
        assert!(s.contains("show: matched = false, render = false"));
        assert!(s.contains("failed: [b]"));
    }

    #[test]
    fn reason_display() {
        assert_eq!(Reason::MissingParam("slug").to_string(), "missing param 'slug'");
        assert_eq!(Reason::UnknownKind.to_string(), "unknown kind");
    }
}
