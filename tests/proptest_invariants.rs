
use block_conditions::{Action, ConditionKind, ConditionNode, Logic, RuleDocument, evaluate};
use proptest::prelude::*;
use strategies::{arb_condition, arb_context, arb_document, arb_nonempty_document, inverted};

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn determinism(doc in arb_document(), ctx in arb_context()) {
        let first = evaluate(&doc, &ctx);
        for _ in 0..5 {
            prop_assert_eq!(first, evaluate(&doc, &ctx), "determinism violated on repeated evaluation");
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Empty documents follow the action
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn empty_document_follows_action(ctx in arb_context(), hide in any::<bool>()) {
        let action = if hide { Action::Hide } else { Action::Show };
        prop_assert_eq!(evaluate(&RuleDocument::new(action), &ctx), !hide);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Double inversion
//
// Flipping every negation and the action (and, with more than one node, the
// combinator) leaves the decision unchanged.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn double_inversion(doc in arb_nonempty_document(), ctx in arb_context()) {
        prop_assert_eq!(evaluate(&doc, &ctx), evaluate(&inverted(&doc), &ctx));
    }

    #[test]
    fn double_inversion_single_node(node in arb_condition(), ctx in arb_context(), hide in any::<bool>()) {
        let action = if hide { Action::Hide } else { Action::Show };
        let doc = RuleDocument::new(action).condition(node.clone());
        let flipped = RuleDocument::new(action.inverse()).condition(node.clone().negated(!node.negate));
        prop_assert_eq!(evaluate(&doc, &ctx), evaluate(&flipped, &ctx));
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Order independence
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn order_independence(
        (doc, order) in arb_document().prop_flat_map(|doc| {
            let n = doc.conditions.len();
            (Just(doc), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        }),
        ctx in arb_context(),
    ) {
        let mut permuted = doc.clone();
        permuted.conditions = order.iter().map(|&i| doc.conditions[i].clone()).collect();
        prop_assert_eq!(evaluate(&doc, &ctx), evaluate(&permuted, &ctx));
    }
}

// ---------------------------------------------------------------------------
// Invariant 5: Unknown kinds fail open
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn unknown_kind_is_neutral_under_and(doc in arb_document(), ctx in arb_context()) {
        let doc = doc.logic(Logic::All);
        let with_unknown = doc
            .clone()
            .condition(ConditionNode::new("unknown", ConditionKind::from_tag("future_unreleased_kind")));
        prop_assert_eq!(evaluate(&doc, &ctx), evaluate(&with_unknown, &ctx));
    }
}

// ---------------------------------------------------------------------------
// Invariant 6: Detailed report agrees with evaluate
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn detailed_matches_evaluate(doc in arb_document(), ctx in arb_context()) {
        let report = doc.evaluate_detailed(&ctx);
        prop_assert_eq!(report.should_render(), evaluate(&doc, &ctx));
        prop_assert_eq!(report.outcomes().len(), doc.conditions.len());
    }
}

// ---------------------------------------------------------------------------
// Invariant 7: JSON round trip preserves the decision
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn json_round_trip(doc in arb_document(), ctx in arb_context()) {
        let json = doc.to_json().unwrap();
        let back = RuleDocument::from_json(&json).unwrap();
        prop_assert_eq!(&back, &doc);
        prop_assert_eq!(evaluate(&back, &ctx), evaluate(&doc, &ctx));
    }
}
