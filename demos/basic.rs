use block_conditions::{
    ContentFacts, EvaluationContext, RenderMode, RuleDocument, filter_content,
};
use tracing_subscriber::EnvFilter;

const ATTRIBUTE: &str = r#"{
    "action": "show",
    "conditions": [
        {"id": "members", "type": "user_is_logged_in", "negate": false},
        {"id": "news", "type": "post_has_term", "negate": false,
         "params": {"taxonomy": "category", "terms": ["news"]}},
        {"id": "beta", "type": "beta_flag", "negate": false}
    ]
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = RuleDocument::from_json(ATTRIBUTE).expect("failed to read rule document");
    let post = ContentFacts::new(12, "launch-day").term("category", "news");

    let visitor = EvaluationContext::new().content(post.clone());
    let member = EvaluationContext::new().logged_in(true).content(post);

    let block = "<div class=\"members-banner\">Welcome back!</div>";
    for (who, ctx) in [("visitor", &visitor), ("member", &member)] {
        let html = filter_content(block, Some(&doc), ctx, RenderMode::Live);
        println!("{who}: {:?}", html);
        println!("  {}", doc.evaluate_detailed(ctx));
    }

    // Editors always see the block.
    let html = filter_content(block, Some(&doc), &visitor, RenderMode::Editor);
    println!("editor preview: {html:?}");
}
