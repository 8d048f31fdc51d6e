//! The two places a host rendering pipeline consults the engine.

use tracing::trace;

use crate::{EvaluationContext, RuleDocument};

/// Where the block is being rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// A visitor-facing page.
    #[default]
    Live,
    /// An editor or preview screen. Content is never hidden there.
    Editor,
}

/// Whether a block carrying `document` (if any) should be rendered.
///
/// Blocks without a document, and every block in [`RenderMode::Editor`], render
/// without evaluation.
#[must_use]
pub fn should_render(
    document: Option<&RuleDocument>,
    ctx: &EvaluationContext,
    mode: RenderMode,
) -> bool {
    let Some(document) = document else {
        return true;
    };
    if mode == RenderMode::Editor {
        return true;
    }
    let render = document.evaluate(ctx);
    trace!(
        action = %document.action,
        conditions = document.conditions.len(),
        render,
        "block visibility decided"
    );
    render
}

/// The rendered markup of a block, or an empty string if it is hidden.
#[must_use]
pub fn filter_content<'a>(
    content: &'a str,
    document: Option<&RuleDocument>,
    ctx: &EvaluationContext,
    mode: RenderMode,
) -> &'a str {
    if should_render(document, ctx, mode) {
        content
    } else {
        ""
    }
}
