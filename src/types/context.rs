use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;

/// Resolver for `user_function` conditions.
///
/// Returns `None` when no function is registered under `name`.
pub trait UserFunctions: Send + Sync {
    fn call(&self, name: &str) -> Option<bool>;
}

type UserFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// A name → closure table implementing [`UserFunctions`].
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, UserFn>,
}

impl FunctionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn register(mut self, name: &str, f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.functions.insert(name.to_owned(), Arc::new(f));
        self
    }
}

impl UserFunctions for FunctionTable {
    fn call(&self, name: &str) -> Option<bool> {
        self.functions.get(name).map(|f| f())
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort_unstable();
        f.debug_struct("FunctionTable").field("functions", &names).finish()
    }
}

/// Facts about the content being rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFacts {
    pub id: u64,
    pub slug: String,
    pub status: String,
    pub terms: HashMap<String, HashSet<String>>,
}

impl ContentFacts {
    #[must_use]
    pub fn new(id: u64, slug: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            status: "publish".to_owned(),
            terms: HashMap::new(),
        }
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Assign a term slug from `taxonomy`.
    #[must_use]
    pub fn term(mut self, taxonomy: &str, slug: &str) -> Self {
        self.terms
            .entry(taxonomy.to_owned())
            .or_default()
            .insert(slug.to_owned());
        self
    }

    #[must_use]
    pub fn terms_in(&self, taxonomy: &str) -> Option<&HashSet<String>> {
        self.terms.get(taxonomy)
    }
}

/// Runtime facts a rule document is evaluated against.
///
/// Built by the host for each render. Evaluation only reads it.
///
/// ```
/// use block_conditions::{ContentFacts, EvaluationContext};
///
/// let ctx = EvaluationContext::new()
///     .logged_in(true)
///     .role("editor")
///     .content(ContentFacts::new(42, "about").term("category", "news"))
///     .query_param("ref", "newsletter");
/// assert!(ctx.is_logged_in());
/// ```
#[derive(Clone, Default)]
pub struct EvaluationContext {
    logged_in: bool,
    roles: HashSet<String>,
    content: Option<ContentFacts>,
    now: Option<NaiveDateTime>,
    query: HashMap<String, String>,
    functions: Option<Arc<dyn UserFunctions>>,
}

impl EvaluationContext {
    /// An anonymous visitor with no content, no query string and no functions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn logged_in(mut self, logged_in: bool) -> Self {
        self.logged_in = logged_in;
        self
    }

    #[must_use]
    pub fn role(mut self, role: &str) -> Self {
        self.roles.insert(role.to_owned());
        self
    }

    #[must_use]
    pub fn content(mut self, content: ContentFacts) -> Self {
        self.content = Some(content);
        self
    }

    /// Pin the evaluation clock. Without it the local wall clock is read.
    #[must_use]
    pub fn now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    #[must_use]
    pub fn query_param(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn functions(mut self, functions: Arc<dyn UserFunctions>) -> Self {
        self.functions = Some(functions);
        self
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    #[must_use]
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|r| self.roles.contains(r.as_ref()))
    }

    #[must_use]
    pub fn content_facts(&self) -> Option<&ContentFacts> {
        self.content.as_ref()
    }

    #[must_use]
    pub fn current_time(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| chrono::Local::now().naive_local())
    }

    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// `None` when no resolver is installed or it does not know `name`.
    #[must_use]
    pub fn call_user_function(&self, name: &str) -> Option<bool> {
        self.functions.as_ref()?.call(name)
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("logged_in", &self.logged_in)
            .field("roles", &self.roles)
            .field("content", &self.content)
            .field("now", &self.now)
            .field("query", &self.query)
            .field("functions", &self.functions.is_some())
            .finish()
    }
}
