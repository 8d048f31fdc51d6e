use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The closed set of condition kinds a rule document can reference.
///
/// Tags the catalog does not know are kept verbatim in [`ConditionKind::Unknown`]
/// so that documents written by a newer catalog survive a read/write cycle.
/// Build kinds from wire tags with [`ConditionKind::from_tag`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    UserLoggedIn,
    UserNotLoggedIn,
    UserHasRole,
    PostId,
    PostSlug,
    PostHasTerm,
    PostStatus,
    CurrentDate,
    UserFunction,
    QueryString,
    Unknown(UnknownTag),
}

/// A tag the catalog does not know. Only [`ConditionKind::from_tag`] creates
/// one, so it never shadows a known kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownTag(String);

impl UnknownTag {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Catalog entry shared by the evaluator and the authoring form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub tag: &'static str,
    pub label: &'static str,
    pub group: &'static str,
    pub description: &'static str,
    /// Whether a freshly added condition opens straight into its edit form.
    pub needs_config: bool,
    /// Form fields; their keys are the params the kind requires.
    pub fields: &'static [ParamField],
}

/// One input of a condition's parameter form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamField {
    pub key: &'static str,
    pub label: &'static str,
    pub help: &'static str,
    pub input: FieldInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    Number,
    Text,
    /// Free text split on commas into a list.
    CommaList,
    Date,
    Select {
        options: &'static [SelectOption],
        default: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const GROUP_USER: &str = "User Conditions";
pub const GROUP_POST: &str = "Post Conditions";
pub const GROUP_DATE: &str = "Date Conditions";
pub const GROUP_ADVANCED: &str = "Advanced";

pub(crate) const POST_STATUSES: &[SelectOption] = &[
    SelectOption { value: "publish", label: "Published" },
    SelectOption { value: "draft", label: "Draft" },
    SelectOption { value: "private", label: "Private" },
    SelectOption { value: "pending", label: "Pending" },
];

pub(crate) const DATE_COMPARES: &[SelectOption] = &[
    SelectOption { value: "before", label: "Before" },
    SelectOption { value: "after", label: "After" },
    SelectOption { value: "same day", label: "Same Day" },
];

const ROLE_FIELDS: &[ParamField] = &[ParamField {
    key: "roles",
    label: "User Roles",
    help: "Enter role names separated by commas (e.g., administrator, editor)",
    input: FieldInput::CommaList,
}];

const POST_ID_FIELDS: &[ParamField] = &[ParamField {
    key: "postId",
    label: "Post ID",
    help: "Enter the post ID number",
    input: FieldInput::Number,
}];

const SLUG_FIELDS: &[ParamField] = &[ParamField {
    key: "slug",
    label: "Post Slug",
    help: "Enter the post slug (URL name)",
    input: FieldInput::Text,
}];

const TERM_FIELDS: &[ParamField] = &[
    ParamField {
        key: "taxonomy",
        label: "Taxonomy",
        help: "Enter taxonomy name (e.g., category, post_tag)",
        input: FieldInput::Text,
    },
    ParamField {
        key: "terms",
        label: "Terms",
        help: "Enter term slugs separated by commas",
        input: FieldInput::CommaList,
    },
];

const STATUS_FIELDS: &[ParamField] = &[ParamField {
    key: "status",
    label: "Post Status",
    help: "Select the status the post must have",
    input: FieldInput::Select {
        options: POST_STATUSES,
        default: "publish",
    },
}];

const DATE_FIELDS: &[ParamField] = &[
    ParamField {
        key: "compare",
        label: "Compare",
        help: "How the current date relates to the given date",
        input: FieldInput::Select {
            options: DATE_COMPARES,
            default: "before",
        },
    },
    ParamField {
        key: "date",
        label: "Date",
        help: "Enter date in YYYY-MM-DD format",
        input: FieldInput::Date,
    },
];

const FUNCTION_FIELDS: &[ParamField] = &[ParamField {
    key: "function",
    label: "Function Name",
    help: "Enter the name of the registered function to call",
    input: FieldInput::Text,
}];

const QUERY_FIELDS: &[ParamField] = &[
    ParamField {
        key: "parameter",
        label: "Parameter Name",
        help: "Enter the query parameter name",
        input: FieldInput::Text,
    },
    ParamField {
        key: "value",
        label: "Parameter Value",
        help: "Enter the value to check for",
        input: FieldInput::Text,
    },
];

static KNOWN: [ConditionKind; 10] = [
    ConditionKind::UserLoggedIn,
    ConditionKind::UserNotLoggedIn,
    ConditionKind::UserHasRole,
    ConditionKind::PostId,
    ConditionKind::PostSlug,
    ConditionKind::PostHasTerm,
    ConditionKind::PostStatus,
    ConditionKind::CurrentDate,
    ConditionKind::UserFunction,
    ConditionKind::QueryString,
];

impl ConditionKind {
    /// All known kinds in catalog display order.
    #[must_use]
    pub fn known() -> &'static [ConditionKind] {
        &KNOWN
    }

    /// Resolve a wire tag. Never fails: unrecognized tags become
    /// [`ConditionKind::Unknown`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        KNOWN
            .iter()
            .find(|kind| kind.info().is_some_and(|info| info.tag == tag))
            .cloned()
            .unwrap_or_else(|| ConditionKind::Unknown(UnknownTag(tag.to_owned())))
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            ConditionKind::Unknown(tag) => tag.as_str(),
            known => known.info().map_or("", |info| info.tag),
        }
    }

    /// Catalog entry, or `None` for an unknown kind.
    #[must_use]
    pub fn info(&self) -> Option<&'static KindInfo> {
        let info = match self {
            ConditionKind::UserLoggedIn => &USER_LOGGED_IN,
            ConditionKind::UserNotLoggedIn => &USER_NOT_LOGGED_IN,
            ConditionKind::UserHasRole => &USER_HAS_ROLE,
            ConditionKind::PostId => &POST_ID,
            ConditionKind::PostSlug => &POST_SLUG,
            ConditionKind::PostHasTerm => &POST_HAS_TERM,
            ConditionKind::PostStatus => &POST_STATUS,
            ConditionKind::CurrentDate => &CURRENT_DATE,
            ConditionKind::UserFunction => &USER_FUNCTION,
            ConditionKind::QueryString => &QUERY_STRING,
            ConditionKind::Unknown(_) => return None,
        };
        Some(info)
    }

    /// Unknown kinds have no form to fill in.
    #[must_use]
    pub fn needs_config(&self) -> bool {
        self.info().is_some_and(|info| info.needs_config)
    }

    /// Form fields of the kind's parameter editor.
    #[must_use]
    pub fn fields(&self) -> &'static [ParamField] {
        self.info().map_or(&[][..], |info| info.fields)
    }

    /// Param keys the kind requires.
    pub fn required_params(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.fields().iter().map(|field| field.key)
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, ConditionKind::Unknown(_))
    }
}

static USER_LOGGED_IN: KindInfo = KindInfo {
    tag: "user_is_logged_in",
    label: "User Is Logged In",
    group: GROUP_USER,
    description: "Returns true if a user is logged in.",
    needs_config: false,
    fields: &[],
};

static USER_NOT_LOGGED_IN: KindInfo = KindInfo {
    tag: "user_is_not_logged_in",
    label: "User Is Not Logged In",
    group: GROUP_USER,
    description: "Returns true if a user is not logged in.",
    needs_config: false,
    fields: &[],
};

static USER_HAS_ROLE: KindInfo = KindInfo {
    tag: "user_has_role",
    label: "User Has Role",
    group: GROUP_USER,
    description: "Returns true if the user is assigned to any of the selected roles.",
    needs_config: true,
    fields: ROLE_FIELDS,
};

static POST_ID: KindInfo = KindInfo {
    tag: "post_id",
    label: "Check Post ID",
    group: GROUP_POST,
    description: "Returns true if the post has the specified ID.",
    needs_config: true,
    fields: POST_ID_FIELDS,
};

static POST_SLUG: KindInfo = KindInfo {
    tag: "post_slug",
    label: "Check Post Slug",
    group: GROUP_POST,
    description: "Returns true if the post has the specified slug.",
    needs_config: true,
    fields: SLUG_FIELDS,
};

static POST_HAS_TERM: KindInfo = KindInfo {
    tag: "post_has_term",
    label: "Post Has a Term",
    group: GROUP_POST,
    description: "Returns true if the post has the selected term(s) assigned.",
    needs_config: true,
    fields: TERM_FIELDS,
};

static POST_STATUS: KindInfo = KindInfo {
    tag: "post_status",
    label: "Check Post Status",
    group: GROUP_POST,
    description: "Returns true if post status matches the selected option.",
    needs_config: true,
    fields: STATUS_FIELDS,
};

static CURRENT_DATE: KindInfo = KindInfo {
    tag: "current_date",
    label: "Check The Date",
    group: GROUP_DATE,
    description: "Returns true if the current date matches the specified conditions.",
    needs_config: true,
    fields: DATE_FIELDS,
};

static USER_FUNCTION: KindInfo = KindInfo {
    tag: "user_function",
    label: "Check a User-Defined Function",
    group: GROUP_ADVANCED,
    description: "Returns the result of a user-defined function.",
    needs_config: true,
    fields: FUNCTION_FIELDS,
};

static QUERY_STRING: KindInfo = KindInfo {
    tag: "query_string",
    label: "Check a Query String Value",
    group: GROUP_ADVANCED,
    description: "Returns true if the specified query string parameter is matched.",
    needs_config: true,
    fields: QUERY_FIELDS,
};

/// Every known kind's catalog entry, in display order.
pub fn catalog() -> impl Iterator<Item = &'static KindInfo> {
    KNOWN.iter().filter_map(ConditionKind::info)
}

/// Catalog entries grouped for the "add condition" picker. Groups keep the
/// order in which they first appear in the catalog.
#[must_use]
pub fn catalog_by_group() -> Vec<(&'static str, Vec<&'static KindInfo>)> {
    let mut groups: Vec<(&'static str, Vec<&'static KindInfo>)> = Vec::new();
    for info in catalog() {
        match groups.iter_mut().find(|(group, _)| *group == info.group) {
            Some((_, entries)) => entries.push(info),
            None => groups.push((info.group, vec![info])),
        }
    }
    groups
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<&str> for ConditionKind {
    fn from(tag: &str) -> Self {
        ConditionKind::from_tag(tag)
    }
}

impl Serialize for ConditionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ConditionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ConditionKind::from_tag(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in ConditionKind::known() {
            assert_eq!(&ConditionKind::from_tag(kind.tag()), kind);
        }
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let kind = ConditionKind::from_tag("future_unreleased_kind");
        assert!(matches!(
            &kind,
            ConditionKind::Unknown(tag) if tag.as_str() == "future_unreleased_kind"
        ));
        assert_eq!(kind.tag(), "future_unreleased_kind");
        assert!(kind.info().is_none());
        assert!(!kind.needs_config());
        assert_eq!(kind.required_params().count(), 0);
    }

    #[test]
    fn known_tag_never_reads_as_unknown() {
        let kind = ConditionKind::from_tag("post_id");
        assert_eq!(kind, ConditionKind::PostId);
        assert!(kind.is_known());
        let json = serde_json::to_string(&kind).unwrap();
        let reread: ConditionKind = serde_json::from_str(&json).unwrap();
        assert_eq!(reread, kind);
    }

    #[test]
    fn login_kinds_are_self_contained() {
        assert!(!ConditionKind::UserLoggedIn.needs_config());
        assert!(!ConditionKind::UserNotLoggedIn.needs_config());
        assert!(ConditionKind::UserHasRole.needs_config());
        assert!(ConditionKind::PostId.needs_config());
    }

    #[test]
    fn required_params_follow_form_fields() {
        let params: Vec<_> = ConditionKind::PostHasTerm.required_params().collect();
        assert_eq!(params, vec!["taxonomy", "terms"]);
        let params: Vec<_> = ConditionKind::QueryString.required_params().collect();
        assert_eq!(params, vec!["parameter", "value"]);
        assert_eq!(ConditionKind::UserLoggedIn.required_params().count(), 0);
    }

    #[test]
    fn catalog_lists_every_known_kind_once() {
        let tags: Vec<_> = catalog().map(|info| info.tag).collect();
        assert_eq!(tags.len(), 10);
        let mut deduped = tags.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), tags.len());
    }

    #[test]
    fn groups_in_first_seen_order() {
        let groups: Vec<_> = catalog_by_group()
            .into_iter()
            .map(|(group, entries)| (group, entries.len()))
            .collect();
        assert_eq!(
            groups,
            vec![
                (GROUP_USER, 3),
                (GROUP_POST, 4),
                (GROUP_DATE, 1),
                (GROUP_ADVANCED, 2)
            ]
        );
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&ConditionKind::PostId).unwrap();
        assert_eq!(json, "\"post_id\"");
        let kind: ConditionKind = serde_json::from_str("\"query_string\"").unwrap();
        assert_eq!(kind, ConditionKind::QueryString);
    }
}
