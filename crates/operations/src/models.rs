//! Client-side projections of the entities the console works with.
//!
//! Every field except `id` is [`Nullable`]: a projection only carries what the
//! operation's selection asked for, keeps an explicit `null` apart from an
//! absent field, and holds fields it does not declare in `extra`. A decoded
//! value re-encodes to the payload it came from.

use {
    convene_protocol::{Field, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    serde_with::rust::double_option,
};

/// Absent (`None`), sent as `null` (`Some(None)`) or set (`Some(Some(_))`).
pub type Nullable<T> = Option<Option<T>>;

/// Reading a [`Nullable`] field as a plain value.
pub trait NullableExt<T> {
    /// The value, when the field was sent and not `null`.
    fn value(&self) -> Option<&T>;

    fn is_null(&self) -> bool;
}

impl<T> NullableExt<T> for Nullable<T> {
    fn value(&self) -> Option<&T> {
        self.as_ref().and_then(Option::as_ref)
    }

    fn is_null(&self) -> bool {
        matches!(self, Some(None))
    }
}

/// `Some(Some(value))`.
pub fn present<T>(value: T) -> Nullable<T> {
    Some(Some(value))
}

// ── People ───────────────────────────────────────────────────────────────────

/// A console user. Also the identity snapshot cached after login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub email: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub phone: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub first_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub middle_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub last_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub avatar: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_staff: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_admin: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_active: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub created: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub updated: Nullable<String>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Fields cached as the authenticated identity after login.
    pub fn identity_selection() -> Selection {
        Self::me_selection().field("isActive")
    }

    /// Fields the `me` query asks for.
    pub fn me_selection() -> Selection {
        Selection::of(&[
            "id",
            "firstName",
            "middleName",
            "lastName",
            "email",
            "phone",
            "isStaff",
            "isAdmin",
        ])
    }

    /// Fields shown wherever a user appears inside another entity.
    pub fn summary_selection() -> Selection {
        Selection::of(&[
            "id",
            "email",
            "phone",
            "firstName",
            "middleName",
            "lastName",
            "avatar",
        ])
    }

    pub fn selection() -> Selection {
        Selection::of(&[
            "id",
            "email",
            "phone",
            "firstName",
            "middleName",
            "lastName",
            "avatar",
            "isActive",
            "created",
            "updated",
        ])
    }

    /// "First Middle Last", skipping missing or blank parts.
    pub fn display_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter_map(|part| part.value())
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin.value().copied().unwrap_or(false)
    }
}

// ── Organisation ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_active: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub created: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub updated: Nullable<String>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Department {
    pub fn selection() -> Selection {
        Selection::of(&["id", "name", "description", "created", "updated", "isActive"])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Committee {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_active: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub created: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub updated: Nullable<String>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Committee {
    pub fn selection() -> Selection {
        Selection::of(&["id", "name", "description", "created", "updated", "isActive"])
    }
}

/// Membership link between a committee and a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeMember {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub committee: Nullable<Committee>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub user: Nullable<User>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommitteeMember {
    pub fn selection() -> Selection {
        Selection::of(&["id"])
            .nested("committee", Selection::of(&["id"]))
            .nested("user", User::summary_selection())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub venue_type: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub capacity: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_active: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub created: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub updated: Nullable<String>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Venue {
    pub fn selection() -> Selection {
        Selection::of(&[
            "id",
            "name",
            "description",
            "venueType",
            "capacity",
            "created",
            "updated",
            "isActive",
        ])
    }
}

// ── Events ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub start_time: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub end_time: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_active: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub created: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub updated: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub author: Nullable<User>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub venue: Nullable<Venue>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Event fields without related entities.
    pub fn plain_selection() -> Selection {
        Selection::of(&[
            "id",
            "title",
            "description",
            "startTime",
            "endTime",
            "created",
            "updated",
            "isActive",
        ])
    }

    pub fn selection() -> Selection {
        Self::plain_selection()
            .nested("author", User::summary_selection())
            .nested("venue", Selection::of(&["id", "name"]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAgenda {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_active: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub created: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub updated: Nullable<String>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventAgenda {
    pub fn selection() -> Selection {
        Selection::of(&["id", "title", "description", "created", "updated", "isActive"])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub event: Nullable<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub attendee: Nullable<User>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_attending: Nullable<bool>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventAttendee {
    pub fn selection() -> Selection {
        Selection::of(&["id"])
            .nested("event", Selection::of(&["id"]))
            .nested("attendee", User::summary_selection())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub description: Nullable<String>,
    /// URL of the stored file as returned by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub file: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub is_active: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub created: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub updated: Nullable<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub event: Nullable<Event>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub author: Nullable<User>,
    /// Fields the projection does not declare, kept as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventDocument {
    pub fn selection() -> Selection {
        Selection::of(&[
            "id",
            "title",
            "description",
            "file",
            "created",
            "updated",
            "isActive",
        ])
    }
}

// ── Envelopes ────────────────────────────────────────────────────────────────

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub page: u64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub pages: Nullable<u64>,
    pub results: Vec<T>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            pages: None,
            results: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Search and paging arguments accepted by listing operations.
///
/// Only the parts that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub key: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            key: None,
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.key = (!key.trim().is_empty()).then_some(key);
        self
    }

    /// Append `key`, `page` and `pageSize` to `variables`.
    pub fn apply(&self, variables: Variables) -> Variables {
        variables
            .optional_if_some("key", "String", self.key.as_deref())
            .optional_if_some("page", "Int", self.page)
            .optional_if_some("pageSize", "Int", self.page_size)
    }
}

/// `{ total page pages results { .. } }`.
pub fn page_selection(results: Selection) -> Selection {
    Selection::of(&["total", "page", "pages"]).nested("results", results)
}

/// Empty payload for mutations that only report `success`/`message`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoPayload {}

/// Result of a mutation whose remote definition reports business-level
/// success.
///
/// `success: false` is an application-level rejection, not a failure of the
/// call; show `message` to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationOutcome<P = NoPayload> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub message: Nullable<String>,
    #[serde(flatten)]
    pub payload: P,
    /// Outcome fields outside `success`, `message` and the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `{ success message .. }` followed by the payload's own fields.
pub fn outcome_selection(payload: Selection) -> Selection {
    payload
        .fields()
        .iter()
        .fold(Selection::of(&["success", "message"]), |sel, field| match field {
            Field::Scalar(name) => sel.field(name.clone()),
            Field::Nested { name, selection } => sel.nested(name.clone(), selection.clone()),
        })
}

impl<P> MutationOutcome<P> {
    pub fn message(&self) -> Option<&str> {
        self.message.value().map(String::as_str)
    }

    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message().unwrap_or(fallback)
    }
}

/// `{ data }` wrapper for operations returning a free-form JSON scalar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonData<T = Value> {
    pub data: T,
}

/// `{ data }`.
pub fn data_selection() -> Selection {
    Selection::of(&["data"])
}
