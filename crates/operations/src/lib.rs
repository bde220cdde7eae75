//! Typed catalogue of the remote operations the admin console issues.
//!
//! Each operation is a small struct implementing
//! [`convene_protocol::Operation`]: it names the root field, declares its
//! variables and selection, and fixes the type its payload decodes into.

pub mod agendas;
pub mod analytics;
pub mod attendees;
pub mod auth;
pub mod committees;
pub mod departments;
pub mod documents;
pub mod events;
pub mod models;
pub mod users;
pub mod venues;

pub use models::{
    Committee, CommitteeMember, Department, Event, EventAgenda, EventAttendee, EventDocument,
    JsonData, MutationOutcome, NoPayload, Nullable, NullableExt, Page, PageQuery, User, Venue,
};
