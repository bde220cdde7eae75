//! Operation gateway: the single chokepoint for every remote call the
//! console makes.
//!
//! A call renders one [`OperationDescriptor`] into a GraphQL document,
//! attaches `Authorization: Bearer <token>` when the credential source has a
//! token, sends one POST, and hands back either the decoded root field or an
//! [`Error`]. Nothing is retried and nothing panics past this boundary.

pub mod bearer;
pub mod error;
pub mod gateway;
pub mod transport;

pub use {
    bearer::{Anonymous, BearerSource, StaticBearer},
    convene_protocol::{Operation, OperationDescriptor, OperationKind},
    error::{Error, Error as TransportError, Result},
    gateway::{OperationGateway, OperationResult},
    transport::{HttpTransport, Transport},
};
