//! Query and mutation layer for the kitchen records.
//!
//! Handlers talk to the database only through [`Query`], [`Mutation`] and
//! [`Auth`]; forms in [`form`] carry the writable fields of each entity.

pub mod auth;
pub mod error;
pub mod form;
pub mod policy;
pub mod validation;

mod mutation;
mod query;

pub use auth::Auth;
pub use error::{FieldErrors, ServiceError};
pub use mutation::*;
pub use query::*;

pub use sea_orm;
