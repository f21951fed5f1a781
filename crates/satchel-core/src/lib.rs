//! # satchel-core
//!
//! Session document model and the path-addressed operations over it.
//!
//! - **Document**: [`document::Document`], a persistent map/list/scalar tree with
//!   copy-on-write sharing
//! - **Paths**: [`path::KeyPath`] and the strict/creating navigator
//! - **Merge**: [`merge::merge`], maps merge recursively, everything else replaces
//! - **Operations**: [`ops::update`], [`ops::delete`], [`ops::list_append`],
//!   [`ops::list_delete`]; all pure, all return a new document
//! - **Context**: [`context::RequestContext`] carrying at most one document
//! - **Messages**: [`messages::MessageBatch`] for the outbound pipeline
//! - **Errors**: [`errors::SessionError`] taxonomy via `thiserror`
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by satchel-settings, satchel-hooks,
//! satchel-commands, and the binary.

#![deny(unsafe_code)]

pub mod context;
pub mod document;
pub mod errors;
pub mod ids;
pub mod logging;
pub mod merge;
pub mod messages;
pub mod ops;
pub mod path;

pub use context::{ContextData, RequestContext};
pub use document::{Document, Fields, Value};
pub use errors::{Result, SessionError};
pub use ids::RequestId;
pub use merge::merge;
pub use messages::{ContentPart, Message, MessageBatch, MessageContent};
pub use path::{KeyPath, Navigation};
