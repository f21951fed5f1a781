//! Request-scoped context carrying the session document.
//!
//! A [`RequestContext`] may or may not have a document carrier
//! ([`ContextData`]), and a carrier may or may not hold a document. Both
//! absences are ordinary states queried explicitly; which of them is an
//! error depends on the caller.

use crate::document::Document;
use crate::errors::{Result, SessionError};
use crate::ids::RequestId;

/// The document-carrier slot of a context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextData {
    session: Option<Document>,
}

impl ContextData {
    /// A carrier already holding `doc`.
    pub fn with_session(doc: Document) -> Self {
        Self { session: Some(doc) }
    }

    /// The current document, if any.
    pub fn session(&self) -> Option<&Document> {
        self.session.as_ref()
    }

    /// Whether a document is attached.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Store `doc`, returning the previous document.
    pub fn replace_session(&mut self, doc: Document) -> Option<Document> {
        self.session.replace(doc)
    }
}

/// Context for one in-flight request.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Request identifier, used in log fields.
    pub id: RequestId,
    data: Option<ContextData>,
}

impl RequestContext {
    /// A context with an empty carrier.
    pub fn new() -> Self {
        Self {
            id: RequestId::new(),
            data: Some(ContextData::default()),
        }
    }

    /// A context whose carrier already holds `doc`.
    pub fn with_session(doc: Document) -> Self {
        Self {
            id: RequestId::new(),
            data: Some(ContextData::with_session(doc)),
        }
    }

    /// A context with no carrier at all.
    pub fn without_carrier() -> Self {
        Self {
            id: RequestId::new(),
            data: None,
        }
    }

    /// Replace the generated id.
    #[must_use]
    pub fn with_id(mut self, id: RequestId) -> Self {
        self.id = id;
        self
    }

    /// Whether a document carrier is present.
    pub fn has_carrier(&self) -> bool {
        self.data.is_some()
    }

    /// The carrier, if present.
    pub fn carrier(&self) -> Option<&ContextData> {
        self.data.as_ref()
    }

    /// Mutable carrier, if present.
    pub fn carrier_mut(&mut self) -> Option<&mut ContextData> {
        self.data.as_mut()
    }

    /// Mutable carrier, or `ContextUnavailable`.
    pub fn require_carrier_mut(&mut self) -> Result<&mut ContextData> {
        self.data.as_mut().ok_or(SessionError::ContextUnavailable)
    }

    /// The attached document, if there is a carrier holding one.
    pub fn session(&self) -> Option<&Document> {
        self.data.as_ref().and_then(ContextData::session)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn new_has_empty_carrier() {
        let ctx = RequestContext::new();
        assert!(ctx.has_carrier());
        assert!(ctx.session().is_none());
        assert!(!ctx.carrier().unwrap().has_session());
    }

    #[test]
    fn without_carrier_reports_unavailable() {
        let mut ctx = RequestContext::without_carrier();
        assert!(!ctx.has_carrier());
        assert!(ctx.session().is_none());
        assert_matches!(ctx.require_carrier_mut(), Err(SessionError::ContextUnavailable));
    }

    #[test]
    fn replace_returns_previous() {
        let doc = Document::try_from(json!({"a": 1})).unwrap();
        let mut ctx = RequestContext::new();
        let carrier = ctx.require_carrier_mut().unwrap();
        assert!(carrier.replace_session(doc.clone()).is_none());
        assert_eq!(ctx.session(), Some(&doc));

        let next = Document::try_from(json!({"b": 2})).unwrap();
        let previous = ctx.carrier_mut().unwrap().replace_session(next.clone());
        assert_eq!(previous, Some(doc));
        assert_eq!(ctx.session(), Some(&next));
    }

    #[test]
    fn with_session_and_id() {
        let doc = Document::try_from(json!({"user": "alice"})).unwrap();
        let ctx = RequestContext::with_session(doc.clone()).with_id(RequestId::from_raw("req_fixed"));
        assert_eq!(ctx.id.as_str(), "req_fixed");
        assert_eq!(ctx.session(), Some(&doc));
    }
}
