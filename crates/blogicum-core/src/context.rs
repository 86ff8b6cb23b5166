//! Per-request context handed to every service call.

use chrono::{DateTime, Utc};

use crate::visibility::Viewer;

/// Identity of the requester and the instant the request is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub viewer: Viewer,
    pub now: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            now: Utc::now(),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(Viewer::Anonymous)
    }

    pub fn at(viewer: Viewer, now: DateTime<Utc>) -> Self {
        Self { viewer, now }
    }
}
