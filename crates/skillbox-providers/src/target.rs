//! Picking the resource a command operates on.
//!
//! A service account sees its own calendar plus whatever users shared with
//! it. Commands want the shared user calendar, so anything owned by a
//! service identity is skipped.

/// Substring identifying service-account owned resources.
pub const SERVICE_IDENTITY_MARKER: &str = "gserviceaccount.com";

/// A resource a command could target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResource {
    /// Opaque provider identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

impl TargetResource {
    /// Creates a new target resource.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns true if this resource is shaped like a user's own resource:
    /// an email-like id that does not belong to a service identity.
    pub fn is_user_owned(&self) -> bool {
        !self.id.contains(SERVICE_IDENTITY_MARKER) && self.id.contains('@')
    }
}

/// Returns the id of the first user-owned resource, in input order.
pub fn select_target(resources: &[TargetResource]) -> Option<&str> {
    resources
        .iter()
        .find(|r| r.is_user_owned())
        .map(|r| r.id.as_str())
}
