//! The notice channel.
//!
//! Each page collects user-facing messages here instead of failing the
//! request. Templates render pending notices in a blocking modal dialog.

use crate::api::ApiError;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Server failures show the server's own message; anything else shows the
/// error text.
impl From<&ApiError> for Notice {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Server { message, .. } => Self::error(message.clone()),
            ApiError::Network(_) | ApiError::Decode { .. } => Self::error(err.to_string()),
        }
    }
}

/// Notices raised during one request, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices(Vec<Notice>);

impl Notices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.0.push(notice);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notice::info(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notice::error(message));
    }

    /// Report a failed API call.
    pub fn api_error(&mut self, err: &ApiError) {
        if err.is_transient() {
            tracing::warn!(error = %err, "Commerce API unreachable");
        } else {
            tracing::warn!(error = %err, status = ?err.status(), "Commerce API call failed");
        }
        self.push(Notice::from(err));
    }

    /// Fold another channel into this one.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Notice::is_error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Notice] {
        &self.0
    }
}

impl From<Notice> for Notices {
    fn from(notice: Notice) -> Self {
        Self(vec![notice])
    }
}
