//! Domain events surfaced to the operator at the counter
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel { Success, Warning, Error }

/// Transient message shown to the operator, then dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self { Self { level: NoticeLevel::Success, message: message.into() } }
    pub fn warning(message: impl Into<String>) -> Self { Self { level: NoticeLevel::Warning, message: message.into() } }
    pub fn error(message: impl Into<String>) -> Self { Self { level: NoticeLevel::Error, message: message.into() } }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level { NoticeLevel::Success => "ok", NoticeLevel::Warning => "warn", NoticeLevel::Error => "error" };
        write!(f, "[{tag}] {}", self.message)
    }
}
