//! Single-slot feedback notification.

/// Severity of a feedback message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// The notification shown after an action. A new message replaces the
/// previous one; nothing is queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub visible: bool,
    pub message: String,
    pub severity: Severity,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            visible: false,
            message: String::new(),
            severity: Severity::Success,
        }
    }
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            visible: true,
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            visible: true,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.visible && self.severity == Severity::Error
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_hidden() {
        let feedback = Feedback::default();
        assert!(!feedback.visible);
        assert!(!feedback.is_error());
    }

    #[test]
    fn test_dismiss_keeps_message() {
        let mut feedback = Feedback::error("Request failed");
        assert!(feedback.is_error());
        feedback.dismiss();
        assert!(!feedback.visible);
        assert_eq!(feedback.message, "Request failed");
    }
}
