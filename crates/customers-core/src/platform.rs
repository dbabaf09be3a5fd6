//! Platform services consumed by the core.
//!
//! The host application supplies these; the core only asks questions.

/// Probes for device capabilities used by the contact actions.
pub trait CapabilityService: Send + Sync {
    fn can_make_calls(&self) -> bool;
    fn can_send_messages(&self) -> bool;
    fn can_send_email(&self) -> bool;
}

/// Reports every capability as available.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullCapabilities;

impl CapabilityService for FullCapabilities {
    fn can_make_calls(&self) -> bool {
        true
    }

    fn can_send_messages(&self) -> bool {
        true
    }

    fn can_send_email(&self) -> bool {
        true
    }
}

/// Locale-aware text services.
pub trait Localization: Send + Sync {
    /// Converts `value` to title case under the current locale.
    fn to_title_case(&self, value: &str) -> String;
}
