//! Recoverable-error reporting.
//!
//! Parsers never abort on malformed input; they report what they skipped
//! through [`warn_once`] and carry on. Deduplication keeps a page full of the
//! same broken declaration from flooding the log.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a recoverable problem (logged once per unique message).
///
/// The component is used as the log target, so `RUST_LOG=css=off` silences
/// stylesheet recovery noise without touching the markup parser.
///
/// # Example
/// ```ignore
/// warn_once("css", "Expected ':' at index 12 but found: color red");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if record(component, message) {
        log::warn!(target: component, "{message}");
    }
}

/// Remember a warning; `true` the first time a message is seen.
fn record(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    // A poisoned lock only means another thread panicked mid-insert; the set
    // itself is still usable.
    WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key)
}

/// Forget every recorded warning (call when loading a new page).
pub fn clear_warnings() {
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_is_recorded() {
        assert!(record("test", "first occurrence"));
        assert!(!record("test", "first occurrence"));
        // Same text from another component is a separate warning.
        assert!(record("other", "first occurrence"));
    }

    #[test]
    fn test_warn_once_records_the_message() {
        warn_once("test", "repeated message");
        warn_once("test", "repeated message");
        assert!(!record("test", "repeated message"));
        assert!(warning_count() >= 1);
    }
}
