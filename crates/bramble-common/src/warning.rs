//! Engine warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML and CSS parsers to report input they had to recover from.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about recovered input (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("CSS", "dropped declaration at offset 12");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = warning_key(component, message);
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[Bramble {component}] ⚠ {message}").yellow());
    }
}

fn warning_key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Whether `message` has been reported for `component` since the last
/// [`clear_warnings`].
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&warning_key(component, message)))
}

/// Clear all recorded warnings.
///
/// The set is shared by the whole process, so only the owner of the process
/// (the command-line harness, a test) should call this.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_are_deduplicated_until_cleared() {
        clear_warnings();
        warn_once("Test", "first");
        warn_once("Test", "first");
        warn_once("Other", "first");
        assert_eq!(warning_count(), 2);

        clear_warnings();
        assert_eq!(warning_count(), 0);
        warn_once("Test", "first");
        assert_eq!(warning_count(), 1);
        assert!(has_warned("Test", "first"));
        assert!(!has_warned("Other", "first"));
    }
}
