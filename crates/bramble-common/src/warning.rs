//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the HTML tree builder to report recovered markup errors.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// When set, warnings are still deduplicated but never printed.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Warn about a recoverable problem (prints once per unique message).
///
/// # Example
/// ```
/// use bramble_common::warning::{has_warned, set_quiet, warn_once};
///
/// set_quiet(true);
/// warn_once("HTML Parser", "unmatched end tag </b>");
/// warn_once("HTML Parser", "unmatched end tag </b>");
/// assert!(has_warned("HTML Parser", "unmatched end tag </b>"));
/// ```
pub fn warn_once(component: &str, message: &str) {
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if first_time && !QUIET.load(Ordering::Relaxed) {
        eprintln!("{}", format!("[bramble {component}] ⚠ {message}").yellow());
    }
}

/// Whether [`warn_once`] has already seen this `component`/`message` pair.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Silence (or re-enable) stderr output of [`warn_once`].
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Clear all recorded warnings (call before parsing an unrelated document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
