//! Clip id generation for copied, pasted, split and merged clips.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static SPLIT_COUNTER: AtomicU64 = AtomicU64::new(0);
static MERGE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Last six digits of the current millisecond timestamp.
fn short_stamp() -> String {
    format!("{:06}", now_millis() % 1_000_000)
}

fn random_suffix() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    simple[..5].to_string()
}

/// `<id>_<tag>_<millis>_<rand5>`, regenerated until it is not in `taken`.
pub fn derived_id(original: &str, tag: &str, taken: &HashSet<String>) -> String {
    loop {
        let id = format!("{}_{}_{}_{}", original, tag, now_millis(), random_suffix());
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// `<id>_split_<part>_<stamp>_<counter>`
pub fn split_id(original: &str, part: usize) -> String {
    let counter = SPLIT_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{}_split_{}_{}_{}", original, part, short_stamp(), counter)
}

/// `merged_<stamp>_<counter>`
pub fn merged_id() -> String {
    let counter = MERGE_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("merged_{}_{}", short_stamp(), counter)
}
