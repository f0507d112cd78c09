//! Training task id generation.
//!
//! Ids are a UTC timestamp followed by a short random suffix, e.g.
//! `20261019143005k3Xq`. Sortable by submission second; the suffix keeps
//! ids submitted in the same second apart. No uniqueness check is made
//! against existing tasks.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Number of random alphanumeric characters appended to the timestamp.
pub const TASK_ID_SUFFIX_LENGTH: usize = 4;

/// `strftime` layout of the timestamp prefix.
const TASK_ID_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Generate a task id for a task submitted now.
pub fn generate_task_id() -> String {
    generate_task_id_at(Utc::now())
}

/// Generate a task id for a task submitted at `now`.
pub fn generate_task_id_at(now: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TASK_ID_SUFFIX_LENGTH)
        .map(char::from)
        .collect();

    format!("{}{suffix}", now.format(TASK_ID_TIME_FORMAT))
}
