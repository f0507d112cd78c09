//! Benchmark log parsing.
//!
//! The inference benchmark tool only reports through its log output, so
//! progress and results are scraped from free text. Parsing fails closed:
//! if anything required is missing or malformed the caller gets
//! [`CoreError::ParseIncomplete`], never a partially filled struct or a
//! made-up zero.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static TOTAL_PROMPTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"num_prompts=(\d+)").expect("valid regex"));

// Older tool versions log the misspelled `num_finised_requests`.
static FINISHED_REQUESTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"num_fini(?:sh|s)ed_requests:\s*(\d+)").expect("valid regex")
});

static ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"all_(\w+)=\[(.*?)\]").expect("valid regex"));

/// Arrays that must all be present for a result to parse.
pub const REQUIRED_ARRAYS: [&str; 10] = [
    "request_lens",
    "request_ids",
    "total_tokens",
    "prompt_lens",
    "response_lens",
    "e2e_latencies",
    "per_token_latencies",
    "inference_latencies",
    "waiting_latencies",
    "decode_token_latencies",
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BenchmarkProgress {
    pub current_progress: u64,
    pub total_prompts: u64,
    pub is_complete: bool,
}

/// A count as the benchmark tool logged it. Values written with a decimal
/// point are kept as floats, everything else is an integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LoggedNumber {
    Int(i64),
    Float(f64),
}

impl LoggedNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            LoggedNumber::Int(v) => v as f64,
            LoggedNumber::Float(v) => v,
        }
    }
}

/// Per-request metrics of a finished benchmark run. All arrays are indexed
/// by request in the order the tool logged them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub request_lens: Vec<LoggedNumber>,
    pub request_ids: Vec<String>,
    pub total_tokens: Vec<LoggedNumber>,
    pub prompt_lens: Vec<LoggedNumber>,
    pub response_lens: Vec<LoggedNumber>,
    pub e2e_latencies: Vec<f64>,
    pub per_token_latencies: Vec<f64>,
    pub inference_latencies: Vec<f64>,
    pub waiting_latencies: Vec<f64>,
    pub decode_token_latencies: Vec<f64>,
}

/// One benchmark invocation and its most recently fetched result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkHistory {
    pub benchmark_id: String,
    pub submitted_at: Timestamp,
    pub num_prompts: u64,
    pub qps: f64,
    pub result: Option<BenchmarkResult>,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Extract run progress from benchmark log text.
///
/// The most recent `num_finished_requests` line wins.
pub fn parse_progress(log_text: &str) -> Result<BenchmarkProgress, CoreError> {
    let total_prompts = TOTAL_PROMPTS_RE
        .captures(log_text)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .ok_or_else(|| CoreError::ParseIncomplete("benchmark log has no num_prompts".into()))?;

    let current_progress = FINISHED_REQUESTS_RE
        .captures_iter(log_text)
        .last()
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .ok_or_else(|| {
            CoreError::ParseIncomplete("benchmark log has no finished request count yet".into())
        })?;

    Ok(BenchmarkProgress {
        current_progress,
        total_prompts,
        is_complete: current_progress >= total_prompts,
    })
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Extract the per-request result arrays from benchmark log text.
pub fn parse_result(log_text: &str) -> Result<BenchmarkResult, CoreError> {
    let mut arrays: HashMap<&str, &str> = HashMap::new();
    for caps in ARRAY_RE.captures_iter(log_text) {
        let (Some(name), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        arrays.insert(name.as_str(), body.as_str());
    }

    let missing: Vec<&str> = REQUIRED_ARRAYS
        .iter()
        .copied()
        .filter(|name| !arrays.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::ParseIncomplete(format!(
            "benchmark log is missing arrays: {}",
            missing.join(", ")
        )));
    }

    let counts = |name: &str| parse_array(name, arrays[name], parse_count);
    let latencies = |name: &str| parse_array(name, arrays[name], parse_latency);

    Ok(BenchmarkResult {
        request_lens: counts("request_lens")?,
        request_ids: split_elements(arrays["request_ids"])
            .map(|v| v.trim_matches(|c| c == '\'' || c == '"').to_string())
            .collect(),
        total_tokens: counts("total_tokens")?,
        prompt_lens: counts("prompt_lens")?,
        response_lens: counts("response_lens")?,
        e2e_latencies: latencies("e2e_latencies")?,
        per_token_latencies: latencies("per_token_latencies")?,
        inference_latencies: latencies("inference_latencies")?,
        waiting_latencies: latencies("waiting_latencies")?,
        decode_token_latencies: latencies("decode_token_latencies")?,
    })
}

/// Split a logged list body on commas. `[]` yields no elements.
fn split_elements(body: &str) -> impl Iterator<Item = &str> {
    body.split(',').map(str::trim).filter(|v| !v.is_empty())
}

fn parse_array<T>(
    name: &str,
    body: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Vec<T>, CoreError> {
    split_elements(body)
        .map(|v| {
            parse(v).ok_or_else(|| {
                CoreError::ParseIncomplete(format!("malformed value '{v}' in all_{name}"))
            })
        })
        .collect()
}

fn parse_count(v: &str) -> Option<LoggedNumber> {
    if v.contains('.') {
        v.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(LoggedNumber::Float)
    } else {
        v.parse().ok().map(LoggedNumber::Int)
    }
}

fn parse_latency(v: &str) -> Option<f64> {
    v.parse::<f64>().ok().filter(|f| f.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
