//! Metrics collection.
//!
//! # Metrics
//! - `camouflage_exchanges_total` (counter): exchanges by `outcome`
//! - `camouflage_stream_errors_total` (counter): bodies that failed mid-stream

/// How an exchange left the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No internal URL configured.
    Disabled,
    /// The request accepts none of the configured media types.
    Unacceptable,
    /// The public address could not be resolved.
    Unresolved,
    /// The external URL matched the ignore pattern.
    Ignored,
    /// Headers and/or body were rewritten.
    Rewritten,
    /// Intercepted but forwarded unchanged.
    Passthrough,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Disabled => "disabled",
            Outcome::Unacceptable => "unacceptable",
            Outcome::Unresolved => "unresolved",
            Outcome::Ignored => "ignored",
            Outcome::Rewritten => "rewritten",
            Outcome::Passthrough => "passthrough",
        }
    }
}

pub fn record_exchange(outcome: Outcome) {
    ::metrics::counter!("camouflage_exchanges_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_stream_error() {
    ::metrics::counter!("camouflage_stream_errors_total").increment(1);
}
