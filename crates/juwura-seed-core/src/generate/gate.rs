//! # Probability Gate
//!
//! Decides, per nullable or defaultable column instance, whether the row gets
//! a marker or the concrete value. One draw per call, always, so the stream
//! position never depends on the configured probability.

use crate::generate::value::Value;
use crate::random::SeededStream;

/// Token emitted when the gate fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `NULL`
    Null,
    /// `DEFAULT`, letting the column default apply.
    Default,
}

impl Marker {
    pub fn value(self) -> Value {
        match self {
            Marker::Null => Value::Null,
            Marker::Default => Value::Default,
        }
    }
}

/// Return `marker` with probability `p`, otherwise `value`.
pub fn gate(stream: &mut SeededStream, p: f64, marker: Marker, value: Value) -> Value {
    if stream.probability() < p {
        marker.value()
    } else {
        value
    }
}

/// `gate` with the `NULL` marker.
pub fn null_or(stream: &mut SeededStream, p: f64, value: Value) -> Value {
    gate(stream, p, Marker::Null, value)
}

/// `gate` with the `DEFAULT` marker.
pub fn default_or(stream: &mut SeededStream, p: f64, value: Value) -> Value {
    gate(stream, p, Marker::Default, value)
}
