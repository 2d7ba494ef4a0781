//! Progress messages emitted by a worker.

use tracing::debug;

/// Progress value that marks a bounds-reset message instead of a status update.
pub const RESET_BOUNDS: i64 = -1;

/// Bounds applied when a reset payload cannot be used.
pub const DEFAULT_BOUNDS: (i64, i64) = (0, 100);

/// Separator between minimum and maximum in a bounds payload.
const BOUNDS_SEPARATOR: char = '|';

/// One progress message from the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressReport {
    /// Move the progress value and replace the status line.
    Status { value: i64, status: String },
    /// Replace the bounds from a `"<min>|<max>"` payload and rewind to zero.
    ResetBounds { payload: String },
}

impl ProgressReport {
    /// Decode a raw `(value, text)` pair.
    ///
    /// Non-negative values are status updates and [`RESET_BOUNDS`] carries a
    /// bounds payload. Any other negative value has no meaning and yields
    /// `None`.
    pub fn decode(value: i64, text: impl Into<String>) -> Option<Self> {
        match value {
            RESET_BOUNDS => Some(Self::ResetBounds {
                payload: text.into(),
            }),
            v if v >= 0 => Some(Self::Status {
                value: v,
                status: text.into(),
            }),
            _ => None,
        }
    }

    /// Build a bounds-reset message for `minimum..=maximum`.
    pub fn reset_bounds(minimum: u32, maximum: u32) -> Self {
        Self::ResetBounds {
            payload: format!("{}{}{}", minimum, BOUNDS_SEPARATOR, maximum),
        }
    }
}

/// Parse a `"<min>|<max>"` payload.
///
/// Returns `None` when either side is not an integer, either side is
/// negative, or `min > max`.
pub fn parse_bounds(payload: &str) -> Option<(i64, i64)> {
    let (min, max) = payload.split_once(BOUNDS_SEPARATOR)?;
    let min: i64 = min.trim().parse().ok()?;
    let max: i64 = max.trim().parse().ok()?;

    if min < 0 || max < 0 || min > max {
        return None;
    }
    Some((min, max))
}

/// Parse a bounds payload, falling back to [`DEFAULT_BOUNDS`].
pub fn bounds_or_default(payload: &str) -> (i64, i64) {
    parse_bounds(payload).unwrap_or_else(|| {
        debug!(payload = %payload, "Unusable bounds payload, using defaults");
        DEFAULT_BOUNDS
    })
}

/// Percent text for `value` within `minimum..=maximum`.
///
/// The span is `maximum - minimum + 1` so equal bounds never divide by zero.
/// It is computed in `f64`, so bounds near `i64::MAX` cannot overflow.
pub fn format_percent(value: i64, minimum: i64, maximum: i64) -> String {
    let span = (maximum as f64 - minimum as f64 + 1.0).max(1.0);
    let percent = (100.0 * value as f64 / span).round() as i64;
    format!("{}%", percent)
}
