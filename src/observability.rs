//! Structured debug metrics for the decoder.
//!
//! `log_metric!` renders its key/value pairs as a flat JSON-ish object and emits
//! it through `log::debug!` under the `npz_bundle::metric` target, so hosts can
//! filter metrics independently of ordinary diagnostics. In release builds the
//! macro expands to nothing.

/// Logs a structured key-value metric at debug level, only in debug builds.
///
/// # Example
/// ```
/// use npz_bundle::log_metric;
/// let arrays = 3;
/// log_metric!("event" = "decode_bundle", "arrays" = &arrays);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            log::debug!(target: "npz_bundle::metric", "NPZ_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
