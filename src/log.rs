//! Crate-internal event routing.
//!
//! All diagnostics go through [`rail_event!`] so that builds without the
//! `tracing` feature compile the call sites away entirely.

/// Emits a `tracing` event at the given level when the `tracing` feature is on.
///
/// Arguments must not be the only use of a binding, otherwise builds without
/// the feature report it as unused.
macro_rules! rail_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::$level!(target: "check_rail", $($arg)+);
        }
    };
}
