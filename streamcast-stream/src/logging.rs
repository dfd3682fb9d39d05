// Conditional logging shim: forwards to `tracing` when the feature is
// enabled, compiles to nothing otherwise.

#[cfg(feature = "tracing")]
macro_rules! debug_event {
    ($($arg:tt)*) => {{
        tracing::debug!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_event {
    ($($arg:tt)*) => {{}};
}
