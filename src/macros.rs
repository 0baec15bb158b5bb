#![allow(unused_macros)]

// Log macros used across the crate. They forward to `tracing` when the
// `tracing` feature is on and expand to nothing observable otherwise, so call
// sites must stick to plain format strings.

macro_rules! trace {
    ($($t:tt)*) => {
        emit!(trace, $($t)*)
    }
}

macro_rules! debug {
    ($($t:tt)*) => {
        emit!(debug, $($t)*)
    }
}

macro_rules! info {
    ($($t:tt)*) => {
        emit!(info, $($t)*)
    }
}

macro_rules! warn {
    ($($t:tt)*) => {
        emit!(warn, $($t)*)
    }
}

macro_rules! emit {
    ($level: ident, $($t:tt)*) => {{
        #[cfg(feature = "tracing")]
        { tracing::$level!(target: "rspackager_crypto", $($t)*) }
        // Keep the arguments type-checked and "used" without the feature.
        #[cfg(not(feature = "tracing"))]
        { if false { let _ = format_args!($($t)*); } }
    }}
}
