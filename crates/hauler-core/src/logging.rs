#![forbid(unsafe_code)]

//! Internal logging shims.
//!
//! With the `tracing` feature enabled these forward to [`tracing`]; without
//! it they compile to nothing, so the engine carries no logging cost by
//! default.

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

pub(crate) use {debug, trace};
