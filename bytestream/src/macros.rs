//! Logging shims.
//!
//! These forward to the `log` crate when the `log` feature is enabled and
//! expand to nothing otherwise, so call sites never need their own `cfg`.

macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            log::trace!($($arg)*);
        }
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            log::debug!($($arg)*);
        }
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            log::warn!($($arg)*);
        }
    }};
}
