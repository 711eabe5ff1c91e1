#![allow(unused_macros)]
//! Diagnostics emitted by the bridge about itself.
//!
//! **Note**: These macros (`bridge_debug!`, `bridge_info!`, `bridge_warn!` and `bridge_error!`)
//! report problems inside the bridge (stack overflow, out-of-order scope release, a failing host
//! logger). They are not meant for application logging. With the `internal-logs` feature they
//! become `tracing` events targeted at the calling crate; under `cfg(test)` they also print to
//! stdout so `--nocapture` runs show them.

#[doc(hidden)]
#[macro_export]
macro_rules! __bridge_internal {
    ($lvl:ident, name: $name:expr $(,)?) => {
        #[cfg(feature = "internal-logs")]
        {
            $crate::_private::$lvl!(name: $name, target: env!("CARGO_PKG_NAME"), name = $name);
        }

        #[cfg(test)]
        {
            print!("bridge_{}: name={}\n", stringify!($lvl), $name);
        }

        #[cfg(all(not(feature = "internal-logs"), not(test)))]
        {
            let _ = $name;
        }
    };
    ($lvl:ident, name: $name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        #[cfg(feature = "internal-logs")]
        {
            $crate::_private::$lvl!(
                name: $name,
                target: env!("CARGO_PKG_NAME"),
                name = $name,
                $($key = $value),+
            );
        }

        #[cfg(test)]
        {
            print!("bridge_{}: name={}", stringify!($lvl), $name);
            $(
                print!(", {}={}", stringify!($key), $value);
            )+
            print!("\n");
        }

        #[cfg(all(not(feature = "internal-logs"), not(test)))]
        {
            let _ = ($name, $($value),+);
        }
    };
}

/// Reports a debug-level diagnostic.
///
/// ```rust
/// use logbridge::bridge_debug;
/// bridge_debug!(name: "Scope.Suppressed", shape = "health-check");
/// ```
#[macro_export]
macro_rules! bridge_debug {
    ($($tt:tt)*) => { $crate::__bridge_internal!(debug, $($tt)*) };
}

/// Reports an info-level diagnostic.
#[macro_export]
macro_rules! bridge_info {
    ($($tt:tt)*) => { $crate::__bridge_internal!(info, $($tt)*) };
}

/// Reports a warning about bridge misuse that was tolerated.
///
/// ```rust
/// use logbridge::bridge_warn;
/// bridge_warn!(name: "Scope.OutOfOrderRelease", position = 3u16);
/// ```
#[macro_export]
macro_rules! bridge_warn {
    ($($tt:tt)*) => { $crate::__bridge_internal!(warn, $($tt)*) };
}

/// Reports a failure that caused a record to be lost.
#[macro_export]
macro_rules! bridge_error {
    ($($tt:tt)*) => { $crate::__bridge_internal!(error, $($tt)*) };
}
