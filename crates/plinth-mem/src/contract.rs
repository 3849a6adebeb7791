//! Fail-fast contract checks.
//!
//! [`ensure!`](crate::ensure) guards internal invariants and caller
//! obligations that have no recoverable path (a bad slot index, a broken
//! bucket chain, a capacity below the live count). Checks run when
//! `debug_assertions` is on or the `contracts` feature is enabled, and compile
//! to nothing otherwise. A violated contract is logged at error level and then
//! panics.
//!
//! Public operations that callers are expected to get wrong at runtime (such
//! as [`DynArray::at`](crate::DynArray::at)) return [`Error`](crate::Error)
//! instead.

/// Whether contract checks are compiled in.
pub const ENABLED: bool = cfg!(any(debug_assertions, feature = "contracts"));

/// Checks a contract, panicking with a message if it does not hold.
///
/// ```should_panic
/// use plinth_mem::ensure;
///
/// let count = 3;
/// let capacity = 2;
/// ensure!(count <= capacity, "count {} exceeds capacity {}", count, capacity);
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr $(,)?) => {
        if $crate::contract::ENABLED && !($cond) {
            $crate::contract::violated(stringify!($cond), format_args!(""));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if $crate::contract::ENABLED && !($cond) {
            $crate::contract::violated(stringify!($cond), format_args!($($arg)+));
        }
    };
}

#[doc(hidden)]
#[cold]
#[inline(never)]
#[track_caller]
pub fn violated(condition: &str, message: std::fmt::Arguments<'_>) -> ! {
    let location = std::panic::Location::caller();
    plinth_log::error!("contract `{condition}` violated at {location}: {message}");
    panic!("contract violated: `{condition}` {message}");
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_holding_contract_is_silent() {
        ensure!(1 + 1 == 2);
        ensure!(true, "never printed {}", 42);
    }

    #[test]
    #[cfg_attr(not(any(debug_assertions, feature = "contracts")), ignore)]
    #[should_panic(expected = "contract violated")]
    fn test_violation_panics() {
        let len = 4;
        ensure!(len < 2, "len was {}", len);
    }
}
