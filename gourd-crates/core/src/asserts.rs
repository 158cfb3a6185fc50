//! Assertions which are compiled in depending on how expensive they are.
//!
//! Release builds only check [`SIMPLE`] assertions; tests and the `debug-checks` feature also
//! check [`MODERATE`] ones.

pub const SIMPLE: u8 = 1;
pub const MODERATE: u8 = 2;

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const ENABLED_LEVEL: u8 = SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const ENABLED_LEVEL: u8 = MODERATE;

#[macro_export]
#[doc(hidden)]
macro_rules! gourd_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::ENABLED_LEVEL >= $crate::asserts::SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! gourd_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::ENABLED_LEVEL >= $crate::asserts::SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

/// Checks which cost more than the operation they guard, e.g. a scan over a tuple.
#[macro_export]
#[doc(hidden)]
macro_rules! gourd_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::ENABLED_LEVEL >= $crate::asserts::MODERATE {
            assert!($($arg)*);
        }
    };
}
