//! Counters kept by the engine and by propagators, and their output.
//!
//! Statistics are only written once [`configure_statistic_logging`] has been called.
mod statistic_logger;
mod statistic_logging;

use std::fmt::Display;
use std::fmt::Write;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::*;

/// A value which can be written through a [`StatisticLogger`].
///
/// See [`create_statistics_struct!`](crate::create_statistics_struct) for deriving it on a struct
/// of counters.
pub(crate) trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, mut statistic_logger: StatisticLogger) {
        let _ = write!(statistic_logger, "{self}");
    }
}

/// Generates a struct of counters which logs every field under its own name.
///
/// ```ignore
/// create_statistics_struct!(Statistics {
///     num_calls: usize
/// });
///
/// let statistics = Statistics::default();
/// assert_eq!(statistics.num_calls, 0);
/// ```
#[macro_export]
#[doc(hidden)]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ident),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone)]
        pub(crate) struct $name {
            $($(#[$variable_documentation])* pub(crate) $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $(self.$field.log(statistic_logger.attach_to_prefix(stringify!($field),)));+
            }
        }
    };
}
