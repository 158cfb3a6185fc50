//! The process-wide destination of statistics.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// Where and how statistic lines are written; each line reads `{prefix} {name}={value}`.
pub struct StatisticOptions {
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl StatisticOptions {
    fn write_line(&mut self, line: impl Display) {
        let _ = writeln!(self.writer, "{line}");
    }
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .finish_non_exhaustive()
    }
}

static OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

fn with_options(action: impl FnOnce(&mut StatisticOptions)) {
    if let Some(Ok(mut options)) = OPTIONS.get().map(Mutex::lock) {
        action(&mut options);
    }
}

/// Enable statistic output. Only the first call has an effect.
///
/// Lines go to `writer`, or to stdout when it is `None`. Names are converted to `casing` when one
/// is given, and `postfix` is written once after a batch of statistics.
pub fn configure_statistic_logging(
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = OPTIONS.get_or_init(|| {
        Mutex::new(StatisticOptions {
            prefix,
            postfix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(std::io::stdout())),
        })
    });
}

pub fn log_statistic(name: impl Display, value: impl Display) {
    with_options(|options| {
        let name = match options.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        let prefix = options.prefix;
        options.write_line(format_args!("{prefix} {name}={value}"));
    });
}

pub fn log_statistic_postfix() {
    with_options(|options| {
        if let Some(postfix) = options.postfix {
            options.write_line(postfix);
        }
    });
}

pub fn should_log_statistics() -> bool {
    OPTIONS.get().is_some()
}
