mod app;
mod calendar;
mod format;
mod help;
mod home;
mod jumpto;
mod theme;
mod weekend;
use crate::app::App;
use crate::calendar::{MonthGridCalculator, SystemClock};
use crate::format::Locale;
use crate::home::WidgetFamily;
use anyhow::Context;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::{DefaultTerminal, TerminalOptions, Viewport};
use std::path::{Path, PathBuf};
use time::{format_description::FormatItem, macros::format_description, Date, UtcOffset};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

static HELP: &str = "\
Usage: moncal [OPTIONS] [YYYY-MM-DD]

Terminal month calendar with a daily-refreshing calendar widget

Options:
  -l, --locale <LOCALE>   Label dates in the given locale: \"en\" (English,
                          the default) or \"ko\" (Korean)
  -w, --widget <SIZE>     Draw the \"small\", \"medium\", or \"large\" home
                          widget below the prompt instead of running
                          the interactive calendar
      --watch             Keep the widget up to date, redrawing it at
                          midnight, until q is pressed
      --log-file <PATH>   Write log messages to the given file
  -h, --help              Display this help message and exit
  -V, --version           Show the program version and exit
";

const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    date: Option<Date>,
    locale: Locale,
    widget: Option<WidgetFamily>,
    watch: bool,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('l') | Arg::Long("locale") => {
                    opts.locale = parser.value()?.parse()?;
                }
                Arg::Short('w') | Arg::Long("widget") => {
                    opts.widget = Some(parser.value()?.parse()?);
                }
                Arg::Long("watch") => opts.watch = true,
                Arg::Long("log-file") => opts.log_file = Some(parser.value()?.into()),
                Arg::Value(value) if opts.date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => opts.date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        if opts.watch && opts.widget.is_none() {
            return Err(lexopt::Error::Custom("--watch requires --widget".into()));
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                // The local offset must be determined before any other threads
                // (e.g., the logger's) are started.
                let offset = UtcOffset::current_local_offset()
                    .context("failed to determine local time zone offset")?;
                let _logger = init_logging(opts.log_file.as_deref())?;
                let mut calculator = MonthGridCalculator::new(SystemClock, offset);
                let today = calculator.today();
                log::info!("Starting up; today is {today}, UTC offset is {offset}");
                if let Some(family) = opts.widget {
                    let options = TerminalOptions {
                        viewport: Viewport::Inline(family.height()),
                    };
                    with_terminal(ratatui::init_with_options(options), |mut terminal| {
                        home::show(
                            &mut terminal,
                            family,
                            &mut calculator,
                            &opts.locale,
                            opts.watch,
                        )
                    })?;
                    println!();
                    Ok(())
                } else {
                    with_terminal(ratatui::init(), |mut terminal| {
                        terminal.hide_cursor().context("failed to hide cursor")?;
                        App::new(calculator, opts.locale, opts.date.unwrap_or(today))
                            .run(&mut terminal)?;
                        Ok(())
                    })
                }
            }
            Command::Help => {
                print!("{HELP}");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

// Logging is only enabled when a log file is given, as writing log messages
// to the terminal would garble the display.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<Option<LoggerHandle>> {
    let Some(path) = log_file else {
        return Ok(None);
    };
    let handle = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)
        .context("invalid log specification")?
        .log_to_file(FileSpec::try_from(path).context("invalid log file path")?)
        .start()
        .context("failed to start logger")?;
    Ok(Some(handle))
}

fn with_terminal<F, T>(terminal: DefaultTerminal, func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("moncal").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(Options::default()));
    }

    #[test]
    fn test_full_options() {
        assert_eq!(
            parse(&[
                "--locale",
                "ko",
                "-w",
                "medium",
                "--watch",
                "--log-file",
                "moncal.log",
                "2025-01-22",
            ])
            .unwrap(),
            Command::Run(Options {
                date: Some(date!(2025 - 01 - 22)),
                locale: Locale::Korean,
                widget: Some(WidgetFamily::Medium),
                watch: true,
                log_file: Some(PathBuf::from("moncal.log")),
            })
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["-h"]).unwrap(), Command::Help);
        assert_eq!(parse(&["2025-01-22", "--version"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_default_locale_is_documented() {
        assert_eq!(Options::default().locale, Locale::English);
        assert!(HELP.contains("\"en\" (English,\n                          the default)"));
    }

    #[test]
    fn test_bad_args() {
        assert!(parse(&["2025-13-01"]).is_err());
        assert!(parse(&["--locale", "fr"]).is_err());
        assert!(parse(&["--widget", "huge"]).is_err());
        assert!(parse(&["--watch"]).is_err());
        assert!(parse(&["2025-01-22", "2025-01-23"]).is_err());
    }
}
