#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// Backend base URL, overrides `TICKERMIND_API_URL`
    pub api: Option<String>,
    /// Poll interval in milliseconds, overrides `TICKERMIND_POLL_INTERVAL_MS`
    pub interval: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Doctor(Args),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: i32,
    pub message: String,
}

impl ParseError {
    fn usage(message: String) -> Self {
        Self {
            code: 2,
            message: format!("{message}\n\n{}", help_text("tickermind")),
        }
    }
}

#[must_use]
pub fn help_text(bin_name: &str) -> String {
    format!(
        "TickerMind stock screener\n\nUsage:\n  {bin_name} [options]\n  {bin_name} doctor [options]\n\nOptions:\n  -h, --help            Show this help\n  -V, --version         Show version\n      --api <url>       Backend base URL (default http://localhost:8000)\n      --interval <ms>   Stock poll interval in milliseconds (default 1000)\n\nCommands:\n  doctor                Check terminal, configuration and backend reachability\n"
    )
}

#[must_use]
pub fn version_text() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub fn parse_args<I, S>(args: I) -> Result<Command, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = Args::default();
    let mut show_help = false;
    let mut show_version = false;
    let mut doctor = false;

    let mut args = args.into_iter().map(Into::into);
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        match flag.as_str() {
            "-h" | "--help" => show_help = true,
            "-V" | "--version" => show_version = true,
            "--api" | "--interval" => {
                let Some(value) = inline.or_else(|| args.next()) else {
                    return Err(ParseError::usage(format!("Missing value for {flag}")));
                };
                if flag == "--api" {
                    parsed.api = Some(value);
                } else {
                    parsed.interval = Some(value);
                }
            }
            "doctor" if !doctor => doctor = true,
            _ if arg.starts_with('-') => {
                return Err(ParseError::usage(format!("Unknown option: {arg}")));
            }
            _ => {
                return Err(ParseError::usage(format!("Unexpected argument: {arg}")));
            }
        }
    }

    if show_help {
        return Ok(Command::Help);
    }

    if show_version {
        return Ok(Command::Version);
    }

    if doctor {
        return Ok(Command::Doctor(parsed));
    }

    Ok(Command::Run(parsed))
}

#[cfg(test)]
mod tests {
    use super::{parse_args, Args, Command};

    #[test]
    fn parses_default_run_command() {
        let result = parse_args(Vec::<String>::new());
        assert_eq!(result, Ok(Command::Run(Args::default())));
    }

    #[test]
    fn parses_help_command() {
        assert_eq!(parse_args(["--help"]), Ok(Command::Help));
        assert_eq!(parse_args(["doctor", "-h"]), Ok(Command::Help));
    }

    #[test]
    fn parses_version_command() {
        let result = parse_args(["-V"]);
        assert_eq!(result, Ok(Command::Version));
    }

    #[test]
    fn parses_overrides_in_both_forms() {
        let result = parse_args(["--api", "http://127.0.0.1:9000", "--interval=500"]);
        match result {
            Ok(Command::Run(args)) => {
                assert_eq!(args.api.as_deref(), Some("http://127.0.0.1:9000"));
                assert_eq!(args.interval.as_deref(), Some("500"));
            }
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn parses_doctor_with_flags() {
        let result = parse_args(["doctor", "--api", "https://example.com"]);
        assert_eq!(
            result,
            Ok(Command::Doctor(Args {
                api: Some("https://example.com".to_string()),
                interval: None,
            }))
        );
    }

    #[test]
    fn fails_on_missing_value() {
        let err = parse_args(["--interval"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.starts_with("Missing value for --interval"));
    }

    #[test]
    fn fails_on_unknown_option() {
        let err = parse_args(["--unknown"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("Unknown option"));
    }

    #[test]
    fn fails_on_positional_argument() {
        let err = parse_args(["abc"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("Unexpected argument: abc"));

        let err = parse_args(["doctor", "doctor"]).expect_err("expected parse error");
        assert!(err.message.contains("Unexpected argument: doctor"));
    }
}
