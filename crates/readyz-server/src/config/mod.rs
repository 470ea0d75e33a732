//! Command-line configuration.
//!
//! The only knob is the readiness delay. The flag keeps its single-dash
//! spelling (`-delay-ready 5`, `-delay-ready=5`); those forms are rewritten to
//! clap's `--long` form before parsing.

use std::ffi::OsString;
use std::time::Duration;

use clap::Parser;

/// Fixed listen address. The port is not configurable.
pub const LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Long flags that may also be written with a single dash.
const SINGLE_DASH_LONG: [&str; 2] = ["delay-ready", "help"];

#[derive(Debug, Parser)]
#[command(name = "readyz-server", about = "HTTP test server with a delayed readiness probe")]
pub struct ServerArgs {
    /// Seconds after start before /readyz reports ready
    #[arg(long = "delay-ready", default_value_t = 0, allow_negative_numbers = true)]
    pub delay_ready: i64,
}

impl ServerArgs {
    /// Parse process arguments; exits with usage on error.
    pub fn from_env() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn try_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn into_config(self) -> ServerConfig {
        // Negative delays behave like zero: always ready.
        let secs = u64::try_from(self.delay_ready).unwrap_or(0);
        ServerConfig {
            delay: Duration::from_secs(secs),
        }
    }
}

/// Immutable runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerConfig {
    /// Time after start before `/readyz` reports ready.
    pub delay: Duration,
}

/// Rewrite `-name` / `-name=value` into `--name` / `--name=value` for known
/// long flags. The program name, values and everything after `--` are kept.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        out.push(match arg.to_str() {
            Some(s) if is_single_dash_long(s) => OsString::from(format!("-{s}")),
            _ => arg,
        });
    }
    out
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    SINGLE_DASH_LONG.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(v: Vec<OsString>) -> Vec<String> {
        v.into_iter().map(|s| s.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn rewrites_single_dash_long_flags() {
        let got = strs(normalize_args(["bin", "-delay-ready", "5"]));
        assert_eq!(got, vec!["bin", "--delay-ready", "5"]);

        let got = strs(normalize_args(["bin", "-delay-ready=7"]));
        assert_eq!(got, vec!["bin", "--delay-ready=7"]);

        let got = strs(normalize_args(["bin", "-help"]));
        assert_eq!(got, vec!["bin", "--help"]);
    }

    #[test]
    fn leaves_values_and_double_dash_alone() {
        let got = strs(normalize_args(["bin", "--delay-ready", "-3"]));
        assert_eq!(got, vec!["bin", "--delay-ready", "-3"]);

        let got = strs(normalize_args(["-delay-ready", "--", "-delay-ready"]));
        assert_eq!(got, vec!["-delay-ready", "--", "-delay-ready"]);

        let got = strs(normalize_args(["bin", "-h", "-x"]));
        assert_eq!(got, vec!["bin", "-h", "-x"]);
    }
}
