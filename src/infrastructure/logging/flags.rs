use clap::{ArgAction, Args, Parser};
use std::ffi::OsString;

/// Logging switches read from the process command line
///
/// Flatten into an application's own clap parser, or use
/// [`LogFlags::from_env`] to pick `--debug` out of an argument list that
/// belongs to someone else.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFlags {
    /// Lower the minimum level to debug
    #[arg(
        long,
        global = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false
    )]
    pub debug: bool,
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct FlagsOnly {
    #[command(flatten)]
    flags: LogFlags,
}

impl LogFlags {
    /// Read the flags from `std::env::args_os`
    pub fn from_env() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Read the flags from an argument list whose first item is the program name
    ///
    /// Arguments other than `--debug` are ignored. Both `-debug` and
    /// `--debug` are accepted, optionally with `=true` or `=false`. A value
    /// that is not a boolean leaves the flag unset.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args.next().unwrap_or_else(|| OsString::from("teelog"));

        let relevant = args.filter_map(|arg| {
            let text = arg.to_str()?;
            let rest = text
                .strip_prefix("--")
                .or_else(|| text.strip_prefix('-'))?;
            (rest == "debug" || rest.starts_with("debug="))
                .then(|| OsString::from(format!("--{rest}")))
        });

        FlagsOnly::try_parse_from(std::iter::once(program).chain(relevant))
            .map(|parsed| parsed.flags)
            .unwrap_or_default()
    }
}
