use std::{ffi::OsStr, fmt};

/// Prompt used when the command line yields nothing but whitespace.
pub const DEFAULT_PROMPT: &str = "Say hello!";

/// Text sent to the model, assembled from positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Joins `args` with single spaces and trims the result.
    ///
    /// Falls back to [`DEFAULT_PROMPT`] when nothing is left.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(" ");

        match joined.trim() {
            "" => Self(DEFAULT_PROMPT.to_string()),
            trimmed => Self(trimmed.to_string()),
        }
    }

    /// Like [`from_args`](Self::from_args) for raw OS arguments; invalid UTF-8 is
    /// replaced with U+FFFD.
    pub fn from_os_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self::from_args(
            args.into_iter()
                .map(|arg| arg.as_ref().to_string_lossy().into_owned()),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_arguments_with_spaces() {
        assert_eq!(Prompt::from_args(["Say", "hello!"]).as_str(), "Say hello!");
        assert_eq!(
            Prompt::from_args(["Write", "a", "haiku", "about", "Rust"]).as_str(),
            "Write a haiku about Rust"
        );
    }

    #[test]
    fn test_trims_only_the_ends() {
        assert_eq!(
            Prompt::from_args(["  leading", "inner  gap", "trailing  "]).as_str(),
            "leading inner  gap trailing"
        );
    }

    #[test]
    fn test_defaults_when_empty() {
        assert_eq!(Prompt::from_args(Vec::<String>::new()).as_str(), DEFAULT_PROMPT);
        assert_eq!(Prompt::from_args(["  "]).as_str(), DEFAULT_PROMPT);
        assert_eq!(Prompt::from_args(["", "\t", "\n"]).as_str(), DEFAULT_PROMPT);
    }

    #[test]
    fn test_dash_arguments_are_text() {
        assert_eq!(
            Prompt::from_args(["--help", "-v"]).to_string(),
            "--help -v"
        );
        assert_eq!(Prompt::from_args(["--", "hi"]).as_str(), "-- hi");
        assert_eq!(Prompt::from_args(["a", "--", "b"]).as_str(), "a -- b");
    }

    #[test]
    fn test_os_args() {
        use std::ffi::OsString;

        assert_eq!(
            Prompt::from_os_args([OsString::from("Say"), OsString::from("hello!")]).as_str(),
            "Say hello!"
        );
        assert_eq!(
            Prompt::from_os_args(Vec::<OsString>::new()).as_str(),
            DEFAULT_PROMPT
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_os_args_invalid_utf8() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let prompt = Prompt::from_os_args([OsStr::from_bytes(b"caf\xff"), OsStr::new("au lait")]);
        assert_eq!(prompt.as_str(), "caf\u{FFFD} au lait");
    }
}
