use clap::ValueEnum;

/// Console logging verbosity.
///
/// Level names follow the .NET logging levels users of `dotnet` tooling already know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Verbosity {
    #[value(name = "trace")]
    Trace,
    #[value(name = "debug")]
    Debug,
    #[default]
    #[value(name = "information")]
    Information,
    #[value(name = "warning")]
    Warning,
    #[value(name = "error")]
    Error,
    /// Same as `error`; tracing has no level above it
    #[value(name = "critical")]
    Critical,
    /// Disables console logging
    #[value(name = "none")]
    None,
}

impl Verbosity {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Information => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
            Self::None => "off",
        }
    }
}
