use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Defaults applied when the matching CLI flag is not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Leading arguments to skip (default: 0).
    #[serde(default)]
    pub skip: u32,
    /// Replace NUL separators with spaces (default: false).
    #[serde(default)]
    pub nuls: bool,
    /// Output format: "raw", "lines" or "json" (default: "raw").
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    OutputFormat::Raw.as_str().to_string()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            skip: 0,
            nuls: false,
            format: default_format(),
        }
    }
}

/// How retrieved arguments are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Argument bytes exactly as retrieved.
    Raw,
    /// One argument per line.
    Lines,
    /// A JSON array of arguments.
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Lines => "lines",
            OutputFormat::Json => "json",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "raw" => Some(OutputFormat::Raw),
            "lines" => Some(OutputFormat::Lines),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

impl Defaults {
    /// Parsed output format. Only meaningful after validation.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::parse(&self.format).unwrap_or(OutputFormat::Raw)
    }
}
