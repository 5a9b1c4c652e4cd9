//! Command-line front end.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{Config, OutputFormat};
use crate::error::ArgvError;
use crate::options::{Pid, RetrievalOptions};
use crate::source::ArgumentSource;
use crate::Getargv;

/// Print the arguments of another process.
#[derive(Debug, Parser)]
#[command(name = "getargv", version, about)]
pub struct Cli {
    /// Process id whose arguments are printed
    pub pid: Pid,

    /// Number of leading arguments to skip
    #[arg(short = 's', long)]
    pub skip: Option<u32>,

    /// Convert NUL separators to spaces
    #[arg(short = '0', long)]
    pub nuls: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Read defaults from this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub options: RetrievalOptions,
    pub format: OutputFormat,
}

impl Cli {
    /// Merge flags over config defaults. Flags win.
    pub fn resolve(&self, config: &Config) -> Invocation {
        let defaults = &config.defaults;
        let options = RetrievalOptions::new(self.pid)
            .skip(self.skip.unwrap_or(defaults.skip))
            .substitute_terminators(self.nuls || defaults.nuls);
        Invocation {
            options,
            format: self.format.unwrap_or_else(|| defaults.output_format()),
        }
    }

    fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        };
        config.context("failed to load configuration")
    }
}

/// Produce the complete output for `invocation`.
///
/// Nothing is returned on failure, so callers never emit partial output.
pub fn render<S: ArgumentSource>(getargv: &Getargv<S>, invocation: &Invocation) -> Result<Vec<u8>> {
    let options = &invocation.options;
    let output = match invocation.format {
        OutputFormat::Raw => getargv.as_bytes_with(options)?,
        OutputFormat::Lines => {
            let mut output = Vec::new();
            for arg in skipped_list(getargv, options)? {
                output.extend_from_slice(arg.as_bytes());
                output.push(b'\n');
            }
            output
        }
        OutputFormat::Json => {
            let mut output = serde_json::to_vec(&skipped_list(getargv, options)?)
                .context("failed to encode arguments as JSON")?;
            output.push(b'\n');
            output
        }
    };
    Ok(output)
}

fn skipped_list<S: ArgumentSource>(
    getargv: &Getargv<S>,
    options: &RetrievalOptions,
) -> Result<Vec<String>, ArgvError> {
    let mut args = getargv.as_strings(options.pid)?;
    let skip = usize::try_from(options.skip).map_err(|_| ArgvError::SkipExceedsAvailable)?;
    if skip > args.len() {
        return Err(ArgvError::SkipExceedsAvailable);
    }
    args.drain(..skip);
    Ok(args)
}

/// Run `cli` against `getargv`, writing to `out` only on success.
pub fn run_with<S: ArgumentSource, W: Write>(cli: &Cli, getargv: &Getargv<S>, out: &mut W) -> Result<()> {
    let config = cli.load_config()?;
    let invocation = cli.resolve(&config);
    tracing::debug!(?invocation, "Resolved invocation");

    let output = render(getargv, &invocation)
        .with_context(|| format!("failed to read arguments of pid {}", cli.pid))?;
    out.write_all(&output).context("failed to write output")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

/// Run `cli` against the running kernel, writing to stdout.
pub fn run(cli: &Cli) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        let stdout = std::io::stdout();
        run_with(cli, &Getargv::native(), &mut stdout.lock())
    }

    #[cfg(not(target_os = "macos"))]
    {
        // Still surface config errors before the platform one.
        cli.load_config()?;
        anyhow::bail!(
            "no native argument source on this platform; cannot read arguments of pid {}",
            cli.pid
        )
    }
}
