use std::{io, path::PathBuf};

use anyhow::{Result, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    /// Evaluate the batch from a JSON config, or the reference set if absent
    Run { config: Option<PathBuf> },
}

pub(crate) fn parse<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut config = None;
    for arg in args {
        let arg = arg.into();
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with('-') => bail!("unknown option `{flag}` (try --help)"),
            _ if config.is_some() => bail!("only one config file may be given"),
            _ => config = Some(PathBuf::from(arg)),
        }
    }
    Ok(Command::Run { config })
}

pub(crate) fn write_usage<W: io::Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Usage: medwaste-cli [CONFIG.json]")?;
    writeln!(out)?;
    writeln!(
        out,
        "Evaluates every scenario x facility x treatment process and prints"
    )?;
    writeln!(
        out,
        "inventory exchanges as CSV. Without a config the reference data set is used."
    )?;
    writeln!(out, "Set RUST_LOG to control log output on stderr.")
}
