use std::io::{self, Write};

use thiserror::Error;

use crate::cli::{Cli, Command, LookupCommand};
use crate::config::Config;
use crate::input::InputSource;
use crate::mac::MacError;
use crate::oui::{ask_download, OuiError};
use crate::output::output_stream;

pub mod extract;
pub mod format;
pub mod info;
pub mod lookup;

pub use extract::extract_action;
pub use format::{format_action, format_line};
pub use info::info_action;
pub use lookup::{lookup_action, lookup_command, vendor_action, vendor_command, vendor_query};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Mac(#[from] MacError),

    #[error(transparent)]
    Oui(#[from] OuiError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type CommandResult<T> = Result<T, CommandError>;

impl CommandError {
    pub fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            CommandError::Mac(_) => exitcode::DATAERR,
            CommandError::Oui(OuiError::Csv(_)) => exitcode::DATAERR,
            CommandError::Oui(OuiError::Download(_)) => exitcode::UNAVAILABLE,
            CommandError::Oui(OuiError::Io(_)) | CommandError::Io(_) => exitcode::IOERR,
        }
    }
}

/// Runs the selected command with the merged configuration.
pub fn run(cli: &Cli, config: &Config) -> CommandResult<()> {
    match &cli.command {
        Command::Extract(args) => {
            let extract = &config.extract;
            let input = InputSource::detect(extract.io.input_file.clone(), &args.text).read()?;
            let mut out = output_stream(extract.io.output_file.as_deref(), extract.io.append)?;
            extract_action(&mut out, extract.sort_order(), &input)?;
            out.flush()?;
        }
        Command::Format(args) => {
            let format = &config.format;
            let input = InputSource::detect(format.io.input_file.clone(), &args.text).read()?;
            let mut out = output_stream(format.io.output_file.as_deref(), format.io.append)?;
            format_action(&mut out, &format.format, &input)?;
            out.flush()?;
        }
        Command::Lookup(args) => match &args.command {
            Some(LookupCommand::Vendor(vendor)) => {
                vendor_command(&config.lookup, &vendor.query, ask_download)?;
            }
            None => {
                let lookup = &config.lookup;
                let input = InputSource::detect(lookup.io.input_file.clone(), &args.text).read()?;
                lookup_command(lookup, &input, ask_download)?;
            }
        },
        Command::Info => {
            let mut out = io::stdout().lock();
            info_action(&mut out, config, std::env::vars())?;
        }
    }

    Ok(())
}
