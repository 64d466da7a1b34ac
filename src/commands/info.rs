use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;

use chrono::{DateTime, Local};

use super::CommandResult;
use crate::cli::VERSION;
use crate::config::{Config, ENV_PREFIX};
use crate::oui::OuiDb;

/// Prints version, configuration sources and the state of the vendor table.
pub fn info_action<W, I>(out: &mut W, config: &Config, vars: I) -> CommandResult<()>
where
    W: Write,
    I: IntoIterator<Item = (String, String)>,
{
    writeln!(out, "{} {}", env!("CARGO_PKG_NAME"), VERSION)?;
    writeln!(out)?;

    match &config.config_file {
        Some(path) => writeln!(out, "Config file: {}", path.display())?,
        None => writeln!(out, "Config file: none")?,
    }
    for (key, value) in &config.file_values {
        writeln!(out, "  {}: {}", key, value)?;
    }

    let mut vars: Vec<(String, String)> = vars.into_iter()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect();
    vars.sort();

    writeln!(out)?;
    writeln!(out, "Environment variables:")?;
    for (key, value) in vars {
        writeln!(out, "  {}={}", key, value)?;
    }

    let lookup = &config.lookup;
    writeln!(out)?;
    writeln!(out, "OUI database:")?;
    writeln!(out, "  URL: {}", lookup.oui_url)?;
    writeln!(out, "  Path: {}", lookup.csv_file.display())?;

    match database_age(&lookup.csv_file) {
        Some(days) => {
            writeln!(out, "  Last modified: {} days ago", days)?;
            let db = OuiDb::load(BufReader::new(File::open(&lookup.csv_file)?))?;
            writeln!(out, "  Entries: {}", db.len())?;
        }
        None => writeln!(out, "  Not downloaded yet")?,
    }

    Ok(())
}

/// Whole days since `path` was last modified, `None` when it does not exist.
fn database_age(path: &Path) -> Option<i64> {
    let modified: DateTime<Local> = fs::metadata(path).and_then(|m| m.modified()).ok()?.into();
    Some((Local::now() - modified).num_days())
}
