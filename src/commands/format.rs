use std::io::Write;

use log::debug;

use super::CommandResult;
use crate::mac::{find_all_candidates, format_mac_address, MacFormat, MacResult};

/// Rewrites every address in `line`, leaving the surrounding text untouched.
pub fn format_line(line: &str, format: &MacFormat) -> MacResult<String> {
    let mut candidates = find_all_candidates(line);
    candidates.sort_by_key(|candidate| candidate.start());

    let mut formatted = String::with_capacity(line.len());
    let mut cursor = 0;

    for candidate in candidates {
        formatted.push_str(&line[cursor..candidate.start()]);
        formatted.push_str(&format_mac_address(candidate.as_str(), format)?);
        cursor = candidate.end();
    }
    formatted.push_str(&line[cursor..]);

    Ok(formatted)
}

/// Prints `input` line by line with all addresses reformatted.
///
/// Stops at the first address that cannot be formatted.
pub fn format_action<W: Write>(out: &mut W, format: &MacFormat, input: &str) -> CommandResult<()> {
    debug!("Format with {:?}", format);

    for line in input.lines() {
        writeln!(out, "{}", format_line(line, format)?)?;
    }

    Ok(())
}
