use std::io::{self, Write};

use log::debug;

use crate::mac::find_all_mac_addresses;
use crate::oui::SortOrder;

/// Prints every address found in `input`, one per line.
pub fn extract_action<W: Write>(out: &mut W, order: SortOrder, input: &str) -> io::Result<()> {
    let mut macs = find_all_mac_addresses(input);
    debug!("Found {} MAC addresses", macs.len());

    order.sort_by_key(&mut macs, |mac| *mac);

    for mac in macs {
        writeln!(out, "{}", mac)?;
    }

    Ok(())
}
