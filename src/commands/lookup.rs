use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use log::{debug, info};

use super::CommandResult;
use crate::cli::vendor_help;
use crate::config::LookupConfig;
use crate::mac::{extract_oui, find_all_mac_addresses};
use crate::oui::{update_database, FilterOptions, OuiDb, OuiResult, SortOrder};
use crate::output::output_stream;

/// Loads the vendor table, downloading it first when it is missing and `confirm` agrees.
///
/// `None` when the download was declined.
pub fn open_database<F>(config: &LookupConfig, confirm: F) -> OuiResult<Option<OuiDb>>
where
    F: FnOnce(&Path) -> io::Result<bool>,
{
    if !update_database(&config.csv_file, &config.oui_url, confirm)? {
        return Ok(None);
    }

    info!("Load OUI database {}", config.csv_file.display());
    let db = OuiDb::load(BufReader::new(File::open(&config.csv_file)?))?;

    Ok(Some(db))
}

/// The search text of `lookup vendor`, `None` when only blanks were given.
pub fn vendor_query(words: &[String]) -> Option<String> {
    let query = words.join(" ");
    (!query.trim().is_empty()).then_some(query)
}

/// `lookup`: resolves the addresses in `input` and writes them to the configured output.
///
/// Nothing is written when the missing vendor table may not be downloaded.
pub fn lookup_command<F>(config: &LookupConfig, input: &str, confirm: F) -> CommandResult<()>
where
    F: FnOnce(&Path) -> io::Result<bool>,
{
    let Some(db) = open_database(config, confirm)? else {
        return Ok(());
    };

    let mut out = output_stream(config.io.output_file.as_deref(), config.io.append)?;
    lookup_action(&mut out, &db, config.sort_order(), config.suppress_unmatched, input)?;
    out.flush()?;

    Ok(())
}

/// `lookup vendor`: prints the usage for an empty query, otherwise the matching vendors.
pub fn vendor_command<F>(config: &LookupConfig, words: &[String], confirm: F) -> CommandResult<()>
where
    F: FnOnce(&Path) -> io::Result<bool>,
{
    let Some(query) = vendor_query(words) else {
        debug!("No vendor query given");
        print!("{}", vendor_help());
        return Ok(());
    };

    let Some(db) = open_database(config, confirm)? else {
        return Ok(());
    };

    let mut out = output_stream(config.io.output_file.as_deref(), config.io.append)?;
    let order = config.sort_order();
    vendor_action(&mut out, &db, &query, config.vendor, order, config.csv)?;
    out.flush()?;

    Ok(())
}

/// Prints every address found in `input` followed by its vendor in parentheses.
pub fn lookup_action<W: Write>(
    out: &mut W,
    db: &OuiDb,
    order: SortOrder,
    suppress_unmatched: bool,
    input: &str,
) -> CommandResult<()> {
    let mut macs = find_all_mac_addresses(input);
    order.sort_by_key(&mut macs, |mac| *mac);

    for mac in macs {
        let vendor = extract_oui(mac)
            .ok()
            .and_then(|oui| db.find_by_assignment(&oui));

        match vendor {
            Some(vendor) => writeln!(out, "{} ({})", mac, vendor.organization())?,
            None if suppress_unmatched => debug!("No vendor for {}", mac),
            None => writeln!(out, "{}", mac)?,
        }
    }

    Ok(())
}

/// Prints all vendors matching `query` as `ASSIGNMENT Organization` or CSV records.
pub fn vendor_action<W: Write>(
    out: &mut W,
    db: &OuiDb,
    query: &str,
    filter: FilterOptions,
    order: SortOrder,
    csv: bool,
) -> CommandResult<()> {
    let mut vendors = db.find_all_vendors(query, filter);
    debug!("{} vendors match {:?}", vendors.len(), query);

    vendors.sort(order);

    for vendor in vendors.entries() {
        if csv {
            vendor.write_csv(&mut *out)?;
        } else {
            writeln!(out, "{} {}", vendor.assignment(), vendor.organization())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = r#"Registry,Assignment,Organization Name,Organization Address
MA-L,00005E,ICANN; IANA Department,INTERNET ASSIGNED NUMBERS AUTHORITY Los Angeles CA US 90094
MA-L,583653,"Apple, Inc.",1 Infinite Loop Cupertino CA US 95014
MA-L,58A15F,Texas Instruments,12500 TI Blvd Dallas TX US 75243
MA-L,A4C361,"Apple, Inc.",1 Infinite Loop Cupertino CA US 95014
"#;

    fn db() -> OuiDb {
        OuiDb::load(CSV.as_bytes()).unwrap()
    }

    fn lookup(order: SortOrder, suppress: bool, input: &str) -> String {
        let mut out = Vec::new();
        lookup_action(&mut out, &db(), order, suppress, input).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn vendor(query: &str, filter: FilterOptions, order: SortOrder, csv: bool) -> String {
        let mut out = Vec::new();
        vendor_action(&mut out, &db(), query, filter, order, csv).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn it_resolves_vendors() {
        let output =
            lookup(SortOrder::Unsorted, false, "gw 00:00:5e:00:53:01 phone 58-36-53-aa-bb-cc");
        assert_eq!(
            output,
            "00:00:5e:00:53:01 (ICANN; IANA Department)\n58-36-53-aa-bb-cc (Apple, Inc.)\n"
        );
    }

    #[test]
    fn it_prints_unmatched_addresses() {
        assert_eq!(lookup(SortOrder::Unsorted, false, "ff:ff:ff:ff:ff:ff"), "ff:ff:ff:ff:ff:ff\n");
        assert_eq!(lookup(SortOrder::Unsorted, true, "ff:ff:ff:ff:ff:ff"), "");
    }

    #[test]
    fn it_sorts_before_lookup() {
        let output = lookup(SortOrder::Descending, true, "58a1.5f00.0001 0000.5e00.5301");
        assert_eq!(
            output,
            "58a1.5f00.0001 (Texas Instruments)\n0000.5e00.5301 (ICANN; IANA Department)\n"
        );
    }

    #[test]
    fn it_searches_vendors() {
        let output = vendor("apple", FilterOptions::default(), SortOrder::Descending, false);
        assert_eq!(output, "A4C361 Apple, Inc.\n583653 Apple, Inc.\n");
    }

    #[test]
    fn it_searches_selected_columns() {
        let filter = FilterOptions { address: true, ..Default::default() };
        let output = vendor("Dallas", filter, SortOrder::Unsorted, false);
        assert_eq!(output, "58A15F Texas Instruments\n");

        let filter = FilterOptions { organization: true, ..Default::default() };
        assert_eq!(vendor("Dallas", filter, SortOrder::Unsorted, false), "");
    }

    #[test]
    fn it_prints_vendors_as_csv() {
        let filter = FilterOptions { assignment: true, ..Default::default() };
        let output = vendor("583653", filter, SortOrder::Unsorted, true);
        assert_eq!(output, "583653,\"Apple, Inc.\",1 Infinite Loop Cupertino CA US 95014\n");
    }

    fn config_in(dir: &Path) -> LookupConfig {
        let mut config = LookupConfig {
            csv_file: dir.join("oui.csv"),
            oui_url: String::from("http://127.0.0.1:9/unused"),
            ..Default::default()
        };
        config.io.output_file = Some(dir.join("out.txt"));
        config
    }

    #[test]
    fn it_opens_an_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.csv_file, CSV).unwrap();

        let db = open_database(&config, |_| Ok(false)).unwrap().unwrap();
        assert_eq!(db.len(), 4);
    }

    #[test]
    fn it_writes_lookups_to_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.csv_file, CSV).unwrap();

        lookup_command(&config, "gw 00:00:5e:00:53:01", |_| Ok(false)).unwrap();

        let output = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(output, "00:00:5e:00:53:01 (ICANN; IANA Department)\n");
    }

    #[test]
    fn it_stops_quietly_when_the_download_is_declined() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        assert!(open_database(&config, |_| Ok(false)).unwrap().is_none());

        lookup_command(&config, "gw 00:00:5e:00:53:01", |_| Ok(false)).unwrap();
        vendor_command(&config, &[String::from("apple")], |_| Ok(false)).unwrap();

        assert!(!config.csv_file.exists());
        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    fn it_requires_a_vendor_query() {
        assert_eq!(vendor_query(&[]), None);
        assert_eq!(vendor_query(&[String::from(" "), String::new()]), None);
        assert_eq!(
            vendor_query(&[String::from("Apple,"), String::from("Inc")]),
            Some(String::from("Apple, Inc"))
        );
    }

    #[test]
    fn it_shows_usage_for_an_empty_vendor_query() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        vendor_command(&config, &[], |_| panic!("an empty query never loads the table")).unwrap();

        assert!(!config.csv_file.exists());
        assert!(!dir.path().join("out.txt").exists());
    }
}
