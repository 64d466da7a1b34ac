//! IEEE OUI vendor table.

use std::io::{Read, Write};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

pub mod download;
pub use download::{
    ask_download, default_database_path, download_database, fetch_database, update_database,
    DEFAULT_OUI_URL,
};

#[derive(Error, Debug)]
pub enum OuiError {
    #[error("reading OUI database: {0}")]
    Csv(#[from] csv::Error),

    #[error("downloading OUI database: {0}")]
    Download(#[from] ureq::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OuiResult<T> = Result<T, OuiError>;

/// Sort direction for lists of addresses or vendors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_flags(asc: bool, desc: bool) -> Self {
        match (asc, desc) {
            (true, _) => SortOrder::Ascending,
            (false, true) => SortOrder::Descending,
            (false, false) => SortOrder::Unsorted,
        }
    }

    pub fn sort_by_key<T, K: Ord>(&self, items: &mut [T], key: impl FnMut(&T) -> K) {
        match self {
            SortOrder::Unsorted => {}
            SortOrder::Ascending => items.sort_by_key(key),
            SortOrder::Descending => {
                items.sort_by_key(key);
                items.reverse();
            }
        }
    }
}

/// Columns searched by [`OuiDb::find_all_vendors`]. All unset means every column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub assignment: bool,
    pub organization: bool,
    pub address: bool,
}

impl FilterOptions {
    fn all_columns(&self) -> bool {
        !self.assignment && !self.organization && !self.address
    }
}

/// One row of the vendor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oui {
    assignment: String,
    organization: String,
    address: String,
}

impl Oui {
    pub fn new(assignment: &str, organization: &str, address: &str) -> Self {
        Self {
            assignment: assignment.to_owned(),
            organization: organization.to_owned(),
            address: address.to_owned(),
        }
    }

    /// Six upper case hex digits, e.g. `00005E`.
    pub fn assignment(&self) -> &str {
        self.assignment.as_ref()
    }

    pub fn organization(&self) -> &str {
        self.organization.as_ref()
    }

    pub fn address(&self) -> &str {
        self.address.as_ref()
    }

    /// Case-insensitive substring search over the columns selected by `filter`.
    pub fn contains(&self, s: &str, filter: FilterOptions) -> bool {
        let needle = s.to_lowercase();
        let all = filter.all_columns();
        let hit = |column: &str| column.to_lowercase().contains(&needle);

        ((all || filter.assignment) && hit(&self.assignment))
            || ((all || filter.organization) && hit(&self.organization))
            || ((all || filter.address) && hit(&self.address))
    }

    /// Writes `assignment,organization,address` as one CSV record.
    pub fn write_csv<W: Write>(&self, out: W) -> OuiResult<()> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record([self.assignment(), self.organization(), self.address()])?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OuiDb {
    entries: Vec<Oui>,
}

impl OuiDb {
    /// Reads `Registry,Assignment,Organization Name,Organization Address` records.
    pub fn load<R: Read>(reader: R) -> OuiResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;

            let columns = (record.get(1), record.get(2), record.get(3));
            let (assignment, organization, address) = match columns {
                (Some(assignment), Some(organization), Some(address)) => {
                    (assignment, organization, address)
                }
                _ => {
                    debug!("Skip short OUI record {:?}", record);
                    continue;
                }
            };

            if assignment == "Assignment" {
                continue;
            }

            entries.push(Oui::new(assignment, organization, address));
        }

        debug!("Loaded {} OUI entries", entries.len());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Oui] {
        self.entries.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact match on the assignment column, which is expected to be upper case.
    pub fn find_by_assignment(&self, assignment: &str) -> Option<&Oui> {
        self.entries.iter().find(|entry| entry.assignment == assignment)
    }

    /// All entries containing `s` (case-insensitive) in one of the selected columns.
    pub fn find_all_vendors(&self, s: &str, filter: FilterOptions) -> OuiDb {
        let entries = self.entries.iter()
            .filter(|entry| entry.contains(s, filter))
            .cloned()
            .collect();

        OuiDb { entries }
    }

    pub fn sort(&mut self, order: SortOrder) {
        order.sort_by_key(&mut self.entries, |entry| entry.assignment.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = r#"Registry,Assignment,Organization Name,Organization Address
MA-L,583653,"Apple, Inc.",1 Infinite Loop Cupertino CA US 95014
MA-L,58A15F,Texas Instruments,12500 TI Blvd Dallas TX US 75243
MA-L,00000C,"Cisco Systems, Inc",170 WEST TASMAN DRIVE SAN JOSE CA US 95134
"#;

    fn db() -> OuiDb {
        OuiDb::load(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn it_loads_the_database() {
        let db = db();
        assert_eq!(db.len(), 3);
        assert_eq!(db.entries()[0].assignment(), "583653");
        assert_eq!(db.entries()[0].organization(), "Apple, Inc.");
    }

    #[test]
    fn it_loads_without_header_and_skips_short_rows() {
        let csv = "MA-L,583653,\"Apple, Inc.\",Cupertino\nbroken,row\n";
        let db = OuiDb::load(csv.as_bytes()).unwrap();
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn it_finds_by_assignment() {
        let db = db();
        let oui = db.find_by_assignment("583653").unwrap();
        assert_eq!(oui.organization(), "Apple, Inc.");
        assert_eq!(oui.address(), "1 Infinite Loop Cupertino CA US 95014");

        assert!(db.find_by_assignment("000000").is_none());
        assert!(db.find_by_assignment("58a15f").is_none());
    }

    #[test]
    fn it_searches_all_columns() {
        let db = db();
        let found = db.find_all_vendors("CUPERTINO", FilterOptions::default());
        assert_eq!(found.len(), 1);

        let found = db.find_all_vendors("5", FilterOptions::default());
        assert_eq!(found.len(), 3);
        assert!(db.entries()[1].contains("texas", FilterOptions::default()));
        let address = FilterOptions { address: true, ..Default::default() };
        assert!(!db.entries()[1].contains("texas", address));
    }

    #[test]
    fn it_searches_selected_columns_once() {
        let db = db();
        let filter = FilterOptions { assignment: true, organization: true, address: false };
        let found = db.find_all_vendors("c", filter);
        assert_eq!(found.len(), 2);

        let filter = FilterOptions { address: true, ..Default::default() };
        assert_eq!(db.find_all_vendors("San Jose", filter).len(), 1);
        assert_eq!(db.find_all_vendors("Cisco", filter).len(), 0);
    }

    #[test]
    fn it_sorts_entries() {
        let mut db = db();
        db.sort(SortOrder::Ascending);
        assert_eq!(db.entries()[0].assignment(), "00000C");
        db.sort(SortOrder::Descending);
        assert_eq!(db.entries()[0].assignment(), "58A15F");
    }

    #[test]
    fn it_writes_csv_rows() {
        let mut out = Vec::new();
        db().entries()[0].write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "583653,\"Apple, Inc.\",1 Infinite Loop Cupertino CA US 95014\n"
        );
    }
}
