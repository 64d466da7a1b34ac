use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use git_version::git_version;

use crate::config::{Config, ConfigError, IoConfig};
use crate::mac::{CaseOption, DelimiterOption, GroupSizeOption};

pub const VERSION: &str = git_version!(
    args = ["--tags", "--always", "--dirty=-modified"],
    fallback = env!("CARGO_PKG_VERSION")
);

/// Extract, format and look up MAC addresses
#[derive(Parser, Debug)]
#[command(name = "mactool", author, version = VERSION, about, long_about = None)]
pub struct Cli {
    /// Config file (default is $HOME/.mactool.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every MAC address found in the input
    Extract(ExtractArgs),
    /// Rewrite the MAC addresses in the input, keeping all other text
    Format(FormatArgs),
    /// Resolve the vendor of every MAC address found in the input
    Lookup(LookupArgs),
    /// Show configuration and vendor table status
    Info,
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(short, long)]
    pub append: bool,
}

#[derive(Args, Debug, Default)]
pub struct IoArgs {
    /// Read the input from this file
    #[arg(short, long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl IoArgs {
    fn apply(&self, io: &mut IoConfig) {
        if let Some(input_file) = &self.input_file {
            io.input_file = Some(input_file.clone());
        }
        self.output.apply(io);
    }
}

impl OutputArgs {
    fn apply(&self, io: &mut IoConfig) {
        if let Some(output_file) = &self.output_file {
            io.output_file = Some(output_file.clone());
        }
        if self.append {
            io.append = true;
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct SortArgs {
    /// Sort ascending
    #[arg(short = 's', long, conflicts_with = "sort_desc")]
    pub sort_asc: bool,

    /// Sort descending
    #[arg(short = 'S', long)]
    pub sort_desc: bool,
}

impl SortArgs {
    fn apply(&self, asc: &mut bool, desc: &mut bool) {
        if self.sort_asc {
            (*asc, *desc) = (true, false);
        } else if self.sort_desc {
            (*asc, *desc) = (false, true);
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub sort: SortArgs,

    #[command(flatten)]
    pub io: IoArgs,

    /// Text to scan when neither an input file nor stdin is given
    #[arg(value_name = "TEXT")]
    pub text: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct FormatArgs {
    /// Upper case hex digits
    #[arg(short, long, conflicts_with = "lower")]
    pub upper: bool,

    /// Lower case hex digits
    #[arg(short, long)]
    pub lower: bool,

    /// Delimiter between groups: ":", "-", "." or "" (also colon, hyphen, dot, none)
    #[arg(short, long, value_name = "DELIMITER")]
    pub delimiter: Option<DelimiterOption>,

    /// Hex digits per group: 2, 4 or 6
    #[arg(short, long, value_name = "SIZE", value_parser = parse_group_size)]
    pub group_size: Option<GroupSizeOption>,

    #[command(flatten)]
    pub io: IoArgs,

    /// Text to format when neither an input file nor stdin is given
    #[arg(value_name = "TEXT")]
    pub text: Vec<String>,
}

impl FormatArgs {
    fn case(&self) -> Option<CaseOption> {
        match (self.upper, self.lower) {
            (true, _) => Some(CaseOption::Upper),
            (false, true) => Some(CaseOption::Lower),
            (false, false) => None,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct LookupArgs {
    #[command(subcommand)]
    pub command: Option<LookupCommand>,

    /// Vendor table location
    #[arg(short = 'f', long, global = true, value_name = "FILE")]
    pub csv_file: Option<PathBuf>,

    /// Where to download the vendor table from
    #[arg(long, global = true, value_name = "URL")]
    pub oui_url: Option<String>,

    /// Print vendors as CSV records
    #[arg(long, global = true)]
    pub csv: bool,

    /// Skip addresses without a known vendor
    #[arg(short = 'u', long)]
    pub suppress_unmatched: bool,

    #[command(flatten)]
    pub sort: SortArgs,

    #[command(flatten)]
    pub io: IoArgs,

    /// Text to scan when neither an input file nor stdin is given
    #[arg(value_name = "TEXT")]
    pub text: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum LookupCommand {
    /// Search the vendor table
    Vendor(VendorArgs),
}

#[derive(Args, Debug, Default)]
pub struct VendorArgs {
    /// Search the assignment column
    #[arg(long)]
    pub assignment: bool,

    /// Search the organization column
    #[arg(long)]
    pub organization: bool,

    /// Search the address column
    #[arg(long)]
    pub address: bool,

    #[command(flatten)]
    pub sort: SortArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Search text, words are joined with spaces
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,
}

fn parse_group_size(s: &str) -> Result<GroupSizeOption, String> {
    let size: u8 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    GroupSizeOption::try_from(size).map_err(|e| e.to_string())
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }

    /// Reads the configuration and lays the command line flags over it.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut Config) {
        if self.debug {
            config.debug = true;
        }

        match &self.command {
            Command::Extract(args) => {
                let extract = &mut config.extract;
                args.sort.apply(&mut extract.sort_asc, &mut extract.sort_desc);
                args.io.apply(&mut extract.io);
            }
            Command::Format(args) => {
                let format = &mut config.format;
                if let Some(case) = args.case() {
                    format.format.case = case;
                }
                if let Some(delimiter) = args.delimiter {
                    format.format.delimiter = delimiter;
                }
                if let Some(group_size) = args.group_size {
                    format.format.group_size = group_size;
                }
                args.io.apply(&mut format.io);
            }
            Command::Lookup(args) => {
                let lookup = &mut config.lookup;
                if let Some(csv_file) = &args.csv_file {
                    lookup.csv_file = csv_file.clone();
                }
                if let Some(oui_url) = &args.oui_url {
                    lookup.oui_url = oui_url.clone();
                }
                if args.csv {
                    lookup.csv = true;
                }
                if args.suppress_unmatched {
                    lookup.suppress_unmatched = true;
                }

                match &args.command {
                    Some(LookupCommand::Vendor(vendor)) => {
                        if vendor.assignment || vendor.organization || vendor.address {
                            lookup.vendor.assignment = vendor.assignment;
                            lookup.vendor.organization = vendor.organization;
                            lookup.vendor.address = vendor.address;
                        }
                        vendor.sort.apply(&mut lookup.sort_asc, &mut lookup.sort_desc);
                        vendor.output.apply(&mut lookup.io);
                    }
                    None => {
                        args.sort.apply(&mut lookup.sort_asc, &mut lookup.sort_desc);
                        args.io.apply(&mut lookup.io);
                    }
                }
            }
            Command::Info => {}
        }
    }
}

/// Usage of `lookup vendor`, shown when it is called without a query.
pub fn vendor_help() -> String {
    let mut command = Cli::command();
    command.build();

    match command
        .find_subcommand_mut("lookup")
        .and_then(|lookup| lookup.find_subcommand_mut("vendor"))
    {
        Some(vendor) => vendor.render_help().to_string(),
        None => command.render_help().to_string(),
    }
}
