use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use serde_yaml_ng::Value;
use thiserror::Error;

use crate::logging::LogConfig;
use crate::mac::{GroupSizeOption, MacFormat};
use crate::oui::{self, FilterOptions, SortOrder};

/// Prefix of all environment variables read by [`Config::apply_env`].
pub const ENV_PREFIX: &str = "MACTOOL_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("parsing {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_yaml_ng::Error },

    #[error("invalid value {value:?} for {key}")]
    Env { key: String, value: String },
}

/// Settings of one run: defaults, overridden by the config file, then by
/// `MACTOOL_*` variables and finally by command line flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub debug: bool,
    pub extract: ExtractConfig,
    pub format: FormatConfig,
    pub lookup: LookupConfig,
    pub log: LogConfig,
    /// File the settings were read from
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
    /// Flattened `section.key` pairs as written in the config file
    #[serde(skip)]
    pub file_values: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IoConfig {
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub append: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractConfig {
    pub sort_asc: bool,
    pub sort_desc: bool,
    #[serde(flatten)]
    pub io: IoConfig,
}

impl ExtractConfig {
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_flags(self.sort_asc, self.sort_desc)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FormatConfig {
    #[serde(flatten)]
    pub format: MacFormat,
    #[serde(flatten)]
    pub io: IoConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LookupConfig {
    pub csv_file: PathBuf,
    pub oui_url: String,
    pub csv: bool,
    pub suppress_unmatched: bool,
    pub sort_asc: bool,
    pub sort_desc: bool,
    pub vendor: FilterOptions,
    #[serde(flatten)]
    pub io: IoConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            csv_file: oui::default_database_path(),
            oui_url: String::from(oui::DEFAULT_OUI_URL),
            csv: false,
            suppress_unmatched: false,
            sort_asc: false,
            sort_desc: false,
            vendor: FilterOptions::default(),
            io: IoConfig::default(),
        }
    }
}

impl LookupConfig {
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_flags(self.sort_asc, self.sort_desc)
    }
}

impl Config {
    const CONFIG_FILE: &'static str = concat!(".", env!("CARGO_PKG_NAME"), ".yaml");

    /// `~/.mactool.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(Self::CONFIG_FILE))
    }

    /// Reads `path`, or the default file when it exists, then applies the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load_from_file(&path)?,
                _ => Config::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        let mut config = Self::from_yaml(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.config_file = Some(path.to_path_buf());

        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml_ng::Error> {
        if text.trim().is_empty() {
            return Ok(Config::default());
        }

        let mut config: Config = serde_yaml_ng::from_str(text)?;

        let mut values = Vec::new();
        flatten_yaml("", &serde_yaml_ng::from_str::<Value>(text)?, &mut values);
        values.sort();
        config.file_values = values;

        Ok(config)
    }

    /// Overrides settings from `MACTOOL_<SECTION>_<KEY>` variables looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { var };

        env.flag("DEBUG", &mut self.debug)?;
        env.parse("LOG_LEVEL", &mut self.log.level)?;
        env.path("LOG_FILE", &mut self.log.file);

        env.flag("EXTRACT_SORT_ASC", &mut self.extract.sort_asc)?;
        env.flag("EXTRACT_SORT_DESC", &mut self.extract.sort_desc)?;
        env.io("EXTRACT", &mut self.extract.io)?;

        env.parse("FORMAT_CASE", &mut self.format.format.case)?;
        env.parse("FORMAT_DELIMITER", &mut self.format.format.delimiter)?;
        env.group_size("FORMAT_GROUP_SIZE", &mut self.format.format.group_size)?;
        env.io("FORMAT", &mut self.format.io)?;

        env.parse("LOOKUP_CSV_FILE", &mut self.lookup.csv_file)?;
        env.parse("LOOKUP_OUI_URL", &mut self.lookup.oui_url)?;
        env.flag("LOOKUP_CSV", &mut self.lookup.csv)?;
        env.flag("LOOKUP_SUPPRESS_UNMATCHED", &mut self.lookup.suppress_unmatched)?;
        env.flag("LOOKUP_SORT_ASC", &mut self.lookup.sort_asc)?;
        env.flag("LOOKUP_SORT_DESC", &mut self.lookup.sort_desc)?;
        env.io("LOOKUP", &mut self.lookup.io)?;

        Ok(())
    }
}

struct Env<F> {
    var: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<(String, String)> {
        let key = format!("{}{}", ENV_PREFIX, key);
        (self.var)(&key).map(|value| (key, value))
    }

    fn parse<T: FromStr>(&self, key: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Some((key, value)) = self.get(key) {
            *target = value.parse().map_err(|_| ConfigError::Env { key, value: value.clone() })?;
        }
        Ok(())
    }

    fn flag(&self, key: &str, target: &mut bool) -> Result<(), ConfigError> {
        if let Some((key, value)) = self.get(key) {
            *target = match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(ConfigError::Env { key, value }),
            };
        }
        Ok(())
    }

    fn path(&self, key: &str, target: &mut Option<PathBuf>) {
        if let Some((_, value)) = self.get(key) {
            *target = Some(PathBuf::from(value));
        }
    }

    fn group_size(&self, key: &str, target: &mut GroupSizeOption) -> Result<(), ConfigError> {
        if let Some((key, value)) = self.get(key) {
            *target = value.parse::<u8>().ok()
                .and_then(|size| GroupSizeOption::try_from(size).ok())
                .ok_or(ConfigError::Env { key, value })?;
        }
        Ok(())
    }

    fn io(&self, section: &str, target: &mut IoConfig) -> Result<(), ConfigError> {
        self.path(&format!("{}_INPUT_FILE", section), &mut target.input_file);
        self.path(&format!("{}_OUTPUT_FILE", section), &mut target.output_file);
        self.flag(&format!("{}_APPEND", section), &mut target.append)
    }
}

fn flatten_yaml(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let scalar = match value {
        Value::Mapping(map) => {
            for (key, value) in map {
                let key = match key.as_str() {
                    Some(key) => key.to_owned(),
                    None => format!("{:?}", key),
                };
                let key = if prefix.is_empty() { key } else { format!("{}.{}", prefix, key) };
                flatten_yaml(&key, value, out);
            }
            return;
        }
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => format!("{:?}", other),
    };

    out.push((prefix.to_owned(), scalar));
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use log::LevelFilter;

    use super::*;
    use crate::mac::{CaseOption, DelimiterOption};

    #[test]
    fn it_parses_a_full_config() {
        let cfg = Config::from_yaml(r#"---
        debug: true
        extract:
            sort-asc: true
            output-file: macs.txt
            append: true
        format:
            case: upper
            delimiter: "-"
            group-size: 4
        lookup:
            csv-file: /tmp/oui.csv
            suppress-unmatched: true
            vendor:
                organization: true
        log:
            level: info
        "#);
        assert!(cfg.is_ok());
        let cfg = cfg.unwrap();

        assert!(cfg.debug);
        assert!(cfg.extract.sort_asc);
        assert_eq!(cfg.extract.io.output_file, Some(PathBuf::from("macs.txt")));
        assert!(cfg.extract.io.append);
        assert_eq!(cfg.format.format.case, CaseOption::Upper);
        assert_eq!(cfg.format.format.delimiter, DelimiterOption::Hyphen);
        assert_eq!(cfg.format.format.group_size, GroupSizeOption::Four);
        assert_eq!(cfg.lookup.csv_file, PathBuf::from("/tmp/oui.csv"));
        assert_eq!(cfg.lookup.oui_url, oui::DEFAULT_OUI_URL);
        assert!(cfg.lookup.suppress_unmatched);
        assert!(cfg.lookup.vendor.organization);
        assert_eq!(cfg.log.level, LevelFilter::Info);
        assert!(cfg.file_values.contains(&(String::from("format.group-size"), String::from("4"))));
    }

    #[test]
    fn it_parses_an_empty_config() {
        let cfg = Config::from_yaml("").unwrap();
        assert!(!cfg.debug);
        assert_eq!(cfg.format.format, MacFormat::default());
        assert!(cfg.lookup.csv_file.ends_with("oui.csv"));
        assert!(cfg.file_values.is_empty());
    }

    #[test]
    fn it_rejects_invalid_format_options() {
        assert!(Config::from_yaml("format:\n  group-size: 3\n").is_err());
        assert!(Config::from_yaml("format:\n  case: title\n").is_err());
        assert!(Config::from_yaml("format:\n  delimiter: \"_\"\n").is_err());
    }

    #[test]
    fn it_applies_environment_overrides() {
        let env = HashMap::from([
            ("MACTOOL_DEBUG", "1"),
            ("MACTOOL_FORMAT_CASE", "lower"),
            ("MACTOOL_FORMAT_GROUP_SIZE", "6"),
            ("MACTOOL_LOOKUP_CSV_FILE", "/data/oui.csv"),
            ("MACTOOL_EXTRACT_OUTPUT_FILE", "out.txt"),
        ]);

        let mut cfg = Config::from_yaml("format:\n  case: upper\n").unwrap();
        cfg.apply_env(|key| env.get(key).map(|v| v.to_string())).unwrap();

        assert!(cfg.debug);
        assert_eq!(cfg.format.format.case, CaseOption::Lower);
        assert_eq!(cfg.format.format.group_size, GroupSizeOption::Six);
        assert_eq!(cfg.lookup.csv_file, PathBuf::from("/data/oui.csv"));
        assert_eq!(cfg.extract.io.output_file, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn it_rejects_invalid_environment_values() {
        let mut cfg = Config::default();
        let err =
            cfg.apply_env(|key| (key == "MACTOOL_FORMAT_GROUP_SIZE").then(|| String::from("3")));
        assert!(matches!(err, Err(ConfigError::Env { .. })));

        let err = cfg.apply_env(|key| (key == "MACTOOL_DEBUG").then(|| String::from("maybe")));
        assert!(matches!(err, Err(ConfigError::Env { .. })));
    }

    #[test]
    fn it_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".mactool.yaml");
        fs::write(&path, "lookup:\n  csv: true\n").unwrap();

        let cfg = Config::load_from_file(&path).unwrap();
        assert!(cfg.lookup.csv);
        assert_eq!(cfg.config_file, Some(path));
    }

    #[test]
    fn it_fails_on_a_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/.mactool.yaml")));
        assert!(matches!(err, Err(ConfigError::Read { .. })));
    }
}
