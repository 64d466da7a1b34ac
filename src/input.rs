use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Read};
use std::path::PathBuf;

use log::debug;

/// Where the text to scan comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
    Args(Vec<String>),
    Interactive,
}

impl InputSource {
    /// Input file wins over piped stdin, which wins over the command line words.
    /// Without any of them the user types the text.
    pub fn detect(input_file: Option<PathBuf>, args: &[String]) -> Self {
        Self::select(input_file, !io::stdin().is_terminal(), args)
    }

    fn select(input_file: Option<PathBuf>, piped: bool, args: &[String]) -> Self {
        match input_file {
            Some(path) => InputSource::File(path),
            None if piped => InputSource::Stdin,
            None if !args.is_empty() => InputSource::Args(args.to_vec()),
            None => InputSource::Interactive,
        }
    }

    pub fn read(self) -> io::Result<String> {
        debug!("Read input from {:?}", self);

        match self {
            InputSource::File(path) => read_lines(BufReader::new(File::open(path)?)),
            InputSource::Stdin => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                Ok(input)
            }
            InputSource::Args(args) => Ok(args.join(" ")),
            InputSource::Interactive => {
                let eof_keys = if cfg!(windows) { "CTRL+Z" } else { "CTRL+D" };
                eprintln!("Please enter the input text. Press {} to finish.", eof_keys);
                read_lines(io::stdin().lock())
            }
        }
    }
}

/// Joins all lines with `\n` and drops trailing newlines.
pub fn read_lines<R: BufRead>(reader: R) -> io::Result<String> {
    let lines = reader.lines().collect::<io::Result<Vec<String>>>()?;
    let input = lines.join("\n");

    Ok(input.trim_end_matches('\n').to_owned())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn it_selects_the_input_source() {
        let args = vec![String::from("00:00:5e:00:53:01")];
        let file = PathBuf::from("macs.txt");

        assert_eq!(InputSource::select(Some(file.clone()), true, &args), InputSource::File(file));
        assert_eq!(InputSource::select(None, true, &args), InputSource::Stdin);
        assert_eq!(InputSource::select(None, false, &args), InputSource::Args(args.clone()));
        assert_eq!(InputSource::select(None, false, &[]), InputSource::Interactive);
    }

    #[test]
    fn it_joins_args() {
        let source = InputSource::Args(vec![String::from("MAC"), String::from("0000.5e00.5301")]);
        assert_eq!(source.read().unwrap(), "MAC 0000.5e00.5301");
    }

    #[test]
    fn it_trims_trailing_newlines() {
        let input = read_lines("first\r\nsecond\n\n\n".as_bytes()).unwrap();
        assert_eq!(input, "first\nsecond");
    }

    #[test]
    fn it_reads_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "00:00:5e:00:53:01").unwrap();
        writeln!(file, "00-00-5e-00-53-02").unwrap();

        let source = InputSource::File(file.path().to_path_buf());
        assert_eq!(source.read().unwrap(), "00:00:5e:00:53:01\n00-00-5e-00-53-02");
    }

    #[test]
    fn it_fails_on_missing_files() {
        assert!(InputSource::File(PathBuf::from("/nonexistent/macs.txt")).read().is_err());
    }
}
