use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;

/// Stdout, or `path` truncated or appended to.
pub fn output_stream(path: Option<&Path>, append: bool) -> io::Result<Box<dyn Write>> {
    let path = match path {
        Some(path) => path,
        None => return Ok(Box::new(io::stdout().lock())),
    };

    debug!("Write output to {} (append: {})", path.display(), append);

    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    Ok(Box::new(BufWriter::new(options.open(path)?)))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn it_truncates_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "old content\n").unwrap();

        let mut out = output_stream(Some(file.path()), false).unwrap();
        writeln!(out, "new").unwrap();
        drop(out);

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "new\n");
    }

    #[test]
    fn it_appends_to_files() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "old\n").unwrap();

        let mut out = output_stream(Some(file.path()), true).unwrap();
        writeln!(out, "new").unwrap();
        drop(out);

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "old\nnew\n");
    }

    #[test]
    fn it_creates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macs.txt");

        let mut out = output_stream(Some(&path), true).unwrap();
        writeln!(out, "00:00:5e:00:53:01").unwrap();
        drop(out);

        assert!(path.exists());
    }

    #[test]
    fn it_fails_on_invalid_paths() {
        assert!(output_stream(Some(Path::new("/invalid/path/out.txt")), false).is_err());
    }
}
