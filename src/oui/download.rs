use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{OuiError, OuiResult};

pub const DEFAULT_OUI_URL: &str = "https://standards-oui.ieee.org/oui/oui.csv";

/// `<data local dir>/mactool/oui.csv`, or `oui.csv` in the working directory.
pub fn default_database_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join(env!("CARGO_PKG_NAME")).join("oui.csv"),
        None => PathBuf::from("oui.csv"),
    }
}

/// Streams the CSV at `url` into `out`, reporting progress on stderr.
///
/// A single attempt; any non-success status is an error.
pub fn download_database<W: Write>(mut out: W, url: &str) -> OuiResult<u64> {
    info!("Download OUI database from {}", url);

    let mut response = ureq::get(url).call()?;
    let size = response.headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|size| *size > 0);
    debug!("Content length: {:?}", size);

    let mut reader = response.body_mut().as_reader();
    let mut buf = [0u8; 8192];
    let mut total: u64 = 0;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        total += n as u64;

        if let Some(size) = size {
            eprint!("\rDownload Progress: {:.2}%", total as f64 / size as f64 * 100.0);
        }
    }
    if size.is_some() {
        eprintln!();
    }

    out.flush()?;
    Ok(total)
}

/// Downloads `url` into `path`, replacing the file only on success.
pub fn fetch_database(path: &Path, url: &str) -> OuiResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let partial = partial_path(path);
    let result = File::create(&partial)
        .map_err(OuiError::from)
        .and_then(|file| download_database(BufWriter::new(file), url));

    match result {
        Ok(bytes) => {
            fs::rename(&partial, path)?;
            info!("Saved {} bytes to {}", bytes, path.display());
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&partial);
            Err(e)
        }
    }
}

/// Makes sure the vendor table at `path` exists, downloading it when missing.
///
/// `confirm` decides whether a missing table is fetched. Returns `false` when it
/// declined and there is still no table.
pub fn update_database<F>(path: &Path, url: &str, confirm: F) -> OuiResult<bool>
where
    F: FnOnce(&Path) -> io::Result<bool>,
{
    if path.exists() {
        return Ok(true);
    }

    eprintln!("The file '{}' could not be found.", path.display());

    if !confirm(path)? {
        eprintln!("File download cancelled.");
        return Ok(false);
    }

    fetch_database(path, url)?;
    Ok(true)
}

/// Asks on the terminal whether to download. Without a terminal the answer is yes.
pub fn ask_download(_path: &Path) -> io::Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(true);
    }

    eprint!("Would you like to download it? (Y/n): ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    Ok(confirmed(&answer))
}

fn confirmed(answer: &str) -> bool {
    !matches!(answer.trim_end_matches(['\r', '\n']), "n" | "N")
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
