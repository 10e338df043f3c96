use serde::de::DeserializeOwned;
use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, Write as _},
    path::Path,
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("File already exists: {0}")]
        AlreadyExists(PathBuf),

        #[error("File too large ({0}): {1} bytes (limit: {2} bytes)")]
        TooLarge(PathBuf, u64, u64),

        #[error("Cannot deserialize from JSON (src='{0}'): {1}")]
        DeserializeFromJson(PathBuf, #[source] serde_json::Error),

        #[error("Cannot deserialize from TOML (src='{0}'): {1}")]
        DeserializeFromToml(PathBuf, #[source] toml::de::Error),
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

#[must_use]
pub fn write<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    fs::write(&filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    if let Some(dir) = filepath.as_ref().parent() {
        self::mkdir_all(dir)?;
    }
    self::write(filepath, contents)
}

/// Write a new file, failing with [`Error::AlreadyExists`] if `filepath` exists.
#[must_use]
pub fn write_new_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    let filepath = filepath.as_ref();
    if let Some(dir) = filepath.parent() {
        self::mkdir_all(dir)?;
    }
    let mut f = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(filepath)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::AlreadyExists(filepath.to_owned()),
            _ => Error::SingleIO("Cannot create file", filepath.to_owned(), e),
        })?;
    f.write_all(contents.as_ref())
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.to_owned(), e))
}

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

/// Same as [`read_to_string`] but refuses files larger than `max_bytes`.
#[must_use]
pub fn read_to_string_with_limit(filepath: impl AsRef<Path>, max_bytes: u64) -> Result<String> {
    let filepath = filepath.as_ref();
    let len = fs::metadata(filepath)
        .map_err(|e| Error::SingleIO("Cannot stat file", filepath.to_owned(), e))?
        .len();
    if len > max_bytes {
        return Err(Error::TooLarge(filepath.to_owned(), len, max_bytes));
    }
    self::read_to_string(filepath)
}

#[must_use]
pub fn read_json_with_deserialize<P, T>(filepath: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let filepath = filepath.as_ref();
    let f = File::open(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.to_owned(), e))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| Error::DeserializeFromJson(filepath.to_owned(), e))
}

#[must_use]
pub fn read_toml_with_deserialize<P, T>(filepath: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let filepath = filepath.as_ref();
    let s = self::read_to_string(filepath)?;
    toml::from_str(&s).map_err(|e| Error::DeserializeFromToml(filepath.to_owned(), e))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file_error_carries_path() {
        let path = Path::new("/nonexistent/jsgrade/exercise.json");
        let err = read_to_string(path).unwrap_err();
        match err {
            Error::SingleIO(_, p, _) => assert_eq!(p, path),
            e => panic!("unexpected error: {:?}", e),
        }
        assert!(err_to_string(read_to_string(path)).contains("exercise.json"));
    }

    fn err_to_string<T>(r: Result<T>) -> String {
        r.err().map(|e| e.to_string()).unwrap_or_default()
    }
}
