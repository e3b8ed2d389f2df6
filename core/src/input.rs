//! Input sources for reading repertoire tables.

use std::{
    env,
    fs::File,
    io::{self, IsTerminal as _},
    path::{Path, PathBuf},
};

/// An input source for reading.
#[derive(Debug)]
pub enum Input {
    /// A path from which to read a file.
    Path(PathBuf),
    /// Stdin.
    Stdin,
}

impl Input {
    /// By default, reading an `Input` checks that either a path is provided, or that input is
    /// available via stdin, instead of hanging.
    ///
    /// In some contexts, e.g. testing, this can cause issues, and so it may be disabled by setting
    /// this environment variable, or by using [`Input::new_unchecked`].
    pub const ENV_KEY_DISABLE_CHECK: &'static str = "REPSTAT_ALLOW_STDIN";

    /// Creates a new input source.
    pub fn new(input: Option<PathBuf>) -> io::Result<Self> {
        let check = env::var(Self::ENV_KEY_DISABLE_CHECK).is_err();

        if input.is_some() && !io::stdin().is_terminal() && check {
            Err(io::Error::new(
                io::ErrorKind::Other,
                "received input both via file and stdin",
            ))
        } else if input.is_none() && io::stdin().is_terminal() && check {
            Err(io::Error::new(
                io::ErrorKind::Other,
                "received no input via file or stdin",
            ))
        } else {
            Ok(Self::new_unchecked(input))
        }
    }

    /// Creates a new input source without checking that any data is available.
    pub fn new_unchecked(input: Option<PathBuf>) -> Self {
        if let Some(path) = input {
            Self::Path(path)
        } else {
            Self::Stdin
        }
    }

    /// Open the input for reading.
    pub fn open(&self) -> io::Result<Reader> {
        match self {
            Input::Path(path) => File::open(path).map(io::BufReader::new).map(Reader::File),
            Input::Stdin => Ok(Reader::Stdin(io::stdin().lock())),
        }
    }

    /// Returns the provided path if provided, otherwise `None`.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Input::Path(path) => Some(path.as_ref()),
            Input::Stdin => None,
        }
    }

    /// Returns a short name for the input.
    ///
    /// This is the file name without any `.gz` and table extensions for paths, and `stdin`
    /// otherwise. It serves as the default donor id for repertoires read from the input.
    pub fn name(&self) -> String {
        match self {
            Input::Path(path) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let name = name.strip_suffix(".gz").unwrap_or(&name);

                [".tsv", ".csv", ".txt"]
                    .iter()
                    .find_map(|ext| name.strip_suffix(ext))
                    .unwrap_or(name)
                    .to_string()
            }
            Input::Stdin => String::from("stdin"),
        }
    }
}

impl From<Input> for Option<PathBuf> {
    fn from(input: Input) -> Self {
        match input {
            Input::Path(path) => Some(path),
            Input::Stdin => None,
        }
    }
}

/// A reader from either a file or stdin.
#[derive(Debug)]
pub enum Reader {
    /// A reader from a file.
    File(io::BufReader<File>),
    /// A reader stdin.
    Stdin(io::StdinLock<'static>),
}

impl io::Read for Reader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Reader::File(reader) => reader.read(buf),
            Reader::Stdin(reader) => reader.read(buf),
        }
    }
}

impl io::BufRead for Reader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Reader::File(reader) => reader.fill_buf(),
            Reader::Stdin(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Reader::File(reader) => reader.consume(amt),
            Reader::Stdin(reader) => reader.consume(amt),
        }
    }
}
