//! Utilities for reading tables.

use std::{
    fs,
    io::{self, BufRead},
    path::Path,
};

use flate2::bufread::MultiGzDecoder;

use crate::Input;

use super::{Error, Table};

/// A builder to read a [`Table`].
#[derive(Debug)]
pub struct Builder {
    delimiter: u8,
    compression_method: Option<Option<CompressionMethod>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            compression_method: None,
        }
    }
}

impl Builder {
    /// Read table from reader.
    ///
    /// Unless set explicitly, gzip compression is detected from the start of the stream.
    pub fn read<R>(self, mut reader: R) -> Result<Table, Error>
    where
        R: BufRead,
    {
        let compression_method = match self.compression_method {
            Some(method) => method,
            None => CompressionMethod::detect(&mut reader)?,
        };

        match compression_method {
            Some(CompressionMethod::Gzip) => self.read_delimited(MultiGzDecoder::new(reader)),
            None => self.read_delimited(reader),
        }
    }

    fn read_delimited<R>(&self, reader: R) -> Result<Table, Error>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = reader
            .headers()?
            .iter()
            .map(|name| name.trim().to_string())
            .collect::<Vec<_>>();

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Table::new(header, records))
    }

    /// Read table from an input source.
    pub fn read_input(self, input: &Input) -> Result<Table, Error> {
        self.read(input.open()?)
    }

    /// Read table from path.
    pub fn read_from_path<P>(self, path: P) -> Result<Table, Error>
    where
        P: AsRef<Path>,
    {
        self.read(io::BufReader::new(fs::File::open(path)?))
    }

    /// Set compression method.
    ///
    /// If unset, the compression method will automatically be detected when reading.
    pub fn set_compression_method(mut self, compression_method: Option<CompressionMethod>) -> Self {
        self.compression_method = Some(compression_method);
        self
    }

    /// Set field delimiter.
    ///
    /// By default, the table is assumed to be tab-delimited.
    pub fn set_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// A compression method.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionMethod {
    /// Gzip, including BGZF.
    Gzip,
}

impl CompressionMethod {
    fn detect<R>(reader: &mut R) -> io::Result<Option<Self>>
    where
        R: BufRead,
    {
        const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

        let src = reader.fill_buf()?;

        if src.get(..GZIP_MAGIC_NUMBER.len()) == Some(&GZIP_MAGIC_NUMBER[..]) {
            Ok(Some(Self::Gzip))
        } else {
            Ok(None)
        }
    }
}
