use std::{fmt, io};

use anyhow::Error;

/// Placeholder for values that were not computed.
pub const MISSING: &str = "NA";

#[derive(Debug)]
pub struct Writer<W> {
    inner: W,
    delimiter: char,
    precision: usize,
}

impl Writer<io::StdoutLock<'static>> {
    pub fn stdout(delimiter: char, precision: usize) -> Self {
        Self::new(io::stdout().lock(), delimiter, precision)
    }
}

impl<W> Writer<W>
where
    W: io::Write,
{
    pub fn new(inner: W, delimiter: char, precision: usize) -> Self {
        Self {
            inner,
            delimiter,
            precision,
        }
    }

    pub fn format_value(&self, value: Option<f64>) -> String {
        match value {
            Some(value) => format!("{value:.precision$}", precision = self.precision),
            None => String::from(MISSING),
        }
    }

    pub fn write_with_delimiter<I>(&mut self, items: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        for (i, x) in items.into_iter().enumerate() {
            if i > 0 {
                write!(self.inner, "{}", self.delimiter)?;
            }
            write!(self.inner, "{x}")?;
        }
        writeln!(self.inner)?;

        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_with_delimiter() {
        let mut writer = Writer::new(Vec::new(), ',', 2);
        writer.write_with_delimiter(["a", "b", "c"]).unwrap();
        let values = [Some(0.5), None, Some(f64::INFINITY)].map(|v| writer.format_value(v));
        writer.write_with_delimiter(values).unwrap();

        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "a,b,c\n0.50,NA,inf\n"
        );
    }
}
