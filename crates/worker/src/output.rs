//! Row output for the job binary.

use std::io::{self, Stdout, Write};

use pgcall_db::{ResultRow, RowSink};

/// Writes each row on its own line as soon as it arrives.
pub struct WriterSink<W> {
    writer: W,
}

impl WriterSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> RowSink for WriterSink<W> {
    fn write_row(&mut self, row: &ResultRow) {
        if let Err(e) = writeln!(self.writer, "{row}").and_then(|()| self.writer.flush()) {
            tracing::warn!(error = %e, "Failed to write result row");
        }
    }
}

#[cfg(test)]
mod tests {
    use pgcall_db::CellValue;

    use super::*;

    #[test]
    fn rows_are_written_one_per_line() {
        let mut sink = WriterSink::new(Vec::<u8>::new());
        sink.write_row(&ResultRow(vec![CellValue::Text("HELLO WORLD".to_string())]));
        sink.write_row(&ResultRow(vec![CellValue::Int(2), CellValue::Null]));

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "(\"HELLO WORLD\")\n(2, NULL)\n");
    }

    #[test]
    fn nothing_written_without_rows() {
        let sink = WriterSink::new(Vec::<u8>::new());
        assert!(sink.into_inner().is_empty());
    }
}
