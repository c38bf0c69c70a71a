//! Listing output in table, JSON, CSV and TSV form.
//!
//! Every listing command hands over its records twice: as serializable
//! values for JSON and as string rows for the tabular formats.

use crate::error::CliError;
use campus::config::OutputFormat;
use serde::Serialize;
use std::io::Write;

/// Rows ready for printing.
pub struct Listing<'a, T> {
    headers: &'a [&'a str],
    records: &'a [T],
    row: fn(&T) -> Vec<String>,
}

impl<'a, T: Serialize> Listing<'a, T> {
    /// Describes how to print `records`.
    pub fn new(headers: &'a [&'a str], records: &'a [T], row: fn(&T) -> Vec<String>) -> Self {
        Self {
            headers,
            records,
            row,
        }
    }

    /// Writes the listing to stdout.
    pub fn print(&self, format: OutputFormat) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.write_to(format, &mut handle)
    }

    /// Writes the listing to `out`.
    pub fn write_to<W: Write>(&self, format: OutputFormat, out: &mut W) -> Result<(), CliError> {
        match format {
            OutputFormat::Table => self.write_table(out),
            OutputFormat::Json => self.write_json(out),
            OutputFormat::Csv => self.write_delimited(out, b','),
            OutputFormat::Tsv => self.write_delimited(out, b'\t'),
        }
    }

    fn write_table<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        let rows: Vec<Vec<String>> = self.records.iter().map(self.row).collect();

        // Column widths from the header and every cell.
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = self.headers.iter().map(|h| h.to_uppercase()).collect();
        write_padded(out, &header, &widths)?;
        for row in &rows {
            write_padded(out, row, &widths)?;
        }
        Ok(())
    }

    fn write_json<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        serde_json::to_writer_pretty(&mut *out, self.records)
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
        writeln!(out)?;
        Ok(())
    }

    fn write_delimited<W: Write>(&self, out: &mut W, delimiter: u8) -> Result<(), CliError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(out);
        writer.write_record(self.headers).map_err(csv_error)?;
        for record in self.records {
            writer.write_record((self.row)(record)).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn write_padded<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> Result<(), CliError> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// `-` for a missing value in table cells.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Room {
        number: &'static str,
        capacity: u32,
    }

    fn row(room: &Room) -> Vec<String> {
        vec![room.number.to_string(), room.capacity.to_string()]
    }

    fn render(format: OutputFormat) -> String {
        let rooms = [
            Room {
                number: "A-1",
                capacity: 30,
            },
            Room {
                number: "Lab, West",
                capacity: 12,
            },
        ];
        let mut out = Vec::new();
        Listing::new(&["room", "capacity"], &rooms, row)
            .write_to(format, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_aligns_columns() {
        let table = render(OutputFormat::Table);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ROOM       CAPACITY");
        assert_eq!(lines[1], "A-1        30");
        assert_eq!(lines[2], "Lab, West  12");
    }

    #[test]
    fn test_csv_quotes_and_tsv_does_not_need_to() {
        let csv = render(OutputFormat::Csv);
        assert_eq!(csv, "room,capacity\nA-1,30\n\"Lab, West\",12\n");
        let tsv = render(OutputFormat::Tsv);
        assert_eq!(tsv, "room\tcapacity\nA-1\t30\nLab, West\t12\n");
    }

    #[test]
    fn test_json_is_an_array() {
        let json: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(json[1]["number"], "Lab, West");
        assert_eq!(json.as_array().unwrap().len(), 2);
    }
}
