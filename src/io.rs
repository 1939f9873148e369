use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{PagerError, Result};
use crate::translation::{Statistics, TranslationRecord};

/// Read logical addresses from a file, one per line
pub fn read_addresses<P: AsRef<Path>>(path: P) -> Result<Vec<i32>> {
    let content = fs::read_to_string(path.as_ref()).map_err(|source| PagerError::InputOpen {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    parse_addresses(&content)
}

/// Parse one signed 32-bit address per line. Blank lines are skipped.
pub fn parse_addresses(content: &str) -> Result<Vec<i32>> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, token)| !token.is_empty())
        .map(|(line, token)| {
            token.parse::<i32>().map_err(|_| PagerError::InvalidAddress {
                line,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Writes translation records followed by the fault summary
pub struct ReportWriter<W: Write> {
    out: W,
}

impl ReportWriter<BufWriter<Box<dyn Write>>> {
    /// Report to a file, or to stdout when `path` is `-`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let sink: Box<dyn Write> = if path == Path::new("-") {
            Box::new(io::stdout().lock())
        } else {
            let file = File::create(path).map_err(|source| PagerError::OutputOpen {
                path: path.to_path_buf(),
                source,
            })?;
            Box::new(file)
        };
        Ok(ReportWriter::new(BufWriter::new(sink)))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        ReportWriter { out }
    }

    pub fn write_record(&mut self, record: &TranslationRecord) -> Result<()> {
        writeln!(self.out, "{}", record)?;
        Ok(())
    }

    pub fn write_records(&mut self, records: &[TranslationRecord]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Write the fault count and fault rate. An empty run reports a rate of 0.
    pub fn write_summary(&mut self, stats: &Statistics) -> Result<()> {
        let rate = stats.fault_rate().unwrap_or_else(|| {
            log::warn!("no addresses were translated; reporting a fault rate of 0");
            0.0
        });
        writeln!(self.out, "Page Faults = {}", stats.fault_count)?;
        writeln!(self.out, "Page Fault Rate = {:.3}", rate)?;
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addresses() {
        let addresses = parse_addresses("16916\n62493\n30198\n").unwrap();
        assert_eq!(addresses, vec![16916, 62493, 30198]);
    }

    #[test]
    fn test_parse_keeps_last_line_without_newline() {
        let addresses = parse_addresses("1\n2").unwrap();
        assert_eq!(addresses, vec![1, 2]);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_whitespace() {
        let addresses = parse_addresses("  12 \r\n\n\t34\n\n").unwrap();
        assert_eq!(addresses, vec![12, 34]);
    }

    #[test]
    fn test_parse_negative_and_extremes() {
        let addresses = parse_addresses("-5\n2147483647\n-2147483648").unwrap();
        assert_eq!(addresses, vec![-5, i32::MAX, i32::MIN]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_addresses("").unwrap().is_empty());
        assert!(parse_addresses("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_reports_line() {
        let err = parse_addresses("1\n2\nabc\n4").unwrap_err();
        match err {
            PagerError::InvalidAddress { line, token } => {
                assert_eq!(line, 3);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {}", other),
        }

        // Out of i32 range
        assert!(parse_addresses("2147483648").is_err());
    }

    #[test]
    fn test_read_missing_input() {
        let err = read_addresses("/nonexistent/addresses.txt").unwrap_err();
        assert!(matches!(err, PagerError::InputOpen { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_report_format() {
        let records = vec![
            TranslationRecord { logical_raw: 16916, physical_raw: 20, value: 0 },
            TranslationRecord { logical_raw: 62493, physical_raw: 285, value: 0 },
            TranslationRecord { logical_raw: 30198, physical_raw: 758, value: 29 },
            TranslationRecord { logical_raw: 53683, physical_raw: 947, value: 108 },
            TranslationRecord { logical_raw: 40185, physical_raw: 1273, value: -2 },
        ];
        let stats = Statistics { fault_count: 5, address_count: 5 };

        let mut report = ReportWriter::new(Vec::new());
        report.write_records(&records).unwrap();
        report.write_summary(&stats).unwrap();
        let text = String::from_utf8(report.finish().unwrap()).unwrap();

        let expected = "\
Virtual address: 16916 Physical address: 20 Value: 0
Virtual address: 62493 Physical address: 285 Value: 0
Virtual address: 30198 Physical address: 758 Value: 29
Virtual address: 53683 Physical address: 947 Value: 108
Virtual address: 40185 Physical address: 1273 Value: -2
Page Faults = 5
Page Fault Rate = 1.000
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_summary_rounds_to_three_places() {
        let mut report = ReportWriter::new(Vec::new());
        report
            .write_summary(&Statistics { fault_count: 244, address_count: 1000 })
            .unwrap();
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        assert_eq!(text, "Page Faults = 244\nPage Fault Rate = 0.244\n");

        let mut report = ReportWriter::new(Vec::new());
        report
            .write_summary(&Statistics { fault_count: 1, address_count: 3 })
            .unwrap();
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        assert!(text.ends_with("Page Fault Rate = 0.333\n"));
    }

    #[test]
    fn test_summary_for_empty_run() {
        let mut report = ReportWriter::new(Vec::new());
        report.write_summary(&Statistics::default()).unwrap();
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        assert_eq!(text, "Page Faults = 0\nPage Fault Rate = 0.000\n");
    }

    #[test]
    fn test_create_in_missing_directory() {
        let err = ReportWriter::create("/nonexistent/dir/output.txt").err().unwrap();
        assert!(matches!(err, PagerError::OutputOpen { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
