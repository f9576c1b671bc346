//! JSON-lines event source
//!
//! One event per line. Blank lines and lines starting with `#` are skipped.
//! A line that fails to decode (bad UTF-8 or bad JSON) yields an error and
//! reading carries on; an I/O error yields one error and ends the stream.

use std::io::{BufRead, ErrorKind};

use crate::error::MatchingError;
use crate::event::OrderEvent;

/// Iterator over the events of a JSON-lines stream
pub struct JsonLinesSource<R> {
    reader: R,
    line_number: usize,
    buffer: Vec<u8>,
    done: bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn malformed(&self, message: impl ToString) -> MatchingError {
        MatchingError::MalformedEvent {
            line: self.line_number,
            message: message.to_string(),
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<OrderEvent, MatchingError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_number += 1;
                    let line = match std::str::from_utf8(&self.buffer) {
                        Ok(line) => line.trim(),
                        Err(e) => return Some(Err(self.malformed(e))),
                    };
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    return Some(serde_json::from_str(line).map_err(|e| self.malformed(e)));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(MatchingError::Source(e.to_string())));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::{self, BufReader, Cursor, Read};

    /// Reader whose every read fails, like a directory opened as a file
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "is a directory"))
        }
    }

    #[test]
    fn test_reads_events_and_skips_comments() {
        let input = r#"
# opening orders
{"type":"new_order","id":"B1","symbol":"IBM","size":100,"limit_price":100.0}

{"type":"cancel_replace","target_id":"B1"}
{"type":"heartbeat"}
"#;
        let events: Vec<_> = JsonLinesSource::new(Cursor::new(input)).collect();

        assert_eq!(events.len(), 3);
        assert_matches!(&events[0], Ok(OrderEvent::NewOrder(order)) if order.id == "B1");
        assert_matches!(
            &events[1],
            Ok(OrderEvent::CancelReplace(request)) if request.is_pure_cancel()
        );
        assert_matches!(&events[2], Ok(OrderEvent::Unsupported));
    }

    #[test]
    fn test_malformed_line_reports_position_and_continues() {
        let input = concat!(
            "{\"type\":\"new_order\",\"id\":\"A\"\n",
            "not json\n",
            "{\"type\":\"new_order\",\"id\":\"B\",\"symbol\":\"X\",\"size\":-5}\n",
        );
        let mut source = JsonLinesSource::new(Cursor::new(input));

        assert_matches!(
            source.next(),
            Some(Err(MatchingError::MalformedEvent { line: 1, .. }))
        );
        assert_matches!(
            source.next(),
            Some(Err(MatchingError::MalformedEvent { line: 2, .. }))
        );
        assert_matches!(
            source.next(),
            Some(Ok(OrderEvent::NewOrder(order))) if order.limit_price.is_none()
        );
        assert!(source.next().is_none());
        assert_eq!(source.line_number(), 3);
    }

    #[test]
    fn test_invalid_utf8_line_is_counted() {
        let input: &[u8] = b"\xff\xfe\nnot json\n";
        let mut source = JsonLinesSource::new(Cursor::new(input));

        assert_matches!(
            source.next(),
            Some(Err(MatchingError::MalformedEvent { line: 1, .. }))
        );
        assert_matches!(
            source.next(),
            Some(Err(MatchingError::MalformedEvent { line: 2, .. }))
        );
        assert!(source.next().is_none());
    }

    #[test]
    fn test_read_error_ends_the_stream() {
        let mut source = JsonLinesSource::new(BufReader::new(FailingReader));

        assert_matches!(source.next(), Some(Err(MatchingError::Source(_))));
        assert!(source.next().is_none());
        assert!(source.next().is_none());
        assert_eq!(JsonLinesSource::new(BufReader::new(FailingReader)).take(100).count(), 1);
    }
}
