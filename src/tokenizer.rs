use std::io::{BufRead, Error as IOError};

use log::{debug, warn};
use thiserror::Error;

use super::entry::{parse_entry, Entry, ParseEntryErr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
  Comment,
  Entry,
}

#[derive(Error, Debug)]
pub enum CedictErr {
  #[error("no more entries to read")]
  EndOfStream,
  #[error("{0}")]
  IOError(#[from] IOError),
  #[error("{source} at line {line}")]
  ParseEntryErr { line: usize, source: ParseEntryErr },
}

impl CedictErr {
  pub fn is_end_of_stream(&self) -> bool {
    matches!(self, CedictErr::EndOfStream)
  }
}

/// Reads CC-CEDICT formatted text one line at a time.
///
/// `scan`, `text` and `token_type` give access to every line, comments
/// included. `next_entry` and `entry` skip comments and parse entry lines.
pub struct CEDict<R> {
  reader: R,
  buf: Vec<u8>,
  line: String,
  valid_utf8: bool,
  line_number: usize,
  token_type: TokenType,
  entry: Option<Entry>,
  err: Option<IOError>,
  done: bool,
}

impl<R: BufRead> CEDict<R> {
  pub fn new(reader: R) -> CEDict<R> {
    CEDict {
      reader,
      buf: vec![],
      line: String::new(),
      valid_utf8: true,
      line_number: 0,
      token_type: TokenType::Entry,
      entry: None,
      err: None,
      done: false,
    }
  }

  /// Reads the next line. Returns false once the stream is exhausted or a
  /// read fails, and keeps returning false afterwards. A failure is
  /// available from `err`.
  ///
  /// A line that is not valid UTF-8 is still returned; `text` then holds a
  /// lossy copy and `next_entry` reports it as a badly formatted entry.
  pub fn scan(&mut self) -> bool {
    if self.done {
      return false;
    }
    self.buf.clear();
    self.line.clear();
    match self.reader.read_until(b'\n', &mut self.buf) {
      Ok(0) => {
        self.done = true;
        false
      }
      Ok(_) => {
        if self.buf.ends_with(b"\n") {
          self.buf.pop();
          if self.buf.ends_with(b"\r") {
            self.buf.pop();
          }
        }
        self.line_number += 1;
        match std::str::from_utf8(&self.buf) {
          Ok(line) => {
            self.line.push_str(line);
            self.valid_utf8 = true;
          }
          Err(_) => {
            warn!("invalid utf-8 at line {}", self.line_number);
            self.line.push_str(&String::from_utf8_lossy(&self.buf));
            self.valid_utf8 = false;
          }
        }
        self.token_type = if self.buf.starts_with(b"#") {
          TokenType::Comment
        } else {
          TokenType::Entry
        };
        true
      }
      Err(e) => {
        warn!("read failed after line {}: {}", self.line_number, e);
        self.err = Some(e);
        self.done = true;
        false
      }
    }
  }
  pub fn text(&self) -> &str {
    &self.line
  }
  pub fn token_type(&self) -> TokenType {
    self.token_type
  }
  pub fn line_number(&self) -> usize {
    self.line_number
  }
  pub fn err(&self) -> Option<&IOError> {
    self.err.as_ref()
  }

  /// Advances past comments to the next entry line and parses it.
  ///
  /// A badly formatted line is reported as `CedictErr::ParseEntryErr` and
  /// calling `next_entry` again resumes at the line after it. A read
  /// failure is returned once; later calls report `EndOfStream`.
  pub fn next_entry(&mut self) -> Result<(), CedictErr> {
    self.entry = None;
    while self.scan() {
      match self.token_type {
        TokenType::Comment => debug!("skip comment at line {}", self.line_number),
        TokenType::Entry => {
          let parsed = if self.valid_utf8 {
            parse_entry(&self.line)
          } else {
            Err(ParseEntryErr::InvalidUtf8Err(self.line.clone()))
          };
          let entry = parsed.map_err(|source| CedictErr::ParseEntryErr {
            line: self.line_number,
            source,
          })?;
          self.entry = Some(entry);
          return Ok(());
        }
      }
    }
    match self.err.take() {
      Some(e) => Err(CedictErr::IOError(e)),
      None => Err(CedictErr::EndOfStream),
    }
  }
  pub fn entry(&self) -> Option<&Entry> {
    self.entry.as_ref()
  }
  pub fn entries(self) -> Entries<R> {
    Entries { cedict: self }
  }
}

/// Iterator over parsed entries, ending at the end of the stream.
pub struct Entries<R> {
  cedict: CEDict<R>,
}

impl<R: BufRead> Iterator for Entries<R> {
  type Item = Result<Entry, CedictErr>;
  fn next(&mut self) -> Option<Self::Item> {
    match self.cedict.next_entry() {
      Ok(()) => self.cedict.entry.take().map(Ok),
      Err(CedictErr::EndOfStream) => None,
      Err(e) => Some(Err(e)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::{BufReader, Cursor, ErrorKind as IOErrorKind, Read, Result as IOResult};

  const SAMPLE: &str = include_str!("resources/test/sample.u8");

  struct FailingReader {
    data: Cursor<Vec<u8>>,
  }

  impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> IOResult<usize> {
      match self.data.read(buf)? {
        0 => Err(IOError::new(IOErrorKind::Other, "broken pipe")),
        n => Ok(n),
      }
    }
  }

  fn collect(cedict: &mut CEDict<Cursor<&str>>) -> Vec<(String, String)> {
    let mut entries = vec![];
    loop {
      match cedict.next_entry() {
        Ok(()) => {
          let entry = cedict.entry().unwrap();
          entries.push((entry.simplified().to_string(), entry.definitions()[0].clone()));
        }
        Err(CedictErr::EndOfStream) => break,
        Err(e) => panic!("{}", e),
      }
    }
    entries
  }

  #[test]
  fn test_next_entry() {
    let mut cedict = CEDict::new(Cursor::new(SAMPLE));
    let entries = collect(&mut cedict);
    assert_eq!(
      vec![
        ("一团火".to_string(), "fireball".to_string()),
        ("一团".to_string(), "1 regiment".to_string()),
        ("一层".to_string(), "layer".to_string()),
        ("一揽子".to_string(), "all-inclusive".to_string()),
        ("一东一西".to_string(), "far apart".to_string()),
      ],
      entries
    );
    assert!(cedict.entry().is_none());
    assert!(cedict.err().is_none());
    assert!(cedict.next_entry().unwrap_err().is_end_of_stream());
  }

  #[test]
  fn test_entry_fields() {
    let mut cedict = CEDict::new(Cursor::new("一攬子 一揽子 [yi1 lan3 zi5] /all-inclusive/undiscriminating/"));
    cedict.next_entry().unwrap();
    let entry = cedict.entry().unwrap();
    assert_eq!("一攬子", entry.traditional());
    assert_eq!("一揽子", entry.simplified());
    assert_eq!("yi1 lan3 zi5", entry.pinyin());
    assert_eq!("yīlǎnzi", entry.pinyin_tone_marks());
    assert_eq!("yilanzi", entry.pinyin_plain());
    assert_eq!(vec!["all-inclusive", "undiscriminating"], entry.definitions());
  }

  #[test]
  fn test_scan() {
    let mut cedict = CEDict::new(Cursor::new("# CC-CEDICT\r\n一層 一层 [yi1 ceng2] /layer/\r\n\n"));
    assert!(cedict.scan());
    assert_eq!(TokenType::Comment, cedict.token_type());
    assert_eq!("# CC-CEDICT", cedict.text());
    assert!(cedict.scan());
    assert_eq!(TokenType::Entry, cedict.token_type());
    assert_eq!("一層 一层 [yi1 ceng2] /layer/", cedict.text());
    assert_eq!(2, cedict.line_number());
    assert!(cedict.scan());
    assert_eq!(TokenType::Entry, cedict.token_type());
    assert_eq!("", cedict.text());
    assert!(!cedict.scan());
    assert!(!cedict.scan());
  }

  #[test]
  fn test_empty_stream() {
    let mut cedict = CEDict::new(Cursor::new(""));
    assert!(!cedict.scan());
    let mut cedict = CEDict::new(Cursor::new(""));
    assert!(cedict.next_entry().unwrap_err().is_end_of_stream());
    assert!(cedict.entry().is_none());
  }

  #[test]
  fn test_only_comments() {
    let mut cedict = CEDict::new(Cursor::new("# one\n# two\n"));
    assert!(cedict.next_entry().unwrap_err().is_end_of_stream());
  }

  #[test]
  fn test_bad_format_then_resume() {
    let mut cedict = CEDict::new(Cursor::new(
      "# header\n一層 一层 [yi1 ceng2 /layer/\n\n一團 一团 [yi1 tuan2] /1 regiment/\n",
    ));
    match cedict.next_entry() {
      Err(CedictErr::ParseEntryErr { line, .. }) => assert_eq!(2, line),
      r => panic!("unexpected {:?}", r),
    }
    assert!(cedict.entry().is_none());
    match cedict.next_entry() {
      Err(CedictErr::ParseEntryErr { line, .. }) => assert_eq!(3, line),
      r => panic!("unexpected {:?}", r),
    }
    cedict.next_entry().unwrap();
    assert_eq!("一团", cedict.entry().unwrap().simplified());
    assert!(cedict.next_entry().unwrap_err().is_end_of_stream());
  }

  #[test]
  fn test_invalid_utf8_then_resume() {
    let mut data = b"\xff\xfe bad [x1] /y/\n".to_vec();
    data.extend_from_slice("一層 一层 [yi1 ceng2] /layer/\n".as_bytes());
    let mut cedict = CEDict::new(Cursor::new(data));
    match cedict.next_entry() {
      Err(CedictErr::ParseEntryErr {
        line,
        source: ParseEntryErr::InvalidUtf8Err(text),
      }) => {
        assert_eq!(1, line);
        assert_eq!("\u{fffd}\u{fffd} bad [x1] /y/", text);
      }
      r => panic!("unexpected {:?}", r),
    }
    assert!(cedict.err().is_none());
    cedict.next_entry().unwrap();
    assert_eq!("一层", cedict.entry().unwrap().simplified());
    assert!(cedict.next_entry().unwrap_err().is_end_of_stream());
  }

  #[test]
  fn test_scan_invalid_utf8_comment() {
    let mut cedict = CEDict::new(Cursor::new(b"# \xff\n".to_vec()));
    assert!(cedict.scan());
    assert_eq!(TokenType::Comment, cedict.token_type());
    assert_eq!("# \u{fffd}", cedict.text());
    assert!(!cedict.scan());
  }

  #[test]
  fn test_missing_definitions() {
    let mut cedict = CEDict::new(Cursor::new("一層 一层 [yi1 ceng2]"));
    assert!(matches!(
      cedict.next_entry(),
      Err(CedictErr::ParseEntryErr { line: 1, .. })
    ));
    assert!(cedict.entry().is_none());
  }

  #[test]
  fn test_read_failure() {
    let reader = BufReader::new(FailingReader {
      data: Cursor::new("一層 一层 [yi1 ceng2] /layer/\n".as_bytes().to_vec()),
    });
    let mut cedict = CEDict::new(reader);
    cedict.next_entry().unwrap();
    assert_eq!("一层", cedict.entry().unwrap().simplified());
    match cedict.next_entry() {
      Err(CedictErr::IOError(e)) => assert_eq!(IOErrorKind::Other, e.kind()),
      r => panic!("unexpected {:?}", r),
    }
    assert!(cedict.entry().is_none());
    assert!(!cedict.scan());
    assert!(cedict.next_entry().unwrap_err().is_end_of_stream());
  }

  #[test]
  fn test_read_failure_on_scan() {
    let reader = BufReader::new(FailingReader {
      data: Cursor::new(vec![]),
    });
    let mut cedict = CEDict::new(reader);
    assert!(!cedict.scan());
    assert_eq!(IOErrorKind::Other, cedict.err().unwrap().kind());
  }

  #[test]
  fn test_entries() {
    let entries: Vec<Entry> = CEDict::new(Cursor::new(SAMPLE))
      .entries()
      .collect::<Result<_, _>>()
      .unwrap();
    assert_eq!(5, entries.len());
    assert_eq!("yītuánhuǒ", entries[0].pinyin_tone_marks());
    assert_eq!("yidongyixi", entries[4].pinyin_plain());
  }
}
