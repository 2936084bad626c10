use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use thiserror::Error;

use super::pinyin::{to_tone_marks, to_toneless};

lazy_static! {
  static ref ENTRY_PATTERN: Regex = Regex::new(
    r"^(?P<trad>\S+)\s+(?P<simp>\S+)\s+\[(?P<pinyin>[^\]]*)\]\s*/(?P<defs>.*)/\s*$"
  )
  .unwrap();
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseEntryErr {
  #[error("badly formatted entry: {0}")]
  InvalidFormatErr(String),
  #[error("entry is not valid utf-8: {0}")]
  InvalidUtf8Err(String),
}

/// A single dictionary record.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
  traditional: String,
  simplified: String,
  pinyin: String,
  pinyin_tone_marks: String,
  pinyin_plain: String,
  definitions: Vec<String>,
}

impl Entry {
  pub fn new(
    traditional: String,
    simplified: String,
    pinyin: String,
    definitions: Vec<String>,
  ) -> Entry {
    let pinyin_tone_marks = to_tone_marks(&pinyin);
    let pinyin_plain = to_toneless(&pinyin);
    Entry {
      traditional,
      simplified,
      pinyin,
      pinyin_tone_marks,
      pinyin_plain,
      definitions,
    }
  }
  pub fn traditional(&self) -> &str {
    &self.traditional
  }
  pub fn simplified(&self) -> &str {
    &self.simplified
  }
  pub fn pinyin(&self) -> &str {
    &self.pinyin
  }
  pub fn pinyin_tone_marks(&self) -> &str {
    &self.pinyin_tone_marks
  }
  pub fn pinyin_plain(&self) -> &str {
    &self.pinyin_plain
  }
  pub fn definitions(&self) -> &[String] {
    &self.definitions
  }
  pub fn to_string(&self, print_all: bool) -> Vec<String> {
    let mut list_info = vec![
      self.traditional.clone(),
      self.simplified.clone(),
      self.pinyin.clone(),
    ];
    if print_all {
      list_info.push(self.pinyin_tone_marks.clone());
      list_info.push(self.pinyin_plain.clone());
    }
    list_info.push(self.definitions.join("/"));
    list_info
  }
  pub fn to_json(&self) -> Value {
    json!({
      "traditional": self.traditional,
      "simplified": self.simplified,
      "pinyin": self.pinyin,
      "pinyinToneMarks": self.pinyin_tone_marks,
      "pinyinPlain": self.pinyin_plain,
      "definitions": self.definitions,
    })
  }
}

/// Parses one entry line of the form
/// `一之為甚 一之为甚 [yi1 zhi1 wei2 shen4] /Once is enough (idiom)/`.
pub fn parse_entry(line: &str) -> Result<Entry, ParseEntryErr> {
  let caps = ENTRY_PATTERN
    .captures(line)
    .ok_or_else(|| ParseEntryErr::InvalidFormatErr(line.to_string()))?;
  let definitions: Vec<String> = caps["defs"]
    .split('/')
    .filter(|d| !d.is_empty())
    .map(|d| d.to_string())
    .collect();
  if definitions.is_empty() {
    return Err(ParseEntryErr::InvalidFormatErr(line.to_string()));
  }
  Ok(Entry::new(
    caps["trad"].to_string(),
    caps["simp"].to_string(),
    caps["pinyin"].to_lowercase(),
    definitions,
  ))
}
