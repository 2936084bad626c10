//! ```
//! use std::io::Cursor;
//! use cedict::prelude::*;
//!
//! let dict = "# CC-CEDICT
//! 一層 一层 [yi1 ceng2] /layer/
//! 一攬子 一揽子 [yi1 lan3 zi5] /all-inclusive/undiscriminating/";
//!
//! let mut cedict = CEDict::new(Cursor::new(dict));
//! loop {
//!     match cedict.next_entry() {
//!         Ok(()) => {
//!             let entry = cedict.entry().unwrap();
//!             println!("{} {}", entry.simplified(), entry.definitions()[0]);
//!         }
//!         // any other error is a read failure or a badly formatted line
//!         Err(e) if e.is_end_of_stream() => break,
//!         Err(e) => panic!("{}", e),
//!     }
//! }
//! // => 一层 layer
//! // => 一揽子 all-inclusive
//!
//! // Tone marks
//!
//! let entry = parse_entry("一攬子 一揽子 [yi1 lan3 zi5] /all-inclusive/undiscriminating/").unwrap();
//! assert_eq!(entry.pinyin_tone_marks(), "yīlǎnzi");
//! assert_eq!(entry.pinyin_plain(), "yilanzi");
//!
//! assert_eq!(to_tone_marks("yan3 bu4 jian4 , xin1 bu4 fan2"), "yǎnbùjiàn,xīnbùfán");
//! ```

#![crate_name = "cedict"]
#![crate_type = "lib"]
#![crate_type = "rlib"]

pub mod config;
pub mod entry;
pub mod pinyin;
mod resources;
pub mod tokenizer;

pub mod prelude {
  pub use crate::entry::{parse_entry, Entry};
  pub use crate::pinyin::{to_tone_marks, to_toneless};
  pub use crate::tokenizer::{CEDict, CedictErr, TokenType};
}
