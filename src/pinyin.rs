//! Rendering of numbered-tone pinyin (`yi1 lan3 zi5`) into tone marks
//! (`yīlǎnzi`) and into the toneless search form (`yilanzi`).

const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'ü'];

// rows 0 and 5 carry no mark
const TONE_TABLE: [[char; 6]; 6] = [
  ['a', 'e', 'i', 'o', 'u', 'ü'],
  ['ā', 'ē', 'ī', 'ō', 'ū', 'ǖ'],
  ['á', 'é', 'í', 'ó', 'ú', 'ǘ'],
  ['ǎ', 'ě', 'ǐ', 'ǒ', 'ǔ', 'ǚ'],
  ['à', 'è', 'ì', 'ò', 'ù', 'ǜ'],
  ['a', 'e', 'i', 'o', 'u', 'ü'],
];

fn fold_case(c: char) -> char {
  c.to_lowercase().next().unwrap_or(c)
}

fn marked_vowel(vowel: char, tone: usize) -> char {
  let lower = fold_case(vowel);
  match VOWELS.iter().position(|v| *v == lower) {
    Some(column) if tone < TONE_TABLE.len() => {
      let marked = TONE_TABLE[tone][column];
      if lower == vowel {
        marked
      } else {
        marked.to_uppercase().next().unwrap_or(marked)
      }
    }
    _ => vowel,
  }
}

/// Splits a syllable into its base and tone. A syllable without a trailing
/// `1`..`5` has tone 0 and is returned whole.
fn split_tone(syllable: &str) -> (&str, usize) {
  match syllable.chars().last() {
    Some(c @ '1'..='5') => (
      &syllable[..syllable.len() - 1],
      c.to_digit(10).unwrap_or(0) as usize,
    ),
    _ => (syllable, 0),
  }
}

/// Char index of the vowel that carries the tone mark, if any. Vowels match
/// in either case.
fn mark_position(base: &str) -> Option<usize> {
  let chars: Vec<char> = base.chars().map(fold_case).collect();
  if let Some(i) = chars.iter().position(|c| *c == 'a') {
    return Some(i);
  }
  if let Some(i) = chars.iter().position(|c| *c == 'e') {
    return Some(i);
  }
  if let Some(i) = chars.windows(2).position(|w| *w == ['o', 'u']) {
    return Some(i);
  }
  chars
    .iter()
    .rposition(|c| matches!(*c, 'i' | 'ü' | 'o' | 'u'))
}

fn syllable_to_tone_marks(syllable: &str) -> String {
  let syllable = syllable.replace("u:", "ü").replace("U:", "Ü");
  let (base, tone) = split_tone(&syllable);
  if tone == 0 || tone == 5 {
    return base.to_string();
  }
  match mark_position(base) {
    Some(i) => {
      let mut marked = String::with_capacity(base.len() + 1);
      for (j, c) in base.chars().enumerate() {
        if j == i {
          marked.push(marked_vowel(c, tone));
        } else {
          marked.push(c);
        }
      }
      marked
    }
    None => base.to_string(),
  }
}

fn syllable_to_toneless(syllable: &str) -> String {
  let syllable = syllable
    .replace("u:", "v")
    .replace('ü', "v")
    .replace("U:", "V")
    .replace('Ü', "V");
  split_tone(&syllable).0.to_string()
}

/// Renders space-separated numbered pinyin with tone marks, joining the
/// syllables without separators. Tokens that cannot be marked, such as
/// punctuation, are kept as they are.
///
/// ```
/// use cedict::pinyin::to_tone_marks;
///
/// assert_eq!(to_tone_marks("yi1 lan3 zi5"), "yīlǎnzi");
/// ```
pub fn to_tone_marks(pinyin: &str) -> String {
  pinyin.split(' ').map(syllable_to_tone_marks).collect()
}

/// Renders space-separated numbered pinyin without tones, with `ü` written
/// as `v`.
pub fn to_toneless(pinyin: &str) -> String {
  pinyin.split(' ').map(syllable_to_toneless).collect()
}
