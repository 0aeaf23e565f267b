//! Player name normalization
//!
//! Every name goes through [`canonical_name`] before it is validated, stored or
//! compared. Two spellings of the same name (full-width vs half-width, stray
//! spaces, different long-vowel marks) end up as the same canonical string.
//!
//! 规则:
//! - NFKC (全角英数 → 半角, 半角カナ → 全角カナ)
//! - 去掉所有空白
//! - カナ后面的各种横线统一为长音符 `ー`
//! - `looking` (不分大小写) 是占位符，不参与重复检查

use unicode_normalization::UnicodeNormalization;

/// Placeholder for an open spot in the party
pub const LOOKING_TOKEN: &str = "looking";

/// Reserved word that is never accepted as a player name
const RESERVED_NAME: &str = "コーチ";

/// 长音符
const CHOONPU: char = 'ー';

/// Name-policy violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("name is too long ({len} chars, max {max})")]
    TooLong { len: usize, max: usize },

    #[error("character {0:?} is not allowed")]
    DisallowedChar(char),

    #[error("name is reserved")]
    Reserved,
}

impl NameError {
    /// Stable machine-readable reason for API details
    pub fn reason(&self) -> &'static str {
        match self {
            NameError::Empty => "empty",
            NameError::TooLong { .. } => "too_long",
            NameError::DisallowedChar(_) => "disallowed_char",
            NameError::Reserved => "reserved",
        }
    }
}

/// Character policy applied after normalization
#[derive(Debug, Clone, Copy)]
pub struct NamePolicy {
    pub max_chars: usize,
}

impl Default for NamePolicy {
    fn default() -> Self {
        Self { max_chars: 20 }
    }
}

impl NamePolicy {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Check an already canonical name
    pub fn check(&self, name: &str) -> Result<(), NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if is_placeholder(name) {
            return Ok(());
        }

        let len = name.chars().count();
        if len > self.max_chars {
            return Err(NameError::TooLong {
                len,
                max: self.max_chars,
            });
        }
        if let Some(c) = name.chars().find(|c| !is_allowed_char(*c)) {
            return Err(NameError::DisallowedChar(c));
        }
        if fold_kana(name) == RESERVED_NAME {
            return Err(NameError::Reserved);
        }
        Ok(())
    }
}

/// Canonical form used for storage and comparison
pub fn canonical_name(raw: &str) -> String {
    let normalized: String = raw.nfkc().filter(|c| !c.is_whitespace()).collect();

    let mut out = String::with_capacity(normalized.len());
    let mut prev: Option<char> = None;
    for c in normalized.chars() {
        let c = if is_dash_like(c) && prev.is_some_and(is_kana) {
            CHOONPU
        } else {
            c
        };
        out.push(c);
        prev = Some(c);
    }

    if out.eq_ignore_ascii_case(LOOKING_TOKEN) {
        return LOOKING_TOKEN.to_string();
    }
    out
}

/// Canonicalize a submitted list, dropping entries that normalize to nothing
///
/// Returns `(original_index, canonical)` pairs so violations can point at the
/// field the user typed into.
pub fn canonical_party(raw: &[String]) -> Vec<(usize, String)> {
    raw.iter()
        .enumerate()
        .map(|(i, n)| (i, canonical_name(n)))
        .filter(|(_, n)| !n.is_empty())
        .collect()
}

pub fn is_placeholder(name: &str) -> bool {
    name == LOOKING_TOKEN
}

/// Key used by the duplicate-person guard
///
/// Hiragana and katakana spellings collide, Latin letters are case-folded.
/// Placeholders have no identity.
pub fn identity_key(name: &str) -> Option<String> {
    let canonical = canonical_name(name);
    if canonical.is_empty() || is_placeholder(&canonical) {
        return None;
    }
    Some(fold_kana(&canonical).to_lowercase())
}

/// ひらがな → カタカナ
fn fold_kana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

fn is_dash_like(c: char) -> bool {
    matches!(
        c,
        '-' | '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{FF0D}' | '\u{FF70}' | '~' | '\u{301C}'
    )
}

fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309F}')
}

fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A1}'..='\u{30FA}' | '\u{30FC}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}')
}

fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

fn is_han(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{3005}'
            | '\u{3007}'
    )
}

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(c, '\u{00C0}'..='\u{00D6}' | '\u{00D8}'..='\u{00F6}' | '\u{00F8}'..='\u{024F}')
}

fn is_allowed_char(c: char) -> bool {
    c == CHOONPU || is_han(c) || is_kana(c) || is_latin_letter(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_folds_width_and_spaces() {
        assert_eq!(canonical_name("  山田　太郎 "), "山田太郎");
        assert_eq!(canonical_name("ＴＡＲＯ"), "TARO");
        // 半角カナ
        assert_eq!(canonical_name("ﾔﾏﾀﾞ"), "ヤマダ");
    }

    #[test]
    fn test_canonical_unifies_long_vowel_marks() {
        let expected = "ルーク";
        for raw in ["ルーク", "ル-ク", "ル－ク", "ルｰク", "ル—ク", "ル〜ク"] {
            assert_eq!(canonical_name(raw), expected, "{raw}");
        }
        // not after kana: left alone
        assert_eq!(canonical_name("Mary-Jane"), "Mary-Jane");
    }

    #[test]
    fn test_looking_placeholder() {
        assert_eq!(canonical_name("Looking"), LOOKING_TOKEN);
        assert_eq!(canonical_name(" ＬＯＯＫＩＮＧ "), LOOKING_TOKEN);
        assert!(identity_key("looking").is_none());
        assert!(NamePolicy::default().check(LOOKING_TOKEN).is_ok());
    }

    #[test]
    fn test_policy_rejects_disallowed_chars() {
        let policy = NamePolicy::default();
        assert_eq!(
            policy.check(&canonical_name("taro1")),
            Err(NameError::DisallowedChar('1'))
        );
        assert_eq!(
            policy.check(&canonical_name("Mary-Jane")),
            Err(NameError::DisallowedChar('-'))
        );
        assert!(policy.check(&canonical_name("山田")).is_ok());
        assert!(policy.check(&canonical_name("José")).is_ok());
        assert!(policy.check(&canonical_name("々木")).is_ok());
    }

    #[test]
    fn test_policy_rejects_reserved_and_long_names() {
        let policy = NamePolicy::new(4);
        assert_eq!(policy.check(&canonical_name("コーチ")), Err(NameError::Reserved));
        assert_eq!(policy.check(&canonical_name("こーち")), Err(NameError::Reserved));
        assert_eq!(
            policy.check(&canonical_name("やまだたろう")),
            Err(NameError::TooLong { len: 6, max: 4 })
        );
        assert_eq!(policy.check(""), Err(NameError::Empty));
    }

    #[test]
    fn test_canonical_party_drops_empty_entries() {
        let raw = vec!["山田".to_string(), "   ".to_string(), "佐藤".to_string()];
        assert_eq!(
            canonical_party(&raw),
            vec![(0, "山田".to_string()), (2, "佐藤".to_string())]
        );
    }

    #[test]
    fn test_identity_key_collides_equivalent_spellings() {
        assert_eq!(identity_key("やまだ"), identity_key("ヤマダ"));
        assert_eq!(identity_key("ﾔﾏﾀﾞ"), identity_key("ヤマダ"));
        assert_eq!(identity_key("Taro"), identity_key("ＴＡＲＯ"));
        assert_ne!(identity_key("山田"), identity_key("山本"));
    }
}
