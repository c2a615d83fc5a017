//! Word tokenizer - extracts lowercase alphabetic words / 分词器
//!
//! Shared by the indexer (building the vocabulary) and the service
//! (rebuilding the trie at startup). Both sides must use the same minimum
//! length, see [`crate::config::SearchConfig::min_token_len`].
//!
//! Character classes are simplified / 字符分类为简化版本:
//! - alphabetic test: `char::is_alphabetic`
//! - case folding: simple one-to-one lowercase mapping
//!
//! Full Unicode case folding or locale-aware classification can be plugged
//! in through [`CharFolding`].

use crate::error::{Result, SearchError};

/// Character classification and folding used while tokenizing / 字符分类与折叠
pub trait CharFolding {
    /// Whether the character belongs inside a word / 是否为词字符
    fn is_word_char(&self, c: char) -> bool;

    /// Folded form of a word character / 折叠后的字符
    fn fold(&self, c: char) -> char;
}

/// `char::is_alphabetic` + simple lowercase mapping / 默认折叠规则
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFolding;

impl CharFolding for SimpleFolding {
    fn is_word_char(&self, c: char) -> bool {
        c.is_alphabetic()
    }

    fn fold(&self, c: char) -> char {
        // Only U+0130 maps to more than one codepoint; its first one is the simple mapping
        c.to_lowercase().next().unwrap_or(c)
    }
}

/// Streaming word extractor / 分词器
#[derive(Debug, Clone)]
pub struct Tokenizer<F = SimpleFolding> {
    min_len: usize,
    folding: F,
}

impl Tokenizer<SimpleFolding> {
    pub fn new(min_len: usize) -> Self {
        Self {
            min_len,
            folding: SimpleFolding,
        }
    }
}

impl<F: CharFolding> Tokenizer<F> {
    /// Replace the character rules / 替换字符规则
    pub fn with_folding<G: CharFolding>(self, folding: G) -> Tokenizer<G> {
        Tokenizer {
            min_len: self.min_len,
            folding,
        }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Feed every word of `text` to `emit`, in order of appearance / 逐词回调
    pub fn for_each_word(&self, text: &str, mut emit: impl FnMut(String)) {
        let mut buffer = String::with_capacity(32);
        // Length is counted in codepoints, not bytes
        let mut buffered = 0usize;

        for c in text.chars() {
            if self.folding.is_word_char(c) {
                buffer.push(self.folding.fold(c));
                buffered += 1;
            } else {
                if buffered > 0 && buffered >= self.min_len {
                    emit(std::mem::take(&mut buffer));
                }
                buffer.clear();
                buffered = 0;
            }
        }

        if buffered > 0 && buffered >= self.min_len {
            emit(buffer);
        }
    }

    /// Tokenize decoded text / 对文本分词
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        self.for_each_word(text, |w| words.push(w));
        words
    }

    /// Decode raw bytes as UTF-8, then tokenize / 解码后分词
    ///
    /// `source_name` only labels the error (a file path, a row id).
    pub fn tokenize_bytes(&self, bytes: &[u8], source_name: &str) -> Result<Vec<String>> {
        let text = std::str::from_utf8(bytes).map_err(|e| SearchError::decode(source_name, e))?;
        Ok(self.tokenize(text))
    }

    /// Normalize an autocomplete query: trim and fold case / 规范化查询
    ///
    /// Non-word characters are kept so that a prefix containing them simply
    /// matches nothing.
    pub fn normalize_query(&self, query: &str) -> String {
        query
            .trim()
            .chars()
            .map(|c| {
                if self.folding.is_word_char(c) {
                    self.folding.fold(c)
                } else {
                    c
                }
            })
            .collect()
    }
}

/// Tokenize raw bytes with the default rules / 默认规则分词
pub fn tokenize(text: &[u8], min_len: usize) -> Result<Vec<String>> {
    Tokenizer::new(min_len).tokenize_bytes(text, "input")
}

/// Tokenize already decoded text with the default rules
pub fn tokenize_str(text: &str, min_len: usize) -> Vec<String> {
    Tokenizer::new(min_len).tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_short_words() {
        let words = tokenize(b"The quick-brown Fox123 jumps!!", 5).unwrap();
        assert_eq!(words, vec!["quick", "brown", "jumps"]);
    }

    #[test]
    fn test_tokenize_lowercases() {
        let words = tokenize_str("HELLO World", 3);
        assert_eq!(words, vec!["hello", "world"]);
    }

    #[test]
    fn test_trailing_word_flushed() {
        assert_eq!(tokenize_str("alpha beta gamma", 5), vec!["alpha", "gamma"]);
        assert_eq!(tokenize_str("gamma", 5), vec!["gamma"]);
    }

    #[test]
    fn test_unicode_words_counted_by_codepoint() {
        // "árbol" is 5 codepoints but 6 bytes; "niño" is 4 codepoints
        let words = tokenize_str("Árbol, NIÑO y Canción", 5);
        assert_eq!(words, vec!["árbol", "canción"]);

        let words = tokenize_str("Straße ΣΟΦΙΑ", 5);
        assert_eq!(words, vec!["straße", "σοφια"]);
    }

    #[test]
    fn test_digits_and_punctuation_split_words() {
        assert_eq!(tokenize_str("abc1def", 3), vec!["abc", "def"]);
        assert_eq!(tokenize_str("one_two", 3), vec!["one", "two"]);
        assert!(tokenize_str("12345 !!!", 1).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize(b"", 5).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let err = tokenize(&[b'a', 0xff, 0xfe, b'b'], 1).unwrap_err();
        assert!(matches!(err, SearchError::Decode { .. }));
    }

    #[test]
    fn test_words_are_lowercase_alphabetic() {
        let text = "Mixed CASE wOrDs, with-hyphens & ÜMLAUTS 42times";
        for word in tokenize_str(text, 1) {
            assert!(word.chars().all(|c| c.is_alphabetic()));
            assert_eq!(word, word.to_lowercase());
        }
    }

    #[test]
    fn test_custom_folding() {
        struct AsciiOnly;
        impl CharFolding for AsciiOnly {
            fn is_word_char(&self, c: char) -> bool {
                c.is_ascii_alphabetic()
            }
            fn fold(&self, c: char) -> char {
                c.to_ascii_lowercase()
            }
        }

        let tokenizer = Tokenizer::new(3).with_folding(AsciiOnly);
        assert_eq!(tokenizer.tokenize("café latte"), vec!["caf", "latte"]);
    }

    #[test]
    fn test_normalize_query() {
        let tokenizer = Tokenizer::new(5);
        assert_eq!(tokenizer.normalize_query("  APPle "), "apple");
        assert_eq!(tokenizer.normalize_query("Ab-C"), "ab-c");
        assert_eq!(tokenizer.normalize_query(""), "");
    }
}
