//! 入力行の正規化とトークン化
//!
//! 入力行を検証したうえで小文字化し、句読点を整理して単語列に分割します。
//! 書き言葉で省略された `ё` は `ё` 復元辞書を使って補われます。

use std::sync::LazyLock;

use regex::Regex;

use crate::dictionary::Lexicon;
use crate::dictionary::tags::GENERIC_TAG;
use crate::token::{HARD_PUNCTUATION, SOFT_PUNCTUATION, Token};
use crate::utils::{YE, YO};

static RUSSIAN_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[а-яА-ЯёЁ,;:.?"!'«»\s-]+$"#).unwrap());

/// `ё` 復元の記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restoration {
    /// トークン列中の位置
    pub index: usize,
    /// 元の綴り
    pub original: String,
    /// 復元後の綴り
    pub restored: String,
}

/// 正規化された入力行
///
/// [`Self::compile()`] の後、検証に失敗した行はトークンを1つも持ちません。
#[derive(Debug, Clone, Default)]
pub struct Sentence {
    input: String,
    tokens: Vec<String>,
    restorations: Vec<Restoration>,
}

impl Sentence {
    /// 空の文を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 内部状態をクリアします。
    #[inline(always)]
    pub fn clear(&mut self) {
        self.input.clear();
        self.tokens.clear();
        self.restorations.clear();
    }

    /// 入力文字列を設定します。
    ///
    /// この時点では正規化は行われません。[`Self::compile()`] を呼び出してください。
    pub fn set_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.clear();
        self.input.push_str(input.as_ref().trim());
    }

    /// 入力文字列を正規化してトークン列を構築します。
    ///
    /// # 引数
    ///
    /// * `yo_lexicon` - `ё` 復元辞書
    ///
    /// # 戻り値
    ///
    /// 入力が文字クラスの検証に通った場合は `true`
    pub fn compile(&mut self, yo_lexicon: &Lexicon) -> bool {
        if !RUSSIAN_INPUT.is_match(&self.input) {
            return false;
        }

        let mut normalized = self.input.to_lowercase();
        normalized.retain(|c| !HARD_PUNCTUATION.contains(c));
        let normalized = normalized.replace(" - ", " , ");
        let mut spaced = String::with_capacity(normalized.len());
        for c in normalized.chars() {
            if SOFT_PUNCTUATION.contains(c) {
                spaced.push(' ');
                spaced.push(c);
                spaced.push(' ');
            } else {
                spaced.push(c);
            }
        }

        for (index, word) in spaced.split_whitespace().enumerate() {
            match restore_yo(word, yo_lexicon) {
                Some(restored) => {
                    self.restorations.push(Restoration {
                        index,
                        original: word.to_string(),
                        restored: restored.to_string(),
                    });
                    self.tokens.push(restored.to_string());
                }
                None => self.tokens.push(word.to_string()),
            }
        }
        true
    }

    /// 元の入力文字列（前後の空白を除く）
    #[inline(always)]
    pub fn raw(&self) -> &str {
        &self.input
    }

    /// 正規化済みのトークン
    #[inline(always)]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// 分類済みのトークンを返します。
    pub fn token_iter(&self) -> impl Iterator<Item = Token<'_>> {
        self.tokens.iter().map(|t| Token::classify(t))
    }

    /// 行われた `ё` 復元
    #[inline(always)]
    pub fn restorations(&self) -> &[Restoration] {
        &self.restorations
    }

    /// 正規化済みの文を空白区切りで返します。
    pub fn normalized(&self) -> String {
        self.tokens.join(" ")
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn restore_yo<'a>(word: &str, yo_lexicon: &'a Lexicon) -> Option<&'a str> {
    if word.contains(YO) || !word.contains(YE) {
        return None;
    }
    yo_lexicon
        .get_tagged(word, GENERIC_TAG)
        .filter(|restored| !restored.is_empty())
}

/// 入力行を正規化し、トークン列を返します。
///
/// 入力が許可された文字クラス（キリル文字、句読点、ハイフン、空白）以外の文字を
/// 含む場合、または空の場合は空のベクタを返します。
///
/// # 例
///
/// ```
/// use ru_transcriber::dictionary::Lexicon;
/// use ru_transcriber::sentence::normalize;
///
/// let yo = Lexicon::new();
/// assert_eq!(normalize("Дом.", &yo), vec!["дом"]);
/// assert_eq!(normalize("Да - нет", &yo), vec!["да", ",", "нет"]);
/// assert!(normalize("123 ### xyz", &yo).is_empty());
/// ```
pub fn normalize(line: &str, yo_lexicon: &Lexicon) -> Vec<String> {
    let mut sent = Sentence::new();
    sent.set_sentence(line);
    sent.compile(yo_lexicon);
    sent.tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yo_lexicon() -> Lexicon {
        let mut lex = Lexicon::new();
        lex.add_entry("еж", "ёж", GENERIC_TAG);
        lex.add_entry("все", "всё", GENERIC_TAG);
        lex
    }

    #[test]
    fn test_hard_punctuation_is_removed() {
        let yo = Lexicon::new();
        assert_eq!(normalize("дом.", &yo), vec!["дом"]);
        assert_eq!(normalize("«Привет!» 5 нет", &yo), Vec::<String>::new());
        assert_eq!(normalize("«Привет!» сказал он?", &yo), vec!["привет", "сказал", "он"]);
    }

    #[test]
    fn test_soft_punctuation_is_spaced() {
        let yo = Lexicon::new();
        assert_eq!(
            normalize("Раз,два;  три:четыре", &yo),
            vec!["раз", ",", "два", ";", "три", ":", "четыре"]
        );
    }

    #[test]
    fn test_hyphens() {
        let yo = Lexicon::new();
        assert_eq!(normalize("кто-то - там", &yo), vec!["кто-то", ",", "там"]);
    }

    #[test]
    fn test_invalid_input() {
        let yo = Lexicon::new();
        assert!(normalize("123 ### xyz", &yo).is_empty());
        assert!(normalize("дом 1", &yo).is_empty());
        assert!(normalize("", &yo).is_empty());
        assert!(normalize("   ", &yo).is_empty());
    }

    #[test]
    fn test_yo_restoration() {
        let yo = yo_lexicon();
        let mut sent = Sentence::new();
        sent.set_sentence("Еж съел все");
        assert!(sent.compile(&yo));
        assert_eq!(sent.tokens(), &["ёж", "съел", "всё"]);
        assert_eq!(sent.restorations().len(), 2);
        assert_eq!(sent.restorations()[1].index, 2);
        assert_eq!(sent.restorations()[1].original, "все");
        assert_eq!(sent.normalized(), "ёж съел всё");
    }

    #[test]
    fn test_yo_is_not_restored_without_ye() {
        let mut yo = Lexicon::new();
        yo.add_entry("мед", "мёд", GENERIC_TAG);
        yo.add_entry("дом", "дём", GENERIC_TAG);
        assert_eq!(normalize("дом мед мёд", &yo), vec!["дом", "мёд", "мёд"]);
    }

    #[test]
    fn test_idempotence() {
        let yo = yo_lexicon();
        for line in ["Еж, который все знал.", "Кто-то - там; «да»", "дом"] {
            let once = normalize(line, &yo);
            let twice = normalize(&once.join(" "), &yo);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_token_iter() {
        let mut sent = Sentence::new();
        sent.set_sentence("да, нет");
        sent.compile(&Lexicon::new());
        let tokens: Vec<_> = sent.token_iter().collect();
        assert_eq!(tokens, vec![Token::Word("да"), Token::Silence, Token::Word("нет")]);
    }
}
