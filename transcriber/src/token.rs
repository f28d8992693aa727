//! 正規化済みトークンの分類
//!
//! 正規化後の文は単語と軟らかい句読点（`,` `;` `:`）からなります。句読点は
//! 発音解決の前に無音記号 [`SILENCE`] に写像されます。

use std::fmt;

/// 無音を表す記号。発音解決ではそのまま出力されます。
pub const SILENCE: &str = "SIL";

/// 無音に写像される句読点
pub const SOFT_PUNCTUATION: &str = ",;:";

/// 正規化後に削除される句読点
pub const HARD_PUNCTUATION: &str = ".?\"!'«»";

/// 正規化済みトークン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// 無音（軟らかい句読点から生成）
    Silence,
    /// 単語
    Word(&'a str),
}

impl<'a> Token<'a> {
    /// 正規化済みの文字列をトークンに分類します。
    ///
    /// # 例
    ///
    /// ```
    /// use ru_transcriber::token::Token;
    ///
    /// assert_eq!(Token::classify(","), Token::Silence);
    /// assert_eq!(Token::classify("SIL"), Token::Silence);
    /// assert_eq!(Token::classify("дом"), Token::Word("дом"));
    /// ```
    pub fn classify(s: &'a str) -> Self {
        if s == SILENCE || is_soft_punctuation(s) {
            Self::Silence
        } else {
            Self::Word(s)
        }
    }

    /// トークンの表層形。無音の場合は [`SILENCE`] を返します。
    #[inline(always)]
    pub fn surface(&self) -> &'a str {
        match *self {
            Self::Silence => SILENCE,
            Self::Word(w) => w,
        }
    }

    #[inline(always)]
    pub fn is_silence(&self) -> bool {
        matches!(self, Self::Silence)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.surface())
    }
}

fn is_soft_punctuation(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if SOFT_PUNCTUATION.contains(c))
}
