//! 品詞・形態素性タグの定義
//!
//! 素性注釈は `vrb/prs/pl` のように、先頭の品詞タグと `/` 区切りの二次素性からなります。

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use hashbrown::HashSet;

use crate::errors::{Result, TranscriberError};

/// 注釈が与えられなかった単語に使われる汎用タグ
///
/// 辞書エントリは読み込み時にこのタグで登録されます。
pub const GENERIC_TAG: &str = "x/";

static VALID_POS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "adj", "adv", "cnj", "dee", "inj", "inv", "nn", "num", "pdv", "prn", "prp", "pt", "pth",
        "ptp", "vrb",
    ]
    .into_iter()
    .collect()
});

static VALID_FEATURES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "acc", "act", "adv", "anm", "cap", "cmp", "cnj", "dat", "fem", "fin", "fst", "gen", "heu",
        "imp", "ind", "inf", "inj", "ins", "inv", "loc", "msc", "neu", "nom", "pdv", "pl", "prp",
        "prs", "pst", "psv", "pt", "pth", "sec", "sg", "sht", "trd",
    ]
    .into_iter()
    .collect()
});

/// 品詞タグが既知のものかを判定します。
pub fn is_valid_pos(pos: &str) -> bool {
    VALID_POS.contains(pos)
}

/// 形態素性タグが既知のものかを判定します。空のタグは無視されます。
pub fn is_valid_feature(feature: &str) -> bool {
    feature.is_empty() || VALID_FEATURES.contains(feature)
}

/// 下流のトランスデューサーの曖昧性解消に使われる品詞接頭辞
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryPrefix {
    /// 形容詞・分詞・代名詞
    Adjective,
    /// 動詞
    Verb,
}

impl CategoryPrefix {
    /// 発音文字列の先頭に付ける文字列を返します。
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adjective => "ADJ",
            Self::Verb => "VERB",
        }
    }
}

/// トークンに付与される素性注釈
///
/// 主たる品詞タグと、順序を保った二次素性タグの列からなります。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureAnnotation {
    pos: String,
    features: Vec<String>,
}

impl FeatureAnnotation {
    /// 新しい注釈を作成します。
    ///
    /// # 引数
    ///
    /// * `pos` - 品詞タグ
    /// * `features` - 二次素性タグ
    pub fn new<S, I, F>(pos: S, features: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            pos: pos.into(),
            features: features
                .into_iter()
                .map(Into::into)
                .filter(|f: &String| !f.is_empty())
                .collect(),
        }
    }

    /// 汎用タグ [`GENERIC_TAG`] に対応する注釈を返します。
    pub fn generic() -> Self {
        Self::new("x", Vec::<String>::new())
    }

    /// 主たる品詞タグ
    #[inline(always)]
    pub fn pos(&self) -> &str {
        &self.pos
    }

    /// 二次素性タグ
    #[inline(always)]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// 汎用タグかどうか
    pub fn is_generic(&self) -> bool {
        self.pos == "x" && self.features.is_empty()
    }

    /// 辞書のキーとして使うタグ文字列を返します。
    pub fn tag(&self) -> String {
        self.to_string()
    }

    /// 品詞に応じた接頭辞を返します。
    pub fn category_prefix(&self) -> Option<CategoryPrefix> {
        match self.pos.as_str() {
            "adj" | "ptp" | "prn" => Some(CategoryPrefix::Adjective),
            "vrb" => Some(CategoryPrefix::Verb),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/", self.pos)?;
        write!(f, "{}", self.features.join("/"))
    }
}

impl FromStr for FeatureAnnotation {
    type Err = TranscriberError;

    /// `vrb/prs/pl` 形式の文字列を解析します。
    fn from_str(s: &str) -> Result<Self> {
        let mut spl = s.trim().split('/');
        let pos = spl.next().unwrap_or_default().trim().to_lowercase();
        if pos.is_empty() {
            return Err(TranscriberError::invalid_format(
                "annotation",
                format!("missing part-of-speech tag in {s:?}"),
            ));
        }
        Ok(Self::new(pos, spl.map(|f| f.trim().to_lowercase())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_annotation() {
        let ann: FeatureAnnotation = "vrb/prs/pl".parse().unwrap();
        assert_eq!(ann.pos(), "vrb");
        assert_eq!(ann.features(), &["prs", "pl"]);
        assert_eq!(ann.to_string(), "vrb/prs/pl");
    }

    #[test]
    fn test_generic_roundtrip() {
        let ann: FeatureAnnotation = GENERIC_TAG.parse().unwrap();
        assert!(ann.is_generic());
        assert_eq!(ann.tag(), GENERIC_TAG);
    }

    #[test]
    fn test_parse_empty_annotation() {
        assert!("".parse::<FeatureAnnotation>().is_err());
        assert!("/sg".parse::<FeatureAnnotation>().is_err());
    }

    #[test]
    fn test_category_prefix() {
        let prefix = |s: &str| s.parse::<FeatureAnnotation>().unwrap().category_prefix();
        assert_eq!(prefix("adj/sg"), Some(CategoryPrefix::Adjective));
        assert_eq!(prefix("ptp/pst"), Some(CategoryPrefix::Adjective));
        assert_eq!(prefix("prn"), Some(CategoryPrefix::Adjective));
        assert_eq!(prefix("vrb/inf"), Some(CategoryPrefix::Verb));
        assert_eq!(prefix("nn/sg/nom"), None);
    }

    #[test]
    fn test_tag_validation() {
        assert!(is_valid_pos("vrb"));
        assert!(!is_valid_pos("verb"));
        assert!(is_valid_feature("pst"));
        assert!(is_valid_feature(""));
        assert!(!is_valid_feature("past"));
    }
}
