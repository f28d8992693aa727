//! 品詞タグ付けのインターフェース
//!
//! 実際の品詞タグ付けは外部に委ねられます。既定の [`NullTagger`] はすべてのトークンに
//! 汎用タグの注釈を返し、発音解決は汎用タグと頻度による選択にフォールバックします。

use crate::dictionary::tags::FeatureAnnotation;
use crate::errors::Result;

/// トークン列に素性注釈を付与するタガー
pub trait PosTagger: Send + Sync {
    /// 各トークンの素性注釈を返します。
    ///
    /// 返されるベクタの長さはトークン数と一致しなければなりません。
    /// エラーを返した場合、その行のすべてのトークンは注釈なしとして扱われます。
    ///
    /// # 引数
    ///
    /// * `tokens` - 正規化済みのトークン（無音は `SIL`）
    fn annotate(&self, tokens: &[&str]) -> Result<Vec<Option<FeatureAnnotation>>>;

    /// タガーの名前
    fn name(&self) -> &'static str;
}

/// すべてのトークンに汎用タグ [`GENERIC_TAG`](crate::dictionary::GENERIC_TAG) の注釈を返すタガー
///
/// 汎用タグの注釈は診断トレースに `POSP` を残しません。
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTagger;

impl PosTagger for NullTagger {
    fn annotate(&self, tokens: &[&str]) -> Result<Vec<Option<FeatureAnnotation>>> {
        Ok(vec![Some(FeatureAnnotation::generic()); tokens.len()])
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// 注釈の数がトークン数と一致するかを確かめ、失敗時は注釈なしに置き換えます。
pub(crate) fn annotate_or_null(
    tagger: &dyn PosTagger,
    tokens: &[&str],
) -> Vec<Option<FeatureAnnotation>> {
    match tagger.annotate(tokens) {
        Ok(annotations) if annotations.len() == tokens.len() => annotations,
        Ok(annotations) => {
            log::warn!(
                "{} tagger returned {} annotations for {} tokens, ignoring output",
                tagger.name(),
                annotations.len(),
                tokens.len()
            );
            vec![None; tokens.len()]
        }
        Err(e) => {
            log::warn!("{} tagger failed, ignoring output: {e}", tagger.name());
            vec![None; tokens.len()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::TranscriberError;

    struct BrokenTagger;

    impl PosTagger for BrokenTagger {
        fn annotate(&self, _tokens: &[&str]) -> Result<Vec<Option<FeatureAnnotation>>> {
            Err(TranscriberError::invalid_state("tagger", "model not loaded"))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    struct ShortTagger;

    impl PosTagger for ShortTagger {
        fn annotate(&self, _tokens: &[&str]) -> Result<Vec<Option<FeatureAnnotation>>> {
            Ok(vec![Some(FeatureAnnotation::generic())])
        }

        fn name(&self) -> &'static str {
            "short"
        }
    }

    #[test]
    fn test_null_tagger() {
        let annotations = NullTagger.annotate(&["да", "SIL", "нет"]).unwrap();
        assert_eq!(annotations.len(), 3);
        assert!(annotations.iter().all(|a| a.as_ref().is_some_and(FeatureAnnotation::is_generic)));
    }

    #[test]
    fn test_failure_yields_null_annotations() {
        assert_eq!(annotate_or_null(&BrokenTagger, &["да", "нет"]), vec![None, None]);
        assert_eq!(annotate_or_null(&ShortTagger, &["да", "нет"]), vec![None, None]);
    }
}
