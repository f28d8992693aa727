//! 辞書と外部エンジンを組み合わせた発音解決
//!
//! # 主要な構造体
//!
//! - [`Transcriber`]: 辞書一式とタガーを保持し、トークンごとの発音解決を行う
//! - [`Worker`]: 1行ずつの処理を行うワーカー
//!
//! # 例
//!
//! ```
//! use ru_transcriber::dictionary::{Dictionary, Lexicon, GENERIC_TAG};
//! use ru_transcriber::errors::CollaboratorError;
//! use ru_transcriber::trace::NullTrace;
//! use ru_transcriber::Transcriber;
//!
//! let mut lexicon = Lexicon::new();
//! lexicon.add_entry("мама", "м+ама", GENERIC_TAG);
//! let transcriber = Transcriber::new(Dictionary::new().with_lexicon(lexicon));
//!
//! let mut predictor = |_: &str| -> Result<Option<String>, CollaboratorError> { Ok(None) };
//! let mut transducer = |line: &str| -> Result<Option<String>, CollaboratorError> {
//!     Ok(Some(line.to_uppercase()))
//! };
//!
//! let mut worker = transcriber.new_worker();
//! worker.reset_sentence("Мама, мама!");
//! let result = worker.transcribe(&mut predictor, &mut transducer, &mut NullTrace)?;
//! assert_eq!(result, "М+АМА SIL М+АМА");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod worker;

use std::fmt;
use std::sync::Arc;

use crate::collaborator::StressPredictor;
use crate::dictionary::homograph::Evidence;
use crate::dictionary::tags::FeatureAnnotation;
use crate::dictionary::Dictionary;
use crate::tagger::{NullTagger, PosTagger};
use crate::token::{SILENCE, Token};
use crate::utils::inject_monosyllabic_stress;

pub use crate::transcriber::worker::Worker;

/// 行を変換できなかった場合に出力される文字列
pub const TRANSCRIPTION_ERROR: &str = "**ERROR, COULD NOT TRANSCRIBE**";

/// 強勢予測器の誤りとしてよく現れる文字（キリル文字の大文字 `Х`）
const SPURIOUS_KHA: char = 'Х';

/// 発音の取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordSource {
    /// 無音
    Silence,
    /// ユーザー辞書
    UserLexicon,
    /// 同形異音語辞書
    Homograph,
    /// 一般辞書
    Lexicon,
    /// 強勢予測器（予測が得られなかった場合を含む）
    Predicted,
}

impl fmt::Display for WordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Silence => "silence",
            Self::UserLexicon => "entry found in user lexicon",
            Self::Homograph => "entry found in homographs",
            Self::Lexicon => "entry found in lexicon",
            Self::Predicted => "stress predicted",
        })
    }
}

/// 1トークンの発音解決の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// 発音の取得元
    pub source: WordSource,
    /// 強勢付きの表記。解決できなかった場合は空文字列
    pub stress: String,
    /// トランスデューサーに渡す文字列
    pub output: String,
    /// 同形異音語の曖昧性解消の根拠
    pub evidence: Option<Evidence>,
}

impl Resolution {
    fn new(
        source: WordSource,
        stress: String,
        evidence: Option<Evidence>,
        annotation: Option<&FeatureAnnotation>,
    ) -> Self {
        let output = post_process(&stress, annotation);
        Self {
            source,
            stress,
            output,
            evidence,
        }
    }
}

/// 予測器の誤りを取り除き、品詞に応じた接頭辞を付けます。
fn post_process(stress: &str, annotation: Option<&FeatureAnnotation>) -> String {
    let stress: String = stress.chars().filter(|&c| c != SPURIOUS_KHA).collect();
    match annotation.and_then(FeatureAnnotation::category_prefix) {
        Some(prefix) => format!("{}{stress}", prefix.as_str()),
        None => stress,
    }
}

/// 辞書一式とタガーを保持し、発音解決を行う構造体
///
/// 辞書は [`Arc`] で共有され、複製や [`Worker`] の生成は安価です。
#[derive(Clone)]
pub struct Transcriber {
    dict: Arc<Dictionary>,
    tagger: Arc<dyn PosTagger>,
}

impl Transcriber {
    /// 新しいトランスクライバーを作成します。タガーは [`NullTagger`] です。
    ///
    /// # 引数
    ///
    /// * `dict` - 発音解決に使う辞書一式
    pub fn new(dict: Dictionary) -> Self {
        Self::from_shared_dictionary(Arc::new(dict))
    }

    /// 共有された辞書一式から新しいトランスクライバーを作成します。
    pub fn from_shared_dictionary(dict: Arc<Dictionary>) -> Self {
        Self {
            dict,
            tagger: Arc::new(NullTagger),
        }
    }

    /// 品詞タガーを設定します。
    pub fn tagger<T>(mut self, tagger: T) -> Self
    where
        T: PosTagger + 'static,
    {
        self.tagger = Arc::new(tagger);
        self
    }

    /// 辞書一式を新しいものに丸ごと差し替えます。
    ///
    /// 差し替え前に生成された [`Worker`] は古い辞書を使い続けます。
    pub fn reload(&mut self, dict: Dictionary) {
        self.dict = Arc::new(dict);
    }

    #[inline(always)]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    #[inline(always)]
    pub(crate) fn pos_tagger(&self) -> &dyn PosTagger {
        self.tagger.as_ref()
    }

    /// 1トークンの発音を解決します。
    ///
    /// 次の順に調べ、最初に空でない発音が得られたものを採用します。
    ///
    /// 1. 無音は [`SILENCE`] をそのまま返す
    /// 2. ユーザー辞書（注釈のタグ、次に汎用タグ）
    /// 3. 同形異音語辞書と曖昧性解消
    /// 4. 一般辞書（注釈のタグ、次に汎用タグ）
    /// 5. 強勢予測器。強勢記号のない単音節語には記号を補う
    ///
    /// 予測器が失敗した場合は、そのトークンの発音だけが空になります。
    ///
    /// # 引数
    ///
    /// * `token` - 正規化済みのトークン
    /// * `annotation` - トークンの素性注釈
    /// * `predictor` - 強勢予測器
    pub fn resolve<P>(
        &self,
        token: &str,
        annotation: Option<&FeatureAnnotation>,
        predictor: &mut P,
    ) -> Resolution
    where
        P: StressPredictor + ?Sized,
    {
        let word = match Token::classify(token) {
            Token::Silence => {
                return Resolution::new(WordSource::Silence, SILENCE.to_string(), None, annotation);
            }
            Token::Word(word) => word,
        };

        if let Some(stress) = self.dict.user_lexicon().get(word, annotation) {
            return Resolution::new(WordSource::UserLexicon, stress.to_string(), None, annotation);
        }
        if let Some(entry) = self.dict.homographs().get(word) {
            let result = entry.disambiguate(annotation);
            if result.pronunciation.is_empty() {
                log::warn!("empty homograph pronunciation for {word:?} ({})", result.evidence);
            } else {
                return Resolution::new(
                    WordSource::Homograph,
                    result.pronunciation.to_string(),
                    Some(result.evidence),
                    annotation,
                );
            }
        }
        if let Some(stress) = self.dict.lexicon().get(word, annotation) {
            return Resolution::new(WordSource::Lexicon, stress.to_string(), None, annotation);
        }

        let stress = match predictor.predict(word) {
            Ok(Some(predicted)) => inject_monosyllabic_stress(&predicted),
            Ok(None) => String::new(),
            Err(e) => {
                log::warn!("stress prediction failed for {word:?}: {e}");
                String::new()
            }
        };
        Resolution::new(WordSource::Predicted, stress, None, annotation)
    }

    /// 新しいワーカーを作成します。
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }
}
