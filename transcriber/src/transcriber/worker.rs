//! 1行ずつの発音変換を行うワーカー
//!
//! ワーカーは内部バッファを保持し、行をまたいで再利用することで不要な
//! メモリ再割り当てを避けます。
use crate::collaborator::{StressPredictor, Transducer};
use crate::dictionary::homograph::Evidence;
use crate::dictionary::tags::FeatureAnnotation;
use crate::errors::Result;
use crate::sentence::Sentence;
use crate::tagger::annotate_or_null;
use crate::trace::{Trace, TraceTag};
use crate::transcriber::{Resolution, TRANSCRIPTION_ERROR, Transcriber, WordSource};
use crate::utils::collapse_spaces;

/// 1行ずつの発音変換を行う構造体
///
/// # 例
///
/// ```ignore
/// let mut worker = transcriber.new_worker();
/// worker.reset_sentence("Привет, мир!");
/// let phonetic = worker.transcribe(&mut predictor, &mut transducer, &mut NullTrace)?;
/// ```
pub struct Worker {
    transcriber: Transcriber,
    sent: Sentence,
    annotations: Vec<Option<FeatureAnnotation>>,
    resolutions: Vec<Resolution>,
    line_buffer: String,
}

impl Worker {
    pub(crate) fn new(transcriber: Transcriber) -> Self {
        Self {
            transcriber,
            sent: Sentence::new(),
            annotations: vec![],
            resolutions: vec![],
            line_buffer: String::new(),
        }
    }

    /// 変換する入力行をリセットします。
    ///
    /// 入力は正規化され、`ё` の復元が行われます。
    ///
    /// # 引数
    ///
    /// * `input` - 入力行
    pub fn reset_sentence<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.annotations.clear();
        self.resolutions.clear();
        self.line_buffer.clear();
        self.sent.set_sentence(input);
        self.sent.compile(self.transcriber.dictionary().yo_lexicon());
    }

    /// 設定された行を発音表記に変換します。
    ///
    /// 入力が検証に通らなかった場合、またはトランスデューサーが結果を返さなかった場合は
    /// [`TRANSCRIPTION_ERROR`] を返します。
    ///
    /// # 引数
    ///
    /// * `predictor` - 辞書にない単語の強勢予測器
    /// * `transducer` - 強勢付きの行を発音表記に変換するトランスデューサー
    /// * `trace` - 診断トレースの書き込み先
    ///
    /// # エラー
    ///
    /// トレースの書き込みに失敗した場合にエラーを返します。
    pub fn transcribe<P, T, R>(
        &mut self,
        predictor: &mut P,
        transducer: &mut T,
        trace: &mut R,
    ) -> Result<String>
    where
        P: StressPredictor + ?Sized,
        T: Transducer + ?Sized,
        R: Trace + ?Sized,
    {
        trace.record(TraceTag::Sentence, self.sent.raw())?;
        for restoration in self.sent.restorations() {
            trace.record(TraceTag::YoRestoration, &restoration.restored)?;
        }

        let transcription = if self.sent.is_empty() {
            log::warn!("cannot transcribe sentence: {:?}", self.sent.raw());
            TRANSCRIPTION_ERROR.to_string()
        } else {
            trace.record(TraceTag::Normalized, &self.sent.normalized())?;
            self.resolve_tokens(predictor, trace)?;
            match transducer.transduce(&self.line_buffer) {
                Ok(Some(phonetic)) => phonetic,
                Ok(None) => TRANSCRIPTION_ERROR.to_string(),
                Err(e) => {
                    log::error!("transduction failed for {:?}: {e}", self.sent.raw());
                    TRANSCRIPTION_ERROR.to_string()
                }
            }
        };
        let transcription = collapse_spaces(&transcription);

        trace.record(TraceTag::Phonetic, &transcription)?;
        Ok(transcription)
    }

    fn resolve_tokens<P, R>(&mut self, predictor: &mut P, trace: &mut R) -> Result<()>
    where
        P: StressPredictor + ?Sized,
        R: Trace + ?Sized,
    {
        let surfaces: Vec<&str> = self.sent.token_iter().map(|t| t.surface()).collect();
        self.annotations = annotate_or_null(self.transcriber.pos_tagger(), &surfaces);

        for (surface, annotation) in surfaces.iter().zip(&self.annotations) {
            trace.record(TraceTag::Word, surface)?;
            match annotation {
                None => trace.record(TraceTag::PosPrediction, "NULL")?,
                Some(ann) if !ann.is_generic() => trace.record(TraceTag::PosPrediction, &ann.tag())?,
                Some(_) => {}
            }

            let resolution = self
                .transcriber
                .resolve(surface, annotation.as_ref(), predictor);
            match (&resolution.source, &resolution.evidence) {
                (WordSource::Silence, _) => {}
                (WordSource::Homograph, Some(Evidence::NotHomograph)) => {
                    trace.record(TraceTag::Disambiguation, "SINGLETON")?;
                }
                (WordSource::Homograph, Some(evidence)) => {
                    trace.record(TraceTag::Disambiguation, &evidence.to_string())?;
                }
                (source, _) => trace.record(TraceTag::Info, &source.to_string())?,
            }
            trace.record(TraceTag::Stress, &resolution.stress)?;

            self.line_buffer.push_str(&resolution.output);
            self.line_buffer.push(' ');
            self.resolutions.push(resolution);
        }
        Ok(())
    }

    /// 使用しているトランスクライバー
    #[inline(always)]
    pub fn transcriber(&self) -> &Transcriber {
        &self.transcriber
    }

    /// 正規化済みのトークン数
    #[inline(always)]
    pub fn num_tokens(&self) -> usize {
        self.sent.tokens().len()
    }

    /// 正規化済みのトークン
    #[inline(always)]
    pub fn tokens(&self) -> &[String] {
        self.sent.tokens()
    }

    /// 直前の変換で得られたトークンごとの解決結果
    #[inline(always)]
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// 直前の変換でトランスデューサーに渡された文字列
    #[inline(always)]
    pub fn stress_line(&self) -> &str {
        &self.line_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::homograph::{HomographSlot, HomographTable};
    use crate::dictionary::lexicon::Lexicon;
    use crate::dictionary::tags::GENERIC_TAG;
    use crate::dictionary::Dictionary;
    use crate::errors::CollaboratorError;
    use crate::trace::NullTrace;

    fn echo(line: &str) -> Result<Option<String>, CollaboratorError> {
        Ok(Some(line.to_string()))
    }

    fn silent(_: &str) -> Result<Option<String>, CollaboratorError> {
        Ok(None)
    }

    fn transcriber() -> Transcriber {
        let mut lexicon = Lexicon::new();
        lexicon.add_entry("мама", "м+ама", GENERIC_TAG);
        let mut homographs = HomographTable::new();
        homographs.insert("замок", HomographSlot::new(5, "nn", &["sg"], "з+амок"));
        homographs.insert("замок", HomographSlot::new(9, "nn", &["sg"], "зам+ок"));
        Transcriber::new(
            Dictionary::new()
                .with_lexicon(lexicon)
                .with_homographs(homographs),
        )
    }

    #[test]
    fn test_line_buffer() {
        let mut worker = transcriber().new_worker();
        worker.reset_sentence("Мама: замок");
        let result = worker
            .transcribe(&mut echo, &mut echo, &mut NullTrace)
            .unwrap();
        assert_eq!(worker.stress_line(), "м+ама SIL зам+ок ");
        assert_eq!(result, "м+ама SIL зам+ок");
        assert_eq!(worker.num_tokens(), 3);
        assert_eq!(worker.resolutions()[2].evidence, Some(Evidence::Frequency));
    }

    #[test]
    fn test_invalid_line_yields_sentinel() {
        let mut worker = transcriber().new_worker();
        worker.reset_sentence("123 ### xyz");
        let result = worker
            .transcribe(&mut echo, &mut echo, &mut NullTrace)
            .unwrap();
        assert_eq!(result, TRANSCRIPTION_ERROR);

        worker.reset_sentence("мама");
        let result = worker
            .transcribe(&mut echo, &mut echo, &mut NullTrace)
            .unwrap();
        assert_eq!(result, "м+ама");
    }

    #[test]
    fn test_transducer_failure_yields_sentinel() {
        let mut worker = transcriber().new_worker();
        worker.reset_sentence("мама");
        let result = worker
            .transcribe(&mut echo, &mut silent, &mut NullTrace)
            .unwrap();
        assert_eq!(result, TRANSCRIPTION_ERROR);

        let mut timeout = |_: &str| -> Result<Option<String>, CollaboratorError> {
            Err(CollaboratorError::Timeout {
                name: "transduce".into(),
                timeout: std::time::Duration::from_secs(1),
            })
        };
        let result = worker
            .transcribe(&mut echo, &mut timeout, &mut NullTrace)
            .unwrap();
        assert_eq!(result, TRANSCRIPTION_ERROR);
    }

    #[test]
    fn test_unresolved_token_is_empty() {
        let mut worker = transcriber().new_worker();
        worker.reset_sentence("мама кот мама");
        worker
            .transcribe(&mut silent, &mut echo, &mut NullTrace)
            .unwrap();
        assert_eq!(worker.stress_line(), "м+ама  м+ама ");
    }

    #[test]
    fn test_trace_records() {
        let mut worker = transcriber().new_worker();
        let mut trace: Vec<(TraceTag, String)> = vec![];
        worker.reset_sentence("Замок, мама");
        worker.transcribe(&mut silent, &mut echo, &mut trace).unwrap();
        let tags: Vec<&str> = trace.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(
            tags,
            vec![
                "SENT", "NORM", "WORD", "DISA", "STRS", "WORD", "STRS", "WORD", "INFO", "STRS",
                "SPHO"
            ]
        );
        assert_eq!(trace[3].1, "FREQ");
        assert_eq!(trace[8].1, "entry found in lexicon");
        assert_eq!(trace[10].1, "зам+ок SIL м+ама");
    }
}
