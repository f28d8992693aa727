use std::sync::LazyLock;

use regex::Regex;

use crate::collaborator::process::LineChannel;
use crate::collaborator::{CancellationToken, ProcessConfig, StressPredictor};
use crate::errors::{CollaboratorError, Result};

static PREDICTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^ ]+\s+[\d.]+\s+(.+)$").unwrap());

/// `phonetisaurus-g2p` の応答行から予測結果を取り出します。
///
/// 応答は `<単語> <スコア> <予測>` の形式で、予測部分の空白と `|` は取り除かれます。
/// 形式に一致しない応答や空の予測は `None` になります。
///
/// # 例
///
/// ```
/// use ru_transcriber::collaborator::parse_prediction;
///
/// assert_eq!(parse_prediction("молоко\t12.5\tм о л о к +о"), Some("молок+о".to_string()));
/// assert_eq!(parse_prediction(""), None);
/// ```
pub fn parse_prediction(response: &str) -> Option<String> {
    let cap = PREDICTION_LINE.captures(response.trim())?;
    let prediction: String = cap[1].chars().filter(|&c| c != ' ' && c != '|').collect();
    let prediction = prediction.trim();
    (!prediction.is_empty()).then(|| prediction.to_string())
}

/// `phonetisaurus-g2p` プロセスによる強勢予測器
pub struct PhonetisaurusPredictor {
    channel: LineChannel,
}

impl PhonetisaurusPredictor {
    /// 予測プロセスを起動します。
    ///
    /// # エラー
    ///
    /// プロセスを起動できない場合にエラーを返します。
    pub fn spawn(config: &ProcessConfig, cancel: CancellationToken) -> Result<Self> {
        Ok(Self {
            channel: LineChannel::spawn(config, cancel)?,
        })
    }
}

impl StressPredictor for PhonetisaurusPredictor {
    fn predict(&mut self, word: &str) -> Result<Option<String>, CollaboratorError> {
        let response = self.channel.request(word)?;
        let prediction = parse_prediction(&response);
        if prediction.is_none() {
            log::warn!("no stress prediction for {word:?}: {response:?}");
        }
        Ok(prediction)
    }
}
