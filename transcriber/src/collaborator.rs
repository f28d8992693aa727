//! 外部プロセスとの協調
//!
//! ストレス予測器と有限状態トランスデューサーは、1行の要求に1行で応答する外部プロセスとして
//! 動作します。このモジュールはそれらの抽象（[`StressPredictor`]、[`Transducer`]）と、
//! プロセスを起動して行単位でやり取りする実装を提供します。
//!
//! すべての往復にはタイムアウトとキャンセルが設定されるため、停止したプロセスが
//! パイプライン全体を無期限にブロックすることはありません。

pub mod process;
mod stress;
mod transduce;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::errors::{CollaboratorError, Result, TranscriberError};

pub use crate::collaborator::stress::{PhonetisaurusPredictor, parse_prediction};
pub use crate::collaborator::transduce::FstTransducer;

/// 応答待ちの既定の制限時間
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 未知語の強勢位置を予測する外部エンジン
pub trait StressPredictor {
    /// 1単語の強勢付き表記を予測します。
    ///
    /// 予測が得られなかった場合は `Ok(None)` を返します。
    fn predict(&mut self, word: &str) -> Result<Option<String>, CollaboratorError>;
}

/// 強勢付きの行を最終的な発音表記に変換する外部エンジン
pub trait Transducer {
    /// 組み立てられた1行を変換します。
    ///
    /// 変換に失敗した場合は `Ok(None)` を返します。
    fn transduce(&mut self, line: &str) -> Result<Option<String>, CollaboratorError>;
}

impl<F> StressPredictor for F
where
    F: FnMut(&str) -> Result<Option<String>, CollaboratorError>,
{
    fn predict(&mut self, word: &str) -> Result<Option<String>, CollaboratorError> {
        self(word)
    }
}

impl<F> Transducer for F
where
    F: FnMut(&str) -> Result<Option<String>, CollaboratorError>,
{
    fn transduce(&mut self, line: &str) -> Result<Option<String>, CollaboratorError> {
        self(line)
    }
}

/// 外部プロセスへの要求を取り消すためのトークン
///
/// 複製したトークンはすべて同じ状態を共有します。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降の要求と応答待ちを取り消します。
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline(always)]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 外部プロセスの起動設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessConfig {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessConfig {
    /// 引数なしの設定を作成します。
    pub fn new<S>(program: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: vec![],
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// `phonetisaurus-g2p` を標準入力から読むモードで起動する設定
    ///
    /// # 引数
    ///
    /// * `model` - 強勢予測モデルのパス
    pub fn stress_predictor<P>(model: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self::new("phonetisaurus-g2p")
            .arg(format!("--model={}", model.as_ref().display()))
            .arg("--isfile")
            .arg("--input=/dev/stdin")
    }

    /// `transduce` を起動する設定
    ///
    /// # 引数
    ///
    /// * `fsts` - カンマ区切りのFSTファイルのパス
    pub fn transducer(fsts: &str) -> Self {
        Self::new("transduce").arg(format!("--fst={}", fsts.replace(' ', "")))
    }

    /// 引数を追加します。
    pub fn arg<S>(mut self, arg: S) -> Self
    where
        S: Into<String>,
    {
        self.args.push(arg.into());
        self
    }

    /// 応答待ちの制限時間を設定します。
    ///
    /// # エラー
    ///
    /// `timeout` が0の場合にエラーを返します。
    pub fn timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(TranscriberError::invalid_argument(
                "timeout",
                "must be greater than zero",
            ));
        }
        self.timeout = timeout;
        Ok(self)
    }

    #[inline(always)]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline(always)]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[inline(always)]
    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }
}
