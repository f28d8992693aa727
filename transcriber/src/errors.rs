//! エラー型の定義
//!
//! このモジュールは、トランスクライバーで使用されるすべてのエラー型を定義します。
//! 辞書の読み込みや外部プロセスとの通信で発生するエラーはここに集約されます。

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// トランスクライバー専用のResult型
///
/// エラー型としてデフォルトで[`TranscriberError`]を使用します。
pub type Result<T, E = TranscriberError> = std::result::Result<T, E>;

/// トランスクライバーのエラー型
///
/// 初期化時のエラー（辞書の検証失敗、リソースの欠落、外部プロセスの起動失敗）は
/// すべて致命的であり、1行も処理せずに実行を中断します。
#[derive(Debug, thiserror::Error)]
pub enum TranscriberError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 無効な状態エラー
    ///
    /// [`InvalidStateError`]のエラーバリアント。
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// 標準I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// 指定されたリソースのパスが存在しない
    #[error("path does not exist: '{}'", .0.display())]
    ResourceNotFound(PathBuf),

    /// ディレクトリが指定されたエラー
    ///
    /// ファイルが期待される場所にディレクトリが指定された場合に発生します。
    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(PathBuf),

    /// 厳格モードでの辞書検証の失敗
    ///
    /// 診断レポートは `report` に書き出されています。
    #[error(
        "Errors found while reading dictionary file '{}': {num_errors} problem(s). \
        Review log file '{}' and correct the errors",
        path.display(),
        report.display()
    )]
    DictionaryValidation {
        /// 検証に失敗した辞書ファイル
        path: PathBuf,
        /// 書き出された診断レポート
        report: PathBuf,
        /// 検出された問題の数
        num_errors: usize,
    },

    /// 外部プロセスとの通信エラー
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl TranscriberError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効な状態エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 状態が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidStateError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの根本原因
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}

/// 外部プロセス（ストレス予測器・トランスデューサー）との通信エラー
///
/// 応答待ちにはタイムアウトとキャンセルが設定されるため、停止したプロセスが
/// パイプライン全体を無期限にブロックすることはありません。
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// プロセスを起動できない
    #[error("could not initialize '{program}': {source}")]
    Spawn {
        /// 実行しようとしたプログラム
        program: String,
        /// 起動失敗の原因
        #[source]
        source: std::io::Error,
    },

    /// 応答が制限時間内に返らなかった
    #[error("'{name}' did not answer within {timeout:?}")]
    Timeout {
        /// 外部プロセスの名前
        name: String,
        /// 設定されていた制限時間
        timeout: Duration,
    },

    /// 応答の前に出力が閉じられた
    #[error("'{name}' closed its output unexpectedly")]
    UnexpectedEof {
        /// 外部プロセスの名前
        name: String,
    },

    /// 応答待ちがキャンセルされた
    #[error("request to '{name}' was cancelled")]
    Cancelled {
        /// 外部プロセスの名前
        name: String,
    },

    /// 要求の書き込み中のI/Oエラー
    #[error("I/O error while talking to '{name}': {source}")]
    Io {
        /// 外部プロセスの名前
        name: String,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },
}
