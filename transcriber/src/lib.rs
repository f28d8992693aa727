//! # ru-transcriber
//!
//! ロシア語のテキストを、音声合成向けの発音表記に変換するための発音解決パイプラインです。
//!
//! ## 概要
//!
//! 入力行を正規化してトークンに分割し、ユーザー辞書、同形異音語辞書、一般辞書、
//! 外部の強勢予測器の順に各トークンの強勢位置を決定します。強勢付きの行は
//! 外部の有限状態トランスデューサーによって最終的な発音表記に変換されます。
//!
//! ## 主な機能
//!
//! - **正規化**: 句読点の整理と、省略された `ё` の復元
//! - **同形異音語の曖昧性解消**: 品詞と形態素性の重なりによる発音の選択
//! - **辞書の検証**: 寛容モードと厳格モードでの読み込みと診断レポート
//! - **外部プロセスとの協調**: タイムアウトとキャンセルを備えた行単位の要求と応答
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ru_transcriber::dictionary::{Dictionary, HomographTable, LoadMode};
//! use ru_transcriber::errors::CollaboratorError;
//! use ru_transcriber::trace::NullTrace;
//! use ru_transcriber::Transcriber;
//!
//! let homographs = "\
//! 120 замок nn(sg,nom) [з+амок]
//! 80 замок nn(sg,acc) [зам+ок]";
//! let (homographs, _) = HomographTable::from_reader(homographs.as_bytes(), LoadMode::Strict)?;
//!
//! let transcriber = Transcriber::new(Dictionary::new().with_homographs(homographs));
//! let mut worker = transcriber.new_worker();
//!
//! let mut predictor = |word: &str| -> Result<Option<String>, CollaboratorError> {
//!     Ok(Some(word.to_string()))
//! };
//! let mut transducer = |line: &str| -> Result<Option<String>, CollaboratorError> {
//!     Ok(Some(line.to_string()))
//! };
//!
//! worker.reset_sentence("Старый замок.");
//! let stress = worker.transcribe(&mut predictor, &mut transducer, &mut NullTrace)?;
//! assert_eq!(stress, "старый з+амок");
//! # Ok(())
//! # }
//! ```

/// 一括変換
pub mod batch;

/// 外部プロセスとの協調
pub mod collaborator;

/// 発音辞書
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 入力行の正規化
pub mod sentence;

/// 品詞タグ付けのインターフェース
pub mod tagger;

/// トークン型の定義
pub mod token;

/// 診断トレース
pub mod trace;

/// 発音解決
pub mod transcriber;

/// 文字列処理のユーティリティ
pub mod utils;


// Re-exports
pub use dictionary::{Dictionary, LoadMode, ResourcePaths};
pub use transcriber::{TRANSCRIPTION_ERROR, Transcriber, Worker};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
