//! 行ごとの診断トレース
//!
//! 発音解決の各段階で起きたことを `[TAG]\tvalue` 形式の記録として書き出します。
//! ライブラリ全体のログ（`log` クレート）とは独立した出力先です。

use std::fmt;
use std::io::{self, Write};

/// トレース記録の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceTag {
    /// 入力ファイル上の行番号
    SentenceNumber,
    /// 入力行
    Sentence,
    /// 正規化済みの文
    Normalized,
    /// `ё` の復元
    YoRestoration,
    /// トークン
    Word,
    /// 素性注釈
    PosPrediction,
    /// 発音の取得元
    Info,
    /// 同形異音語の曖昧性解消の根拠
    Disambiguation,
    /// ストレス付きの文字列
    Stress,
    /// 最終的な発音表記
    Phonetic,
}

impl TraceTag {
    /// ログに出力されるタグ名
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SentenceNumber => "SNUM",
            Self::Sentence => "SENT",
            Self::Normalized => "NORM",
            Self::YoRestoration => "YOWR",
            Self::Word => "WORD",
            Self::PosPrediction => "POSP",
            Self::Info => "INFO",
            Self::Disambiguation => "DISA",
            Self::Stress => "STRS",
            Self::Phonetic => "SPHO",
        }
    }
}

impl fmt::Display for TraceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.as_str())
    }
}

/// トレース記録の書き込み先
pub trait Trace {
    /// 1件の記録を書き込みます。
    fn record(&mut self, tag: TraceTag, value: &str) -> io::Result<()>;
}

/// 何も記録しないトレース
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl Trace for NullTrace {
    #[inline(always)]
    fn record(&mut self, _tag: TraceTag, _value: &str) -> io::Result<()> {
        Ok(())
    }
}

/// 記録をメモリ上に保持します。
impl Trace for Vec<(TraceTag, String)> {
    fn record(&mut self, tag: TraceTag, value: &str) -> io::Result<()> {
        self.push((tag, value.to_string()));
        Ok(())
    }
}

/// 記録を `[TAG]\tvalue` の行として書き出すトレース
///
/// 各行の最終記録（[`TraceTag::Phonetic`]）の後には空行が挿入されます。
pub struct TraceWriter<W>
where
    W: Write,
{
    wtr: W,
}

impl<W> TraceWriter<W>
where
    W: Write,
{
    pub fn new(wtr: W) -> Self {
        Self { wtr }
    }

    /// 内部の書き込み先を返します。
    pub fn into_inner(self) -> W {
        self.wtr
    }
}

impl<W> Trace for TraceWriter<W>
where
    W: Write,
{
    fn record(&mut self, tag: TraceTag, value: &str) -> io::Result<()> {
        writeln!(self.wtr, "{tag}\t{value}")?;
        if tag == TraceTag::Phonetic {
            writeln!(self.wtr)?;
            self.wtr.flush()?;
        }
        Ok(())
    }
}
