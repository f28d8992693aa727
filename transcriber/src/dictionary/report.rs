//! 辞書ファイルの検証レポート
//!
//! 読み込み中に見つかった問題を行番号とともに記録し、厳格モードでは
//! `<辞書ファイル>.log` に書き出します。

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::dictionary::LoadMode;
use crate::errors::{Result, TranscriberError};

/// 検証で見つかった問題の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    /// 行が文法に一致しない
    Unparsable,
    /// 発音表記に無効な文字が含まれる
    InvalidTranscription,
    /// 未知の品詞・素性タグ
    InvalidTags,
}

impl ProblemKind {
    /// 厳格モードで読み込みを中断させる問題かどうか
    #[inline(always)]
    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Unparsable)
    }
}

/// 行番号付きの問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// 1始まりの行番号
    pub line: usize,
    /// 問題の種類
    pub kind: ProblemKind,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProblemKind::Unparsable => write!(f, "error while parsing line:\t{}", self.line),
            ProblemKind::InvalidTranscription => {
                write!(f, "[WARNING] transcription not valid in line: {}", self.line)
            }
            ProblemKind::InvalidTags => write!(f, "invalid tags found in line:\t{}", self.line),
        }
    }
}

/// 1つの辞書ファイルに対する検証レポート
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    problems: Vec<Problem>,
}

impl ValidationReport {
    /// 空のレポートを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, line: usize, kind: ProblemKind) {
        self.problems.push(Problem { line, kind });
    }

    /// 記録された問題
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// 問題が1つもなければ `true`
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// 厳格モードで致命的となる問題の数
    pub fn num_fatal(&self) -> usize {
        self.problems.iter().filter(|p| p.kind.is_fatal()).count()
    }

    /// 辞書ファイルに対応するレポートファイルのパス
    pub fn report_path(dict_path: &Path) -> PathBuf {
        let mut name = dict_path.as_os_str().to_os_string();
        name.push(".log");
        PathBuf::from(name)
    }

    /// レポートを書き出します。
    ///
    /// # 引数
    ///
    /// * `wtr` - 書き込み先
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        let mut wtr = BufWriter::new(wtr);
        for problem in &self.problems {
            writeln!(&mut wtr, "{problem}")?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// 読み込みモードに従ってレポートを確定します。
    ///
    /// 厳格モードで致命的な問題がある場合は `<dict_path>.log` を書き出して
    /// [`TranscriberError::DictionaryValidation`] を返します。問題がなければ
    /// 以前の実行で残ったレポートファイルを削除します。寛容モードでは何もしません。
    ///
    /// # 引数
    ///
    /// * `dict_path` - 検証した辞書ファイル
    /// * `mode` - 読み込みモード
    pub fn finish(&self, dict_path: &Path, mode: LoadMode) -> Result<()> {
        if mode == LoadMode::Lenient {
            return Ok(());
        }
        let report = Self::report_path(dict_path);
        let num_errors = self.num_fatal();
        if num_errors == 0 {
            if report.is_file() {
                fs::remove_file(&report)?;
            }
            return Ok(());
        }
        self.write(File::create(&report)?)?;
        log::error!(
            "Errors found while reading dictionary file {}, see {}",
            dict_path.display(),
            report.display()
        );
        Err(TranscriberError::DictionaryValidation {
            path: dict_path.to_path_buf(),
            report,
            num_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparsable_is_not_fatal() {
        let mut report = ValidationReport::new();
        report.push(3, ProblemKind::Unparsable);
        assert!(!report.is_clean());
        assert_eq!(report.num_fatal(), 0);
        report.push(5, ProblemKind::InvalidTags);
        assert_eq!(report.num_fatal(), 1);
    }

    #[test]
    fn test_write_report() {
        let mut report = ValidationReport::new();
        report.push(2, ProblemKind::InvalidTranscription);
        report.push(7, ProblemKind::InvalidTags);
        let mut buf = vec![];
        report.write(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "[WARNING] transcription not valid in line: 2\ninvalid tags found in line:\t7\n"
        );
    }

    #[test]
    fn test_finish_strict_writes_and_removes_report() {
        let dir = tempfile::tempdir().unwrap();
        let dict = dir.path().join("lexicon.txt");
        let report_path = ValidationReport::report_path(&dict);

        let mut report = ValidationReport::new();
        report.push(1, ProblemKind::InvalidTranscription);
        let err = report.finish(&dict, LoadMode::Strict).unwrap_err();
        assert!(matches!(err, TranscriberError::DictionaryValidation { num_errors: 1, .. }));
        assert!(report_path.is_file());

        ValidationReport::new().finish(&dict, LoadMode::Strict).unwrap();
        assert!(!report_path.exists());
    }

    #[test]
    fn test_finish_lenient_ignores_problems() {
        let dir = tempfile::tempdir().unwrap();
        let dict = dir.path().join("lexicon.txt");
        let mut report = ValidationReport::new();
        report.push(1, ProblemKind::InvalidTranscription);
        report.finish(&dict, LoadMode::Lenient).unwrap();
        assert!(!ValidationReport::report_path(&dict).exists());
    }
}
