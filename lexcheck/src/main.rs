//! 辞書ファイルを厳格モードで検証するユーティリティ
//!
//! 無効なエントリを含むファイルごとに `<path>.log` へ診断レポートを書き出します。
//! 問題のないファイルについては、以前の実行で残ったレポートを削除します。

use std::path::{Path, PathBuf};

use ru_transcriber::dictionary::{HomographTable, Lexicon};
use ru_transcriber::errors::TranscriberError;
use ru_transcriber::LoadMode;

use clap::Parser;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "lexcheck", about = "Validates pronunciation dictionaries")]
struct Args {
    /// General lexicon files.
    #[clap(short = 'l', long = "dictionary")]
    lexicons: Vec<PathBuf>,

    /// User lexicon files.
    #[clap(short = 'u', long = "user")]
    user_lexicons: Vec<PathBuf>,

    /// Lexicons used to restore the letter ё.
    #[clap(short = 'y', long = "yo-list")]
    yo_lexicons: Vec<PathBuf>,

    /// Homograph tables.
    #[clap(short = 'a', long)]
    homographs: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum LexcheckError {
    #[error(transparent)]
    Transcriber(#[from] TranscriberError),

    #[error("No dictionary file is given")]
    NoInput,

    /// 検証に失敗したファイルがある
    #[error("{0} of {1} dictionary files failed validation")]
    Failed(usize, usize),
}

/// 検証の結果を表示します。
///
/// 検証エラーは集計のために `Ok(false)` として返し、それ以外のエラーはそのまま返します。
fn report(path: &Path, result: Result<usize, TranscriberError>) -> Result<bool, LexcheckError> {
    match result {
        Ok(num_entries) => {
            eprintln!("OK\t{}\t{num_entries} entries", path.display());
            Ok(true)
        }
        Err(TranscriberError::DictionaryValidation {
            report, num_errors, ..
        }) => {
            eprintln!(
                "FAILED\t{}\t{num_errors} errors, see {}",
                path.display(),
                report.display()
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// メイン関数
///
/// 指定されたすべての辞書ファイルを検証し、1つでも失敗があればエラーを返します。
fn main() -> Result<(), LexcheckError> {
    env_logger::init();
    let args = Args::parse();

    let lexicons: Vec<&PathBuf> = args
        .user_lexicons
        .iter()
        .chain(&args.lexicons)
        .chain(&args.yo_lexicons)
        .collect();
    let num_files = lexicons.len() + args.homographs.len();
    if num_files == 0 {
        return Err(LexcheckError::NoInput);
    }

    let mut num_failed = 0;
    for path in lexicons {
        let result = Lexicon::from_path(path, LoadMode::Strict).map(|(lex, _)| lex.len());
        if !report(path, result)? {
            num_failed += 1;
        }
    }
    for path in &args.homographs {
        let result =
            HomographTable::from_path(path, LoadMode::Strict).map(|(table, _)| table.len());
        if !report(path, result)? {
            num_failed += 1;
        }
    }

    if num_failed != 0 {
        return Err(LexcheckError::Failed(num_failed, num_files));
    }
    eprintln!("All {num_files} dictionary files are valid");
    Ok(())
}
