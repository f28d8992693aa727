//! 入力ファイルを発音表記に変換するユーティリティ
//!
//! 入力ファイルの各行を変換し、発音表記を `<input>.g2p` に、診断トレースを
//! `<input>.log` に書き出します。強勢予測には `phonetisaurus-g2p` を、
//! 発音表記への変換には `transduce` を外部プロセスとして使用します。

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ru_transcriber::batch::{count_sentences, output_paths, transcribe_file};
use ru_transcriber::collaborator::{
    CancellationToken, FstTransducer, PhonetisaurusPredictor, ProcessConfig,
};
use ru_transcriber::dictionary::open_resource;
use ru_transcriber::errors::TranscriberError;
use ru_transcriber::{Dictionary, LoadMode, ResourcePaths, Transcriber};

use clap::Parser;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "transcribe", about = "Transcribes Russian text into stressed phonetic strings")]
struct Args {
    /// Input text file, one sentence per line.
    #[clap(short = 'i', long)]
    input: PathBuf,

    /// Lexicon used to restore the letter ё.
    #[clap(short = 'y', long)]
    yo_list: Option<PathBuf>,

    /// General pronunciation lexicon.
    #[clap(short = 'l', long)]
    dictionary: Option<PathBuf>,

    /// User lexicon overriding every other source.
    #[clap(short = 'u', long)]
    user: Option<PathBuf>,

    /// Homograph table.
    #[clap(short = 'a', long)]
    homographs: Option<PathBuf>,

    /// Stress prediction model for phonetisaurus-g2p.
    #[clap(short = 'm', long)]
    model_file: PathBuf,

    /// Comma-separated FST cascade for transduce.
    #[clap(short = 'g', long)]
    g2p_fst: String,

    /// Aborts when a dictionary file contains invalid entries.
    #[clap(long)]
    strict: bool,

    /// Seconds to wait for each response from an external process.
    #[clap(long, default_value = "30")]
    timeout: u64,
}

#[derive(Debug, thiserror::Error)]
enum TranscribeError {
    /// ライブラリのエラー
    #[error(transparent)]
    Transcriber(#[from] TranscriberError),

    /// FSTファイルが指定されていない
    #[error("No FST file is given in --g2p-fst")]
    NoFst,
}

/// カンマ区切りのFSTファイルがすべて存在することを確認します。
fn check_fsts(fsts: &str) -> Result<(), TranscribeError> {
    let mut num_fsts = 0;
    for fst in fsts.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        open_resource(Path::new(fst))?;
        num_fsts += 1;
    }
    if num_fsts == 0 {
        return Err(TranscribeError::NoFst);
    }
    Ok(())
}

/// メイン関数
///
/// 辞書と外部プロセスを準備し、入力ファイル全体を変換します。
///
/// # 戻り値
///
/// 実行が成功した場合は `Ok(())`、失敗した場合は対応する `TranscribeError`
fn main() -> Result<(), TranscribeError> {
    env_logger::init();
    let args = Args::parse();

    let mode = if args.strict {
        LoadMode::Strict
    } else {
        LoadMode::Lenient
    };
    let paths = ResourcePaths {
        user_lexicon: args.user,
        lexicon: args.dictionary,
        yo_lexicon: args.yo_list,
        homographs: args.homographs,
    };
    paths.check()?;
    open_resource(&args.input)?;
    open_resource(&args.model_file)?;
    check_fsts(&args.g2p_fst)?;

    eprintln!("Loading the dictionaries...");
    let dict = Dictionary::from_paths(&paths, mode)?;
    let transcriber = Transcriber::new(dict);
    let mut worker = transcriber.new_worker();

    let timeout = Duration::from_secs(args.timeout);
    let cancel = CancellationToken::new();
    let mut predictor = PhonetisaurusPredictor::spawn(
        &ProcessConfig::stress_predictor(&args.model_file).timeout(timeout)?,
        cancel.clone(),
    )?;
    let mut transducer = FstTransducer::spawn(
        &ProcessConfig::transducer(&args.g2p_fst).timeout(timeout)?,
        cancel.clone(),
    )?;
    log::info!("Timeout for external processes: {}s", args.timeout);

    let total = count_sentences(open_resource(&args.input)?)?;
    eprintln!("Transcribing {total} sentences...");

    let is_tty = atty::is(atty::Stream::Stderr);
    let summary = transcribe_file(
        &mut worker,
        &args.input,
        &mut predictor,
        &mut transducer,
        |n| {
            if is_tty {
                eprint!("\rProcessing sentence: {n}/{total}");
                io::stderr().flush().ok();
            } else {
                eprintln!("Processing sentence: {n}/{total}");
            }
        },
    )?;
    if is_tty {
        eprintln!();
    }
    cancel.cancel();

    let (g2p, log) = output_paths(&args.input);
    eprintln!(
        "Done: {} sentences, {} failed. Wrote {} and {}",
        summary.num_sentences,
        summary.num_failed,
        g2p.display(),
        log.display()
    );
    Ok(())
}
