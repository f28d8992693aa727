//! 入力ファイル全体の一括変換
//!
//! 入力ファイルの各行を順に変換し、発音表記を `<input>.g2p` に、診断トレースを
//! `<input>.log` に書き出します。`#` で始まる行はコメントとして読み飛ばされます。

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::collaborator::{StressPredictor, Transducer};
use crate::dictionary::open_resource;
use crate::errors::Result;
use crate::trace::{Trace, TraceTag, TraceWriter};
use crate::transcriber::{TRANSCRIPTION_ERROR, Worker};

/// 一括変換の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// 変換した行数（コメント行を除く）
    pub num_sentences: usize,
    /// 変換に失敗した行数
    pub num_failed: usize,
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// コメント行を除いた行数を数えます。
///
/// # エラー
///
/// 読み込み中にI/Oエラーが発生した場合にエラーを返します。
pub fn count_sentences<R>(rdr: R) -> Result<usize>
where
    R: Read,
{
    let mut num = 0;
    for line in BufReader::new(rdr).lines() {
        if !is_comment(&line?) {
            num += 1;
        }
    }
    Ok(num)
}

/// 入力ファイルに対応する出力ファイルのパスを返します。
///
/// # 戻り値
///
/// `(<input>.g2p, <input>.log)`
pub fn output_paths(input: &Path) -> (PathBuf, PathBuf) {
    let with_suffix = |suffix: &str| {
        let mut name = input.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };
    (with_suffix(".g2p"), with_suffix(".log"))
}

/// リーダーの各行を変換して書き出します。
///
/// 変換結果は1行ごとに書き出され、すぐにフラッシュされます。
///
/// # 引数
///
/// * `worker` - ワーカー
/// * `rdr` - 入力
/// * `wtr` - 発音表記の出力先
/// * `predictor` - 強勢予測器
/// * `transducer` - トランスデューサー
/// * `trace` - 診断トレースの書き込み先
/// * `progress` - 各行の処理前に、1始まりの文番号とともに呼び出される
///
/// # エラー
///
/// 入出力でI/Oエラーが発生した場合にエラーを返します。
#[allow(clippy::too_many_arguments)]
pub fn transcribe_lines<R, W, P, T, Tr, F>(
    worker: &mut Worker,
    rdr: R,
    mut wtr: W,
    predictor: &mut P,
    transducer: &mut T,
    trace: &mut Tr,
    mut progress: F,
) -> Result<BatchSummary>
where
    R: Read,
    W: Write,
    P: StressPredictor + ?Sized,
    T: Transducer + ?Sized,
    Tr: Trace + ?Sized,
    F: FnMut(usize),
{
    let mut summary = BatchSummary::default();
    for (i, line) in BufReader::new(rdr).lines().enumerate() {
        let line = line?;
        if is_comment(&line) {
            continue;
        }
        summary.num_sentences += 1;
        progress(summary.num_sentences);

        trace.record(TraceTag::SentenceNumber, &(i + 1).to_string())?;
        worker.reset_sentence(&line);
        let transcription = worker.transcribe(predictor, transducer, trace)?;
        if transcription == TRANSCRIPTION_ERROR {
            summary.num_failed += 1;
        }
        writeln!(wtr, "{transcription}")?;
        wtr.flush()?;
    }
    Ok(summary)
}

/// 入力ファイルを変換し、`<input>.g2p` と `<input>.log` を書き出します。
///
/// # 引数
///
/// * `worker` - ワーカー
/// * `input` - 入力ファイル
/// * `predictor` - 強勢予測器
/// * `transducer` - トランスデューサー
/// * `progress` - 文番号を受け取るコールバック
///
/// # エラー
///
/// 入力ファイルが存在しない場合、または入出力でI/Oエラーが発生した場合にエラーを返します。
pub fn transcribe_file<P, T, F>(
    worker: &mut Worker,
    input: &Path,
    predictor: &mut P,
    transducer: &mut T,
    progress: F,
) -> Result<BatchSummary>
where
    P: StressPredictor + ?Sized,
    T: Transducer + ?Sized,
    F: FnMut(usize),
{
    let rdr = open_resource(input)?;
    let (g2p_path, log_path) = output_paths(input);
    let out = BufWriter::new(File::create(&g2p_path)?);
    let mut trace = TraceWriter::new(BufWriter::new(File::create(&log_path)?));

    let summary = transcribe_lines(
        worker,
        rdr,
        out,
        predictor,
        transducer,
        &mut trace,
        progress,
    )?;
    trace.into_inner().flush()?;

    log::info!(
        "Transcribed {} sentences from {} ({} failed)",
        summary.num_sentences,
        input.display(),
        summary.num_failed
    );
    Ok(summary)
}
