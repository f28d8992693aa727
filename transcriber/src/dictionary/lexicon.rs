//! 単一発音の語彙辞書を管理するモジュール
//!
//! 語彙ファイルは1行に1エントリで、`<表記>\t<発音>` の形式です。
//! `#` で始まる行はコメント、空行は無視されます。

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

use hashbrown::HashMap;
use regex::Regex;

use crate::dictionary::report::{ProblemKind, ValidationReport};
use crate::dictionary::tags::{FeatureAnnotation, GENERIC_TAG};
use crate::dictionary::{LoadMode, open_resource};
use crate::errors::Result;
use crate::utils::is_valid_transcription;

static LEXICON_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\t(\S+)").unwrap());

/// 1つの表記に対する発音の集合
///
/// 発音はタグごとに高々1つ保持されます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexEntry {
    word: String,
    pronunciation_by_tag: HashMap<String, String>,
}

impl LexEntry {
    fn new(word: String) -> Self {
        Self {
            word,
            pronunciation_by_tag: HashMap::new(),
        }
    }

    /// エントリの表記
    pub fn word(&self) -> &str {
        &self.word
    }

    /// タグに対応する発音を返します。
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.pronunciation_by_tag.get(tag).map(String::as_str)
    }
}

/// 表記から発音を引く語彙辞書
///
/// ユーザー辞書、一般辞書、`ё` 復元辞書の3つのインスタンスが同じ型で表現されます。
/// 読み込みは常に全置換です。
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, LexEntry>,
}

impl Lexicon {
    /// 空の辞書を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// リーダーから辞書を読み込みます。
    ///
    /// 文法に合わない行と無効な発音表記はレポートに記録されます。無効な発音を持つ
    /// エントリもそのまま登録されます。複数の発音がカンマ区切りで書かれている場合は
    /// 最初のものだけを採用します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 語彙ファイルのリーダー
    ///
    /// # 戻り値
    ///
    /// 読み込んだ辞書と検証レポート
    ///
    /// # エラー
    ///
    /// 読み込み中にI/Oエラーが発生した場合にエラーを返します。
    pub fn from_reader<R>(rdr: R) -> Result<(Self, ValidationReport)>
    where
        R: Read,
    {
        let mut lexicon = Self::new();
        let mut report = ValidationReport::new();

        for (i, line) in BufReader::new(rdr).lines().enumerate() {
            let line_num = i + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(cap) = LEXICON_LINE.captures(line) else {
                log::error!("cannot parse line number: {line_num}");
                report.push(line_num, ProblemKind::Unparsable);
                continue;
            };
            let word = &cap[1];
            let phono = cap[2].replace(' ', "");
            let phono = phono.split(',').next().unwrap_or_default();
            if !is_valid_transcription(phono) {
                report.push(line_num, ProblemKind::InvalidTranscription);
            }
            lexicon.add_entry(word, phono, GENERIC_TAG);
        }

        Ok((lexicon, report))
    }

    /// ファイルから辞書を読み込みます。
    ///
    /// # 引数
    ///
    /// * `path` - 語彙ファイルのパス
    /// * `mode` - 読み込みモード
    ///
    /// # エラー
    ///
    /// パスが存在しない場合、ディレクトリである場合、または厳格モードで
    /// 無効なエントリが見つかった場合にエラーを返します。
    pub fn from_path<P>(path: P, mode: LoadMode) -> Result<(Self, ValidationReport)>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::info!("Loading lexicon: {}", path.display());
        let (lexicon, report) = Self::from_reader(open_resource(path)?)?;
        report.finish(path, mode)?;
        log::info!("Loaded {} entries from {}", lexicon.len(), path.display());
        Ok((lexicon, report))
    }

    /// エントリを追加します。同じ表記とタグの組がすでにあれば上書きします。
    ///
    /// # 引数
    ///
    /// * `word` - 表記（小文字化して登録されます）
    /// * `pronunciation` - 発音
    /// * `tag` - 素性タグ
    pub fn add_entry(&mut self, word: &str, pronunciation: &str, tag: &str) {
        let word = word.to_lowercase();
        self.entries
            .entry_ref(word.as_str())
            .or_insert_with(|| LexEntry::new(word.clone()))
            .pronunciation_by_tag
            .insert(tag.to_string(), pronunciation.to_string());
    }

    /// 表記とタグで発音を引きます。
    pub fn get_tagged(&self, word: &str, tag: &str) -> Option<&str> {
        self.entries.get(word).and_then(|e| e.get(tag))
    }

    /// 表記と注釈で発音を引きます。
    ///
    /// 注釈のタグで見つからない場合は汎用タグで引き直します。
    pub fn get(&self, word: &str, annotation: Option<&FeatureAnnotation>) -> Option<&str> {
        let entry = self.entries.get(word)?;
        annotation
            .and_then(|ann| entry.get(&ann.tag()))
            .or_else(|| entry.get(GENERIC_TAG))
            .filter(|p| !p.is_empty())
    }

    /// 表記のエントリを返します。
    pub fn entry(&self, word: &str) -> Option<&LexEntry> {
        self.entries.get(word)
    }

    /// 表記が登録されているかどうか
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// 登録されている表記の数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 辞書が空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
