//! 同形異音語辞書を管理するモジュール
//!
//! 同形異音語ファイルの各行は次の形式です。
//!
//! ```text
//! <頻度> <表記> <品詞>(<素性>,<素性>...) [<発音>[,<発音>...]] [LEX<数字>]
//! ```
//!
//! 同じ表記の行は1つのエントリのスロットとして順に追加されます。

mod disambiguation;

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

use hashbrown::HashMap;
use regex::Regex;

use crate::dictionary::report::{ProblemKind, ValidationReport};
use crate::dictionary::tags::{is_valid_feature, is_valid_pos};
use crate::dictionary::{LoadMode, open_resource};
use crate::errors::Result;
use crate::utils::is_valid_transcription;

pub use crate::dictionary::homograph::disambiguation::{Disambiguation, Evidence};

static HOMOGRAPH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(\S+)\s+([^(]+)\(([^)]*)\)\s+\[([^\]]+)\](?:\s+LEX(\d))?$").unwrap()
});

/// 同形異音語エントリの1スロット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomographSlot {
    /// コーパス上の出現頻度
    pub frequency: u32,
    /// 発音
    pub pronunciation: String,
    /// 品詞タグ
    pub pos: String,
    /// 形態素性タグ（ファイル上の順序を保持）
    pub features: Vec<String>,
    /// 優先エントリ（`LEX1`）かどうか
    pub preferred: bool,
}

impl HomographSlot {
    /// 新しいスロットを作成します。
    pub fn new<P, S>(frequency: u32, pos: P, features: &[&str], pronunciation: S) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            frequency,
            pronunciation: pronunciation.into(),
            pos: pos.into(),
            features: features.iter().map(|f| f.to_string()).collect(),
            preferred: false,
        }
    }

    /// 優先エントリの印を設定します。
    pub fn preferred(mut self, yes: bool) -> Self {
        self.preferred = yes;
        self
    }
}

/// 1つの表記に対する同形異音語エントリ
///
/// スロットは追加のみで、削除や並べ替えは行われません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomographEntry {
    ortho: String,
    slots: Vec<HomographSlot>,
    has_divergent_pronunciations: bool,
}

impl HomographEntry {
    /// 最初のスロットからエントリを作成します。
    pub fn new<S>(ortho: S, slot: HomographSlot) -> Self
    where
        S: Into<String>,
    {
        Self {
            ortho: ortho.into(),
            slots: vec![slot],
            has_divergent_pronunciations: false,
        }
    }

    /// スロットを末尾に追加します。
    ///
    /// 既存のどのスロットとも異なる発音が追加された時点で、
    /// エントリは発音が分岐しているとみなされます。この印は解除されません。
    /// 優先エントリの印は最初のスロットだけが保持します。
    pub fn push(&mut self, mut slot: HomographSlot) {
        if !self
            .slots
            .iter()
            .any(|s| s.pronunciation == slot.pronunciation)
        {
            self.has_divergent_pronunciations = true;
        }
        if slot.preferred && self.slots.iter().any(|s| s.preferred) {
            slot.preferred = false;
        }
        self.slots.push(slot);
    }

    /// エントリの表記
    pub fn ortho(&self) -> &str {
        &self.ortho
    }

    /// すべてのスロット
    pub fn slots(&self) -> &[HomographSlot] {
        &self.slots
    }

    /// 異なる発音を持つスロットが存在するかどうか
    pub fn has_divergent_pronunciations(&self) -> bool {
        self.has_divergent_pronunciations
    }
}

/// 表記から同形異音語エントリを引く辞書
#[derive(Debug, Clone, Default)]
pub struct HomographTable {
    entries: HashMap<String, HomographEntry>,
}

impl HomographTable {
    /// 空の辞書を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// リーダーから辞書を読み込みます。
    ///
    /// 発音がカンマ区切りで複数ある場合は、関連度順に並んでいるものとして最初の発音を採用します。
    /// 未知の品詞を持つ行は常に捨てられ、未知の素性を持つ行は厳格モードでのみ捨てられます。
    ///
    /// # 引数
    ///
    /// * `rdr` - 同形異音語ファイルのリーダー
    /// * `mode` - 読み込みモード
    ///
    /// # エラー
    ///
    /// 読み込み中にI/Oエラーが発生した場合にエラーを返します。頻度が `u32` に収まらない行は
    /// 文法に合わない行として記録されます。
    pub fn from_reader<R>(rdr: R, mode: LoadMode) -> Result<(Self, ValidationReport)>
    where
        R: Read,
    {
        let mut table = Self::new();
        let mut report = ValidationReport::new();

        for (i, line) in BufReader::new(rdr).lines().enumerate() {
            let line_num = i + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(cap) = HOMOGRAPH_LINE.captures(line) else {
                log::warn!("cannot parse homograph line number: {line_num}");
                report.push(line_num, ProblemKind::Unparsable);
                continue;
            };
            let Ok(frequency) = cap[1].parse::<u32>() else {
                log::warn!("frequency out of range in homograph line number: {line_num}");
                report.push(line_num, ProblemKind::Unparsable);
                continue;
            };
            let ortho = cap[2].to_lowercase();
            let pos = cap[3].trim().to_lowercase();
            let features: Vec<String> = cap[4]
                .replace(' ', "")
                .split(',')
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
            let raw_phono = cap[5].replace(' ', "");
            let preferred = cap.get(6).is_some_and(|m| m.as_str() == "1");

            if raw_phono.split(',').any(|p| !is_valid_transcription(p)) {
                report.push(line_num, ProblemKind::InvalidTranscription);
            }
            let pronunciation = raw_phono.split(',').next().unwrap_or_default().to_string();

            let valid_pos = is_valid_pos(&pos);
            let valid_features = features.iter().all(|f| is_valid_feature(f));
            if !valid_pos || !valid_features {
                report.push(line_num, ProblemKind::InvalidTags);
                if !valid_pos || mode == LoadMode::Strict {
                    continue;
                }
            }

            let slot = HomographSlot {
                frequency,
                pronunciation,
                pos,
                features,
                preferred,
            };
            table.insert(ortho, slot);
        }

        Ok((table, report))
    }

    /// ファイルから辞書を読み込みます。
    ///
    /// # 引数
    ///
    /// * `path` - 同形異音語ファイルのパス
    /// * `mode` - 読み込みモード
    ///
    /// # エラー
    ///
    /// パスが存在しない場合、または厳格モードで無効な行が見つかった場合にエラーを返します。
    pub fn from_path<P>(path: P, mode: LoadMode) -> Result<(Self, ValidationReport)>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::info!("Loading homographs dictionary: {}", path.display());
        let (table, report) = Self::from_reader(open_resource(path)?, mode)?;
        report.finish(path, mode)?;
        log::info!("Loaded {} homographs from {}", table.len(), path.display());
        Ok((table, report))
    }

    /// スロットを追加します。表記が未登録なら新しいエントリを作成します。
    pub fn insert<S>(&mut self, ortho: S, slot: HomographSlot)
    where
        S: Into<String>,
    {
        let ortho = ortho.into();
        match self.entries.get_mut(&ortho) {
            Some(entry) => entry.push(slot),
            None => {
                let entry = HomographEntry::new(ortho.clone(), slot);
                self.entries.insert(ortho, entry);
            }
        }
    }

    /// 表記のエントリを返します。
    pub fn get(&self, word: &str) -> Option<&HomographEntry> {
        self.entries.get(word)
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
