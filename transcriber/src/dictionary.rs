//! 発音辞書の読み込みと管理
//!
//! [`Dictionary`] はユーザー辞書、一般辞書、`ё` 復元辞書、同形異音語辞書の4つを
//! 不変なまとまりとして保持します。辞書の再読み込みは新しい [`Dictionary`] を
//! 構築して丸ごと差し替えることで行います。
pub mod homograph;
pub mod lexicon;
pub mod report;
pub mod tags;

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TranscriberError};

pub use crate::dictionary::homograph::{
    Disambiguation, Evidence, HomographEntry, HomographSlot, HomographTable,
};
pub use crate::dictionary::lexicon::{LexEntry, Lexicon};
pub use crate::dictionary::report::{Problem, ProblemKind, ValidationReport};
pub use crate::dictionary::tags::{FeatureAnnotation, GENERIC_TAG};

/// 辞書の読み込みモード。
///
/// 辞書ファイルに無効なエントリが含まれていた場合の扱いを指定します。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// 無効なエントリを記録するだけで読み込みを続けます。
    #[default]
    Lenient,
    /// 無効な発音表記またはタグが1つでもあれば、`<path>.log` に診断レポートを
    /// 書き出して読み込みを失敗させます。
    Strict,
}

/// 読み込み用にリソースファイルを開きます。
///
/// # エラー
///
/// パスが存在しない場合は [`TranscriberError::ResourceNotFound`]、ディレクトリの場合は
/// [`TranscriberError::PathIsDirectory`] を返します。
pub fn open_resource(path: &Path) -> Result<File> {
    check_file(path)?;
    Ok(File::open(path)?)
}

fn check_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(TranscriberError::ResourceNotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(TranscriberError::PathIsDirectory(path.to_path_buf()));
    }
    Ok(())
}

/// 辞書ファイルのパスの組
///
/// 指定されなかった辞書は空として扱われます。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePaths {
    /// ユーザー辞書
    pub user_lexicon: Option<PathBuf>,
    /// 一般辞書
    pub lexicon: Option<PathBuf>,
    /// `ё` 復元辞書
    pub yo_lexicon: Option<PathBuf>,
    /// 同形異音語辞書
    pub homographs: Option<PathBuf>,
}

impl ResourcePaths {
    /// 指定されたすべてのパスを返します。
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [
            &self.user_lexicon,
            &self.lexicon,
            &self.yo_lexicon,
            &self.homographs,
        ]
        .into_iter()
        .flatten()
        .map(PathBuf::as_path)
    }

    /// 指定されたパスがすべて存在するファイルであることを確認します。
    ///
    /// # エラー
    ///
    /// 存在しないパス、またはディレクトリが含まれる場合にエラーを返します。
    pub fn check(&self) -> Result<()> {
        self.iter().try_for_each(check_file)
    }
}

/// 発音解決に使う辞書一式
///
/// 構築後は読み取り専用です。
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    user_lexicon: Lexicon,
    lexicon: Lexicon,
    yo_lexicon: Lexicon,
    homographs: HomographTable,
}

impl Dictionary {
    /// 空の辞書一式を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルから辞書一式を読み込みます。
    ///
    /// いずれかのファイルを読み込む前に、すべてのパスの存在を確認します。
    ///
    /// # 引数
    ///
    /// * `paths` - 辞書ファイルのパス
    /// * `mode` - 読み込みモード
    ///
    /// # エラー
    ///
    /// パスが存在しない場合、または厳格モードで検証に失敗した場合にエラーを返します。
    pub fn from_paths(paths: &ResourcePaths, mode: LoadMode) -> Result<Self> {
        paths.check()?;

        let mut dict = Self::new();
        if let Some(path) = &paths.user_lexicon {
            dict.user_lexicon = Lexicon::from_path(path, mode)?.0;
        }
        if let Some(path) = &paths.lexicon {
            dict.lexicon = Lexicon::from_path(path, mode)?.0;
        }
        if let Some(path) = &paths.yo_lexicon {
            dict.yo_lexicon = Lexicon::from_path(path, mode)?.0;
        }
        if let Some(path) = &paths.homographs {
            dict.homographs = HomographTable::from_path(path, mode)?.0;
        }
        Ok(dict)
    }

    /// ユーザー辞書を差し替えます。
    pub fn with_user_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.user_lexicon = lexicon;
        self
    }

    /// 一般辞書を差し替えます。
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// `ё` 復元辞書を差し替えます。
    pub fn with_yo_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.yo_lexicon = lexicon;
        self
    }

    /// 同形異音語辞書を差し替えます。
    pub fn with_homographs(mut self, homographs: HomographTable) -> Self {
        self.homographs = homographs;
        self
    }

    #[inline(always)]
    pub fn user_lexicon(&self) -> &Lexicon {
        &self.user_lexicon
    }

    #[inline(always)]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    #[inline(always)]
    pub fn yo_lexicon(&self) -> &Lexicon {
        &self.yo_lexicon
    }

    #[inline(always)]
    pub fn homographs(&self) -> &HomographTable {
        &self.homographs
    }
}
