//! 文字列処理のユーティリティ関数を提供するモジュール
//!
//! このモジュールには、発音表記の検証、単音節語へのストレス記号の挿入、
//! 空白の正規化などの小さなヘルパー関数が含まれています。

use std::sync::LazyLock;

use regex::Regex;

/// ストレス記号。直後の母音に語強勢があることを示します。
pub const STRESS_MARKER: char = '+';

/// 書き言葉で省略されることが多い発音区別符号付きの母音
pub const YO: char = 'ё';

/// [`YO`] から発音区別符号を取り除いた文字
pub const YE: char = 'е';

/// 単音節語の判定に使う母音
pub const VOWELS: &str = "еиюяаоуэыё";

static VALID_CYRILLIC_PHONO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[а-яА-ЯёЁ+\-]+$").unwrap());

static VALID_ASCII_PHONO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z@_\-]+$").unwrap());

/// 発音表記が有効な文字クラスだけで構成されているかを判定します。
///
/// キリル文字とストレス記号からなる表記、またはASCIIの音素記号からなる表記を
/// 有効とみなします。両者の混在は認めません。
///
/// # 例
///
/// ```
/// # use ru_transcriber::utils::is_valid_transcription;
/// assert!(is_valid_transcription("м+ама"));
/// assert!(is_valid_transcription("m_a@"));
/// assert!(!is_valid_transcription("м+amа"));
/// assert!(!is_valid_transcription(""));
/// ```
pub fn is_valid_transcription(phono: &str) -> bool {
    VALID_CYRILLIC_PHONO.is_match(phono) || VALID_ASCII_PHONO.is_match(phono)
}

/// 単語が単音節であれば、その唯一の母音を返します。
///
/// 母音がちょうど1つで、かつ [`YO`] を含まない場合のみ `Some` を返します。
/// [`YO`] は常に強勢を持つため、ストレス記号を補う必要がありません。
///
/// # 引数
///
/// * `word` - 判定する単語
///
/// # 戻り値
///
/// 単音節語であればその母音
pub fn monosyllabic_vowel(word: &str) -> Option<char> {
    if word.contains(YO) {
        return None;
    }
    let mut vowels = word.chars().filter(|c| VOWELS.contains(*c));
    match (vowels.next(), vowels.next()) {
        (Some(v), None) => Some(v),
        _ => None,
    }
}

/// ストレス予測器がストレス記号を付けなかった単音節語に記号を補います。
///
/// 予測結果にストレス記号が含まれず、母音がちょうど1つの場合に限り、
/// その母音の直前に [`STRESS_MARKER`] を挿入します。それ以外の場合は入力を
/// そのまま返します。
///
/// # 例
///
/// ```
/// # use ru_transcriber::utils::inject_monosyllabic_stress;
/// assert_eq!(inject_monosyllabic_stress("д о м"), "д +о м");
/// assert_eq!(inject_monosyllabic_stress("м+ама"), "м+ама");
/// assert_eq!(inject_monosyllabic_stress("мама"), "мама");
/// ```
pub fn inject_monosyllabic_stress(predicted: &str) -> String {
    if predicted.contains(STRESS_MARKER) {
        return predicted.to_string();
    }
    match monosyllabic_vowel(predicted) {
        Some(vowel) => {
            let mut buf = [0; 4];
            let vowel = vowel.encode_utf8(&mut buf);
            predicted.replace(&*vowel, &format!("{STRESS_MARKER}{vowel}"))
        }
        None => predicted.to_string(),
    }
}

/// 連続する空白を1つにまとめ、前後の空白を取り除きます。
pub fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
/// HashMapリテラルを簡潔に記述するためのマクロ
///
/// ```ignore
/// let map = hashmap! {
///     "key1" => "value1",
///     "key2" => "value2",
/// };
/// ```
macro_rules! hashmap {
    ( $($k:expr => $v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashMap::new();
            $(
                h.insert($k, $v);
            )*
            h
        }
    };
    ( $($k:expr => $v:expr),* ) => {
        hashmap![$( $k => $v, )*]
    };
}

#[cfg(test)]
pub(crate) use hashmap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transcription() {
        assert!(is_valid_transcription("з+амок"));
        assert!(is_valid_transcription("кто-т+о"));
        assert!(is_valid_transcription("ZAMOK"));
        assert!(!is_valid_transcription("з+амок1"));
        assert!(!is_valid_transcription("з амок"));
    }

    #[test]
    fn test_monosyllabic_vowel() {
        assert_eq!(monosyllabic_vowel("дом"), Some('о'));
        assert_eq!(monosyllabic_vowel("д о м"), Some('о'));
        assert_eq!(monosyllabic_vowel("мама"), None);
        assert_eq!(monosyllabic_vowel("ёж"), None);
        assert_eq!(monosyllabic_vowel("вдрызг"), Some('ы'));
        assert_eq!(monosyllabic_vowel("вздр"), None);
    }

    #[test]
    fn test_inject_stress_only_without_marker() {
        assert_eq!(inject_monosyllabic_stress("д+ом"), "д+ом");
        assert_eq!(inject_monosyllabic_stress("дом"), "д+ом");
        assert_eq!(inject_monosyllabic_stress("ёж"), "ёж");
        assert_eq!(inject_monosyllabic_stress(""), "");
    }

    #[test]
    fn test_collapse_spaces() {
        assert_eq!(collapse_spaces("  a   b c  "), "a b c");
        assert_eq!(collapse_spaces(""), "");
    }
}
