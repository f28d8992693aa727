//! 素性の重なりによる同形異音語の曖昧性解消

use std::fmt;

use hashbrown::HashSet;

use crate::dictionary::homograph::{HomographEntry, HomographSlot};
use crate::dictionary::tags::FeatureAnnotation;

/// 発音が選ばれた根拠
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// すべてのスロットが同じ発音を持つため、品詞の一致だけで決まった
    NotHomograph,
    /// 品詞が一致したスロットが1つだけだった
    Pos(String),
    /// 素性の重なりが最大のスロットが選ばれた
    Features(Vec<String>),
    /// 優先エントリ（`LEX1`）が選ばれた
    Preferred,
    /// スロットが1つしかなかった
    Singleton,
    /// 頻度が最大のスロットが選ばれた
    Frequency,
}

impl Evidence {
    /// 根拠をラベルの列として返します。
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::NotHomograph => vec!["NOT_HOMOGRAPH".to_string()],
            Self::Pos(pos) => vec![pos.clone()],
            Self::Features(features) => features.clone(),
            Self::Preferred => vec!["LEX1".to_string()],
            Self::Singleton => vec!["SINGLETON".to_string()],
            Self::Frequency => vec!["FREQ".to_string()],
        }
    }

    /// 注釈が実際に曖昧性の解消に使われたかどうか
    pub fn is_contextual(&self) -> bool {
        matches!(self, Self::Pos(_) | Self::Features(_))
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join("/"))
    }
}

/// 曖昧性解消の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disambiguation<'a> {
    /// 選ばれた発音
    pub pronunciation: &'a str,
    /// 選ばれた根拠
    pub evidence: Evidence,
}

impl HomographEntry {
    /// 注釈に最もよく一致する発音を選びます。
    ///
    /// 1. 注釈の品詞と一致するスロットを元の順序で集めます。
    /// 2. エントリの発音が分岐していなければ、最初の一致スロットの発音を返します。
    /// 3. 一致スロットが1つだけならその発音を返します。
    /// 4. 複数あれば、要求された素性との共通部分が最大のスロットを返します。
    ///    同点の場合は先に現れたものが勝ちます。
    ///
    /// 品詞が一致しない場合、注釈がない場合、または共通部分が空の場合は
    /// [`Self::most_frequent()`] にフォールバックするため、結果は常に空でない発音になります。
    ///
    /// # 引数
    ///
    /// * `annotation` - 対象トークンの素性注釈
    ///
    /// # 戻り値
    ///
    /// 選ばれた発音とその根拠
    pub fn disambiguate(&self, annotation: Option<&FeatureAnnotation>) -> Disambiguation<'_> {
        annotation
            .and_then(|ann| self.disambiguate_by_features(ann))
            .unwrap_or_else(|| self.most_frequent())
    }

    fn disambiguate_by_features(&self, ann: &FeatureAnnotation) -> Option<Disambiguation<'_>> {
        let candidates: Vec<&HomographSlot> =
            self.slots.iter().filter(|s| s.pos == ann.pos()).collect();
        let first = candidates.first()?;

        if !self.has_divergent_pronunciations {
            return Some(Disambiguation {
                pronunciation: &first.pronunciation,
                evidence: Evidence::NotHomograph,
            });
        }
        if candidates.len() == 1 {
            return Some(Disambiguation {
                pronunciation: &first.pronunciation,
                evidence: Evidence::Pos(first.pos.clone()),
            });
        }

        let (slot, features) = best_intersection(ann.features(), &candidates)?;
        Some(Disambiguation {
            pronunciation: &slot.pronunciation,
            evidence: Evidence::Features(features),
        })
    }

    /// 注釈を使わずに最も確からしい発音を選びます。
    ///
    /// 優先エントリがあればそれを、スロットが1つだけならそれを、それ以外は
    /// 頻度が最大のスロット（同点なら先に現れたもの）を返します。
    pub fn most_frequent(&self) -> Disambiguation<'_> {
        if let Some(slot) = self.slots.iter().find(|s| s.preferred) {
            return Disambiguation {
                pronunciation: &slot.pronunciation,
                evidence: Evidence::Preferred,
            };
        }
        if let [slot] = self.slots.as_slice() {
            return Disambiguation {
                pronunciation: &slot.pronunciation,
                evidence: Evidence::Singleton,
            };
        }
        let mut best = &self.slots[0];
        for slot in &self.slots[1..] {
            if slot.frequency > best.frequency {
                best = slot;
            }
        }
        Disambiguation {
            pronunciation: &best.pronunciation,
            evidence: Evidence::Frequency,
        }
    }
}

/// 要求された素性との共通部分が最大の候補を返します。
///
/// 共通部分が空の候補は選ばれません。ラベルは要求された素性の順序で返します。
fn best_intersection<'a>(
    target: &[String],
    candidates: &[&'a HomographSlot],
) -> Option<(&'a HomographSlot, Vec<String>)> {
    let mut best: Option<(&'a HomographSlot, Vec<String>)> = None;
    let mut best_score = 0;
    for &slot in candidates {
        let feats: HashSet<&str> = slot.features.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let intersected: Vec<String> = target
            .iter()
            .filter(|f| feats.contains(f.as_str()) && seen.insert(f.as_str()))
            .cloned()
            .collect();
        if intersected.len() > best_score {
            best_score = intersected.len();
            best = Some((slot, intersected));
        }
    }
    best
}
