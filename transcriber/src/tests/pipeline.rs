use hashbrown::HashMap;

use crate::dictionary::*;
use crate::errors::{CollaboratorError, Result};
use crate::tagger::PosTagger;
use crate::trace::TraceTag;
use crate::transcriber::{Transcriber, WordSource};
use crate::utils::hashmap;

const LEXICON: &str = include_str!("./resources/lexicon.txt");
const USER: &str = include_str!("./resources/user.txt");
const YO: &str = include_str!("./resources/yo.txt");
const HOMOGRAPHS: &str = include_str!("./resources/homographs.txt");

/// 単語ごとに固定の注釈を返すタガー
struct MapTagger(HashMap<&'static str, &'static str>);

impl PosTagger for MapTagger {
    fn annotate(&self, tokens: &[&str]) -> Result<Vec<Option<FeatureAnnotation>>> {
        tokens
            .iter()
            .map(|t| {
                self.0
                    .get(*t)
                    .map(|s| s.parse::<FeatureAnnotation>())
                    .transpose()
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

fn dictionary() -> Dictionary {
    Dictionary::new()
        .with_user_lexicon(Lexicon::from_reader(USER.as_bytes()).unwrap().0)
        .with_lexicon(Lexicon::from_reader(LEXICON.as_bytes()).unwrap().0)
        .with_yo_lexicon(Lexicon::from_reader(YO.as_bytes()).unwrap().0)
        .with_homographs(
            HomographTable::from_reader(HOMOGRAPHS.as_bytes(), LoadMode::Strict)
                .unwrap()
                .0,
        )
}

fn echo(line: &str) -> Result<Option<String>, CollaboratorError> {
    Ok(Some(line.to_string()))
}

fn no_prediction(_: &str) -> Result<Option<String>, CollaboratorError> {
    Ok(None)
}

/// 注釈による同形異音語の曖昧性解消と品詞接頭辞のテスト
#[test]
fn test_annotated_homographs() {
    let tagger = MapTagger(hashmap! {
        "замок" => "nn/sg/acc",
        "стоит" => "vrb/pst/pl",
    });
    let transcriber = Transcriber::new(dictionary()).tagger(tagger);
    let mut worker = transcriber.new_worker();
    let mut trace: Vec<(TraceTag, String)> = vec![];

    worker.reset_sentence("Замок стоит.");
    let result = worker
        .transcribe(&mut no_prediction, &mut echo, &mut trace)
        .unwrap();
    assert_eq!(result, "зам+ок VERBсто+ит");

    let disa: Vec<&str> = trace
        .iter()
        .filter(|(t, _)| *t == TraceTag::Disambiguation)
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(disa, vec!["sg/acc", "pst/pl"]);

    let posp: Vec<&str> = trace
        .iter()
        .filter(|(t, _)| *t == TraceTag::PosPrediction)
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(posp, vec!["nn/sg/acc", "vrb/pst/pl"]);
}

/// 注釈がない場合は優先エントリが選ばれる
#[test]
fn test_unannotated_homograph_prefers_lex1() {
    let transcriber = Transcriber::new(dictionary());
    let r = transcriber.resolve("замок", None, &mut no_prediction);
    assert_eq!(r.source, WordSource::Homograph);
    assert_eq!(r.stress, "з+амок");
    assert_eq!(r.evidence, Some(Evidence::Preferred));

    let r = transcriber.resolve("мука", None, &mut no_prediction);
    assert_eq!(r.stress, "мук+а");
    assert_eq!(r.evidence, Some(Evidence::Frequency));
}

/// 発音が分岐していないエントリは SINGLETON として記録される
#[test]
fn test_non_divergent_homograph() {
    let tagger = MapTagger(hashmap! { "кот" => "nn/sg/acc" });
    let transcriber = Transcriber::new(dictionary()).tagger(tagger);
    let mut worker = transcriber.new_worker();
    let mut trace: Vec<(TraceTag, String)> = vec![];

    worker.reset_sentence("кот");
    let result = worker
        .transcribe(&mut no_prediction, &mut echo, &mut trace)
        .unwrap();
    assert_eq!(result, "к+от");
    assert!(trace.contains(&(TraceTag::Disambiguation, "SINGLETON".to_string())));
}

/// ユーザー辞書はほかのすべての辞書より優先される
#[test]
fn test_user_lexicon_overrides() {
    let transcriber = Transcriber::new(dictionary());
    let mut worker = transcriber.new_worker();
    worker.reset_sentence("Папа, мама");
    let result = worker
        .transcribe(&mut no_prediction, &mut echo, &mut crate::trace::NullTrace)
        .unwrap();
    assert_eq!(result, "п+апа-п+апа SIL м+ама");
    assert_eq!(worker.resolutions()[0].source, WordSource::UserLexicon);
}

/// ё の復元と強勢予測のテスト
#[test]
fn test_yo_restoration_and_prediction() {
    let transcriber = Transcriber::new(dictionary());
    let mut worker = transcriber.new_worker();
    let mut trace: Vec<(TraceTag, String)> = vec![];
    let mut predictor = |word: &str| -> Result<Option<String>, CollaboratorError> {
        Ok(Some(word.chars().flat_map(|c| [c, ' ']).collect()))
    };

    worker.reset_sentence("Елка и еж");
    let result = worker
        .transcribe(&mut predictor, &mut echo, &mut trace)
        .unwrap();
    assert_eq!(worker.tokens(), &["ёлка", "и", "ёж"]);
    assert_eq!(result, "+ёлка +и ё ж");

    let yowr: Vec<&str> = trace
        .iter()
        .filter(|(t, _)| *t == TraceTag::YoRestoration)
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(yowr, vec!["ёлка", "ёж"]);
}
