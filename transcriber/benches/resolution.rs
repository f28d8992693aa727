//! 正規化と発音解決のベンチマーク
//!
//! 小さな辞書とコーパスを用いて、外部プロセスを使わずに
//! 正規化と行単位の発音解決の速度を計測します。

use std::sync::Arc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ru_transcriber::dictionary::{Dictionary, HomographTable, LoadMode, Lexicon};
use ru_transcriber::errors::CollaboratorError;
use ru_transcriber::sentence::normalize;
use ru_transcriber::trace::NullTrace;
use ru_transcriber::Transcriber;

const CORPUS: &str = include_str!("./resources/corpus.txt");
const LEXICON: &str = include_str!("./resources/lexicon.txt");
const HOMOGRAPHS: &str = include_str!("./resources/homographs.txt");
const YO: &str = include_str!("./resources/yo.txt");

fn echo(line: &str) -> Result<Option<String>, CollaboratorError> {
    Ok(Some(line.to_string()))
}

fn load_dictionary() -> Dictionary {
    let (lexicon, _) = Lexicon::from_reader(LEXICON.as_bytes()).unwrap();
    let (yo, _) = Lexicon::from_reader(YO.as_bytes()).unwrap();
    let (homographs, _) =
        HomographTable::from_reader(HOMOGRAPHS.as_bytes(), LoadMode::Lenient).unwrap();
    Dictionary::new()
        .with_lexicon(lexicon)
        .with_yo_lexicon(yo)
        .with_homographs(homographs)
}

fn bench_resolution(c: &mut Criterion) {
    let dict = Arc::new(load_dictionary());
    let lines: Vec<&str> = CORPUS.lines().filter(|l| !l.starts_with('#')).collect();
    let total_bytes: usize = lines.iter().map(|l| l.len()).sum();

    let mut group = c.benchmark_group("Resolution Speed");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function(BenchmarkId::new("Normalize", "Corpus"), |b| {
        b.iter(|| {
            for line in &lines {
                std::hint::black_box(normalize(line, dict.yo_lexicon()));
            }
        });
    });

    group.bench_function(BenchmarkId::new("Transcribe", "Corpus"), |b| {
        b.iter_with_setup(
            || Transcriber::from_shared_dictionary(dict.clone()).new_worker(),
            |mut worker| {
                for line in &lines {
                    worker.reset_sentence(line);
                    let result = worker
                        .transcribe(&mut echo, &mut echo, &mut NullTrace)
                        .unwrap();
                    std::hint::black_box(result);
                }
            },
        );
    });

    group.finish();
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
