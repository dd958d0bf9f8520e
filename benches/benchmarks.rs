use criterion::{black_box, criterion_group, criterion_main, Criterion};

use seqidx_rust::index::builder::{BuildMethod, SuffixTrayBuilder};
use seqidx_rust::index::bwt::BwtIndex;
use seqidx_rust::index::lcp;
use seqidx_rust::index::qgram::{QGramCoder, QGramIndex};
use seqidx_rust::util::alphabet::Alphabet;

fn make_text(len: usize) -> Vec<i8> {
    let mut text = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len - 1 {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        text.push(((x >> 16) % 4) as i8);
    }
    text.push(-1);
    text
}

fn bench_construction_methods(c: &mut Criterion) {
    let alphabet = Alphabet::dna();
    let text = make_text(10_000);
    let mut group = c.benchmark_group("suffix_construction_10k");
    for method in BuildMethod::ALL {
        group.bench_function(method.as_str(), |b| {
            b.iter(|| {
                let mut builder = SuffixTrayBuilder::new(black_box(&text), &alphabet);
                black_box(builder.build(method));
            })
        });
    }
    group.finish();
}

fn bench_lcp(c: &mut Criterion) {
    let alphabet = Alphabet::dna();
    let text = make_text(10_000);
    let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
    let tray = builder.build(BuildMethod::MinLR);
    let dll = match tray {
        seqidx_rust::index::builder::SuffixTray::Explicit(dll) => dll,
        seqidx_rust::index::builder::SuffixTray::Xor(_) => unreachable!(),
    };

    c.bench_function("lcp_kasai_10k", |b| {
        b.iter(|| {
            black_box(lcp::compute(black_box(&text), &alphabet, &dll));
        })
    });
}

fn bench_backward_search(c: &mut Criterion) {
    let alphabet = Alphabet::dna();
    let text = make_text(10_000);
    let mut builder = SuffixTrayBuilder::new(&text, &alphabet);
    let mut tray = builder.build(BuildMethod::BothLR);
    let index = BwtIndex::from_list(tray.as_list_mut(), &text);
    let query: Vec<i8> = text[100..120].to_vec();

    c.bench_function("backward_search_20bp", |b| {
        b.iter(|| {
            black_box(index.find(black_box(&query)));
        })
    });
}

fn bench_qgram_index(c: &mut Criterion) {
    let alphabet = Alphabet::dna();
    let text = make_text(10_000);
    let coder = QGramCoder::new(11, alphabet.asize()).unwrap();

    c.bench_function("qgram_index_10k_q11", |b| {
        b.iter(|| {
            black_box(QGramIndex::build(&coder, black_box(&text)));
        })
    });
}

criterion_group!(
    benches,
    bench_construction_methods,
    bench_lcp,
    bench_backward_search,
    bench_qgram_index
);
criterion_main!(benches);
