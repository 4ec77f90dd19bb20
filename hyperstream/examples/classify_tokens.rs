//! Tiny token classifier: learn one prototype per topic from bundled token
//! vectors, then classify unseen sentences by nearest neighbour.
//!
//! Run with: `cargo run -p hyperstream --example classify_tokens`

use hyperstream::encoding::ItemMemory;
use hyperstream::memory::PrototypeMemory;
use hyperstream::ops::normalized_hamming_similarity;
use hyperstream::{BinaryBundler, BinaryHv};

const DIM: usize = 10_000;

fn sentence_vector(items: &ItemMemory, sentence: &str) -> BinaryHv {
    let mut bundler = BinaryBundler::new(DIM);
    let mut token_hv = BinaryHv::new(DIM);
    for token in sentence.split_whitespace() {
        items.encode_token(token, &mut token_hv);
        bundler.accumulate(&token_hv);
    }
    let mut out = BinaryHv::new(DIM);
    bundler.finalize(&mut out);
    out
}

fn main() {
    let items = ItemMemory::new(DIM, 0x1234_5678_9abc_def0);
    let mut memory = PrototypeMemory::new(DIM, 16);

    let topics: &[(u64, &str, &str)] = &[
        (1, "weather", "rain sun cloud wind storm snow forecast"),
        (2, "cooking", "pan oven recipe salt flour butter simmer"),
        (3, "sailing", "mast sail anchor harbor tide knot rudder"),
    ];

    for &(label, _, corpus) in topics {
        let hv = sentence_vector(&items, corpus);
        memory.learn(label, &hv).expect("capacity");
    }

    let queries = [
        "the forecast says storm and rain",
        "add butter and flour to the pan",
        "drop the anchor near the harbor",
    ];

    for query in queries {
        let hv = sentence_vector(&items, query);
        let label = memory.classify(&hv, 0);
        let name = topics
            .iter()
            .find(|t| t.0 == label)
            .map(|t| t.1)
            .unwrap_or("?");
        let sim = memory
            .entries()
            .iter()
            .find(|e| e.label == label)
            .map(|e| normalized_hamming_similarity(&hv, &e.hv))
            .unwrap_or(0.0);
        println!("{:<40} -> {} (similarity {:+.3})", query, name, sim);
    }
}
