//! Lightweight tokenize/rewrite benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p chatmark_core --example pipeline_benchmark --release`

use std::time::Instant;

use chatmark_core::grammar::lexer::tokenize;
use chatmark_core::{
    CustomEmojiSnapshot, ImageHandle, MarkupVocabulary, NativeEmojiTable, flatten, format, rewrite,
};

fn run_benchmark(
    label: &str,
    input: &str,
    vocab: &MarkupVocabulary,
    native: &NativeEmojiTable,
    custom: &CustomEmojiSnapshot,
    iterations: usize,
) {
    let tokenize_start = Instant::now();
    for _ in 0..iterations {
        let _ = tokenize(input, vocab);
    }
    let tokenize_elapsed = tokenize_start.elapsed();

    let rewrite_start = Instant::now();
    for _ in 0..iterations {
        let mut tokens = tokenize(input, vocab);
        let _ = rewrite(&mut tokens, vocab, native, custom);
        let _ = flatten(&tokens);
    }
    let rewrite_elapsed = rewrite_start.elapsed();

    let once = format(input, vocab, native, custom);

    println!("benchmark={label}");
    println!("  input_chars={}", input.chars().count());
    println!("  output_bytes={}", once.text.len());
    println!("  custom_emojis={}", once.images.len());
    println!("  iterations={iterations}");
    println!(
        "  tokenize_total_ms={:.3} avg_us={:.3}",
        tokenize_elapsed.as_secs_f64() * 1000.0,
        tokenize_elapsed.as_secs_f64() * 1_000_000.0 / iterations as f64
    );
    println!(
        "  format_total_ms={:.3} avg_us={:.3}",
        rewrite_elapsed.as_secs_f64() * 1000.0,
        rewrite_elapsed.as_secs_f64() * 1_000_000.0 / iterations as f64
    );
}

fn chat_line(i: usize) -> String {
    format!(
        "**msg {i}** _hey_ :smile: check https://example.com/p/{i} and :party: `code {i}` "
    )
}

fn main() {
    let vocab = MarkupVocabulary::default();
    let native = NativeEmojiTable::load_or_empty(None);
    let custom: CustomEmojiSnapshot = [("party", ImageHandle::from(vec![0u8; 256]))]
        .into_iter()
        .collect();

    let short = chat_line(0);
    run_benchmark("short_message", &short, &vocab, &native, &custom, 20_000);

    let long: String = (0..200).map(chat_line).collect();
    run_benchmark("long_message", &long, &vocab, &native, &custom, 200);

    let pathological = "*".repeat(2_000);
    run_benchmark("many_flags", &pathological, &vocab, &native, &custom, 20);
}
