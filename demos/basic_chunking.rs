//! Basic Paragraph Chunking
//!
//! The minimal example: fit a document into token-budgeted chunks.
//!
//! ```bash
//! cargo run --example basic_chunking
//! ```

use paraslab::{CharTokenizer, Chunker, ParagraphChunker, TokenBudget};

fn main() -> paraslab::Result<()> {
    let document = "Machine learning models learn patterns from data.\n\
        They generalize these patterns to make predictions.\n\
        \n\
        This is fundamentally different from traditional programming, where humans write \
        explicit rules for every case the program must handle, and where the rules stay \
        exactly as written until someone changes them.\n\
        Deep learning extends this with multiple hidden layers.";

    // One token per character; swap in a HuggingFace tokenizer with the `hf` feature
    let chunker = ParagraphChunker::new(CharTokenizer::new(), TokenBudget::new(120)?);
    let chunked = chunker.chunk(document)?;

    println!("Document: {} chars", document.len());
    println!(
        "Chunks: {} (budget {}, realized total {})\n",
        chunked.chunk_count(),
        chunked.max_tokens,
        chunked.total_tokens()
    );

    for slab in &chunked {
        let kind = if slab.is_window() { "window" } else { "paragraphs" };
        println!("[{}] {} tokens, {kind}: {:?}", slab.index, slab.tokens, slab.text);
    }

    // The long paragraph did not fit on its own, so it was cut into windows;
    // the short ones were packed together.
    Ok(())
}
