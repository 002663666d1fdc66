//! Async extraction example (feature = "async").
//!
//! Usage:
//!   cargo run --features=async --example async_extraction -- <input> [output_dir]

use std::error::Error;

use unspool::{ExtractOptions, ExtractionRequest, Extractor};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "animation.webp".to_string());
    let output_dir = std::env::args().nth(2).unwrap_or_else(|| "frames".to_string());

    println!("Unspooling {input} into {output_dir}/ ...");
    let frames = Extractor::new()
        .extract_async(
            ExtractionRequest::new(&input, &output_dir),
            ExtractOptions::new(),
        )
        .await?;

    println!("Extracted {} frame(s):", frames.len());
    for frame in &frames {
        println!("  {}  {} ms", frame.path.display(), frame.duration_ms);
    }

    Ok(())
}
