//! Extract every frame of an animated image to an output directory.
//!
//! Usage:
//!   cargo run --example extract_frames -- <input> [output_dir]

use std::error::Error;

use unspool::{ExtractionRequest, Extractor};

fn main() -> Result<(), Box<dyn Error>> {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "animation.webp".to_string());
    let output_dir = std::env::args().nth(2).unwrap_or_else(|| "frames".to_string());

    println!("Unspooling {input} into {output_dir}/ ...");
    let frames = Extractor::new().extract(&ExtractionRequest::new(&input, &output_dir))?;

    for frame in &frames {
        println!(
            "{}  {} ms  {}x{}",
            frame.path.display(),
            frame.duration_ms,
            frame.width,
            frame.height,
        );
    }
    println!("Extracted {} frame(s)", frames.len());

    Ok(())
}
