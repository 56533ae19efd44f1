use std::env;

use docrag_cli::indexing::{run_indexing, IndexOptions};
use docrag_cli::init_tracing;
use docrag_core::config::Config;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e:#}"); e })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let opts = IndexOptions::parse(&args).map_err(|e| { eprintln!("Usage: docrag-indexer [docs_dir] [--skip-vector] [--limit-files N]"); e })?;

    println!("docrag indexer\n==============");
    if opts.skip_vector { println!("Skipping vector indexing (--skip-vector)"); }
    if let Some(limit) = opts.limit_files { println!("Limiting to the first {limit} files"); }

    let summary = run_indexing(&config, &opts)?;
    println!("\nIndexing completed");
    println!("  chunks:          {}", summary.chunks);
    println!("  tantivy docs:    {}", summary.lexical_docs);
    println!("  lancedb vectors: {}", summary.vectors);
    println!("\nTo search, run: docrag query \"<question>\"");
    Ok(())
}
