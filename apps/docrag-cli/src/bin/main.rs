use std::env;

use docrag_cli::{build_engine, generator, init_tracing, print_results, QueryArgs};
use docrag_core::config::Config;
use docrag_generate::answer;

const USAGE: &str = "Usage: docrag <query|ask> \"<question>\" [--top-k N] [--alpha A] [--pool-size P] [--no-rerank] [--json] [--temperature T] [--max-tokens M]";

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    let parsed = QueryArgs::parse(&args).map_err(|e| { eprintln!("{USAGE}"); e })?;
    if parsed.query.trim().is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e:#}"); e })?;
    let engine = build_engine(&config, parsed.retrieval_settings(config.retrieval()?))?;
    let request = parsed.request(&engine);

    match cmd.as_str() {
        "query" => {
            let results = engine.retrieve(&request)?;
            if parsed.json { println!("{}", serde_json::to_string_pretty(&results)?); } else {
                println!("Query: {}", request.query);
                print_results(&results);
            }
        }
        "ask" => {
            let settings = config.generation()?;
            let generator = generator(&config, &settings);
            let out = answer(&engine, &generator, &request, &parsed.generation_params(&settings))?;
            if parsed.json { println!("{}", serde_json::to_string_pretty(&out)?); } else {
                println!("{}\n\nContexts:", out.text);
                print_results(&out.contexts);
            }
        }
        other => { eprintln!("Unknown command: {other}\n{USAGE}"); std::process::exit(1); }
    }
    Ok(())
}
