// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::Instant;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use processor_graph::config::load_pipeline;
use processor_graph::values::Values;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("processor_graph=info,warn")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <pipeline.yaml> <input_text>", args[0]);
        eprintln!("Example: {} configs/text-pipeline.yaml \"hello world\"", args[0]);
        std::process::exit(1);
    }
    let (config_file, input_text) = (&args[1], &args[2]);

    let pipeline = load_pipeline(config_file)
        .with_context(|| format!("failed to build pipeline from {}", config_file))?;

    println!("Configuration: {}", config_file);
    println!("Max Concurrency: {}", pipeline.options().concurrency());
    println!("Failure Strategy: {:?}", pipeline.options().failure_strategy);
    println!("\nDependency graph:");
    print!("{}", pipeline.graph());

    let values = Values::new();
    values.put("text", input_text.to_string())?;
    values.put("input_length", input_text.chars().count() as i64)?;

    let started = Instant::now();
    let outcome = pipeline.run(values.clone()).await;
    let elapsed = started.elapsed();

    println!("\nExecution time: {:?}", elapsed);
    println!("Values:");
    println!("{}", serde_json::to_string_pretty(&values.to_json())?);

    let summary = outcome?;
    println!("\n{} processors executed", summary.executed);
    Ok(())
}
