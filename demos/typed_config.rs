//! Read a Diana document straight into Rust structs.
//!
//! Run with: cargo run --example typed_config

use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct Server {
    host: String,
    port: u16,
    #[serde(default)]
    tls: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Level {
    Debug,
    Info,
    Warn,
}

#[derive(Debug, Deserialize)]
struct Logging {
    level: Level,
    outputs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Worker {
    name: String,
    threads: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Config {
    server: Server,
    logging: Logging,
    workers: Vec<Worker>,
}

const CONFIG: &str = r#"
server:
  host: "0.0.0.0"
  port: 8_080

logging.level: "info"
logging.outputs: [console, file]

workers:
  * name: "ingest"
    threads: 4
  * name: "janitor"
"#;

fn main() -> Result<(), Box<dyn Error>> {
    let config: Config = diana::from_str(CONFIG)?;
    println!("{:#?}", config);

    println!(
        "listening on {}:{}, logging to {}",
        config.server.host,
        config.server.port,
        config.logging.outputs.join(", ")
    );
    for worker in &config.workers {
        println!("  worker {} ({:?} threads)", worker.name, worker.threads);
    }

    assert_eq!(config.server.port, 8080);
    assert!(!config.server.tls);
    assert!(matches!(config.logging.level, Level::Info));
    assert_eq!(config.workers[1].threads, None);
    println!("✓ Typed config loaded");

    // Errors carry the line and column of the offending token
    match diana::from_str::<Config>("server: { host: \"x\" ]") {
        Ok(_) => println!("unexpectedly parsed"),
        Err(e) => println!("Error: {}", e),
    }

    Ok(())
}
