//! Compile a Diana document and print it as JSON.
//!
//! Run with: RUST_LOG=debug cargo run --example simple

use std::error::Error;

const CONFIG: &str = r#"
; Service settings
name: "Diana"
active: true
count: 42

db: { host: "localhost", port: 5432 }

app.name: "X"
app.debug: true

items:
  * "a"
  * "b"
"#;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let value = diana::to_value(CONFIG)?;

    println!("Diana input:\n{}", CONFIG);
    println!("JSON output:\n{}\n", serde_json::to_string_pretty(&value)?);

    // A value prints back as a single-line Diana literal
    println!("Diana literal:\n{}", value);

    Ok(())
}
