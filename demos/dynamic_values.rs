//! Build and inspect Diana values at runtime.
//!
//! Run with: cargo run --example dynamic_values

use diana::{diana, to_value, DianaMap, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Build a value with the macro
    let built = diana!({
        "service": {
            "name": "api",
            "replicas": 3,
            "regions": ["eu", "us"]
        },
        "maintenance": null
    });
    println!("Built: {}\n", built);

    // Compile the same shape from source and compare
    let compiled = to_value(
        "service.name: api\nservice.replicas: 3\nservice.regions: [eu, us]\nmaintenance:",
    )?;
    assert_eq!(built, compiled);
    println!("✓ Macro and compiled source agree");

    // Index, look up and inspect
    println!("service.name     = {}", compiled["service"]["name"]);
    println!("regions[1]       = {}", compiled["service"]["regions"][1]);
    println!("missing key      = {}", compiled["nope"]);
    println!(
        "replicas (i64)   = {:?}",
        compiled.lookup("service.replicas").and_then(Value::as_i64)
    );

    if let Some(service) = compiled["service"].as_object() {
        for (key, value) in service.iter() {
            println!("  {:<10} {}", key, value.type_name());
        }
    }

    // Grow a map by hand
    let mut extra = DianaMap::new();
    extra.insert("owner".to_string(), Value::from("platform"));
    extra.insert("tier".to_string(), Value::from(1));
    println!("\nHand-built: {}", Value::Object(extra));

    Ok(())
}
