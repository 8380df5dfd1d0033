//! OpenAPI Specification Generator Binary
//!
//! Prints the NiceBrick OpenAPI document as JSON to stdout.
//!
//! Usage:
//!   cargo run -p nicebrick-api --bin generate-openapi > openapi.json

use nicebrick_api::ApiDoc;

fn main() {
    match ApiDoc::to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI spec: {}", e);
            std::process::exit(1);
        }
    }
}
