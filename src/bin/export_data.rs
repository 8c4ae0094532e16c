//! Export every store as one JSON document
//! Usage: cargo run --bin export_data -- [output.json]

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use calorie_tracker::config;
use calorie_tracker::tools::data;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("calorie_tracker=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let output = std::env::args().nth(1);

    let database = config::open_database()?;
    let now = Utc::now();
    let json = data::export_json(&database, now)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json)?;
            eprintln!("Export written to {}", path);
        }
        None => {
            let default_name = format!("calorie-tracker-export-{}.json", now.format("%Y-%m-%d"));
            eprintln!("No output path given; printing to stdout (suggested file: {})", default_name);
            println!("{}", json);
        }
    }

    Ok(())
}
