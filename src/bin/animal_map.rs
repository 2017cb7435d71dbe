//! Generate an animal tracking map from Movebank data.
//!
//! Fetches public tracking records, falling back to the bundled demo
//! dataset when the API is unreachable, and writes `animal_map.html`.

use log::{info, warn};

use migration_map::{
    demo_records, render_map, run_pipeline, write_map, MovebankClient, PipelineConfig, Result,
};

const OUTPUT_FILE: &str = "animal_map.html";

async fn fetch_or_demo() -> Vec<migration_map::RawRecord> {
    let records = match MovebankClient::new() {
        Ok(client) => client.fetch_records().await,
        Err(e) => Err(e),
    };

    match records {
        Ok(records) if !records.is_empty() => records,
        Ok(_) => {
            warn!("Movebank returned no usable records, using demo dataset");
            demo_records()
        }
        Err(e) => {
            warn!("Movebank fetch failed ({}), using demo dataset", e);
            demo_records()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let records = fetch_or_demo().await;
    let config = PipelineConfig::default();

    let result = run_pipeline(records, &config);
    let html = render_map(&result, &config)?;
    write_map(OUTPUT_FILE, &html)?;

    info!(
        "Summary: {} individual animals, {} tracking points",
        result.stats.individual_count, result.stats.valid_records
    );
    info!("Open '{}' in your browser", OUTPUT_FILE);

    Ok(())
}
