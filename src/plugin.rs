use wasm_minimal_protocol::*;

use crate::{search_by_query, SearchOptions, Tuning};

initiate_protocol!();

/// `tuning` is whitespace-separated (`E2 A2 ...`), empty for standard.
/// Returns the results as a JSON array.
#[wasm_func]
fn search(tuning: &[u8], query: &[u8]) -> Result<Vec<u8>, String> {
    let tuning = std::str::from_utf8(tuning).map_err(|e| e.to_string())?;
    let query = std::str::from_utf8(query).map_err(|e| e.to_string())?;

    let options = if tuning.trim().is_empty() {
        SearchOptions::default()
    } else {
        SearchOptions::builder()
            .tuning(tuning.parse::<Tuning>().map_err(|e| e.to_string())?)
            .build()
            .map_err(|e| e.to_string())?
    };
    let results = search_by_query(query, &options).map_err(|e| e.to_string())?;
    serde_json::to_vec(&results).map_err(|e| e.to_string())
}
