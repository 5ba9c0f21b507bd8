//! Hash command implementation.

use crate::output;
use serde_json::json;
use taskmark_canonical::{
    compute_intent_hash, verify_intent_hash, Canonicalizer, DigestAlg, INTENT_HASH_SCOPE,
};

use super::open_task;

pub fn run(task: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let task_dir = open_task(&task)?;
    let canonicalizer = Canonicalizer::default();

    let document = task_dir
        .read_document(&canonicalizer)
        .map_err(|e| format!("Failed to load task: {}", e))?;
    if let Some(declared) = document.parsed().field_text("intent_hash_algo") {
        if let Err(e) = declared.parse::<DigestAlg>() {
            tracing::warn!(error = %e, "declared algorithm ignored");
        }
    }

    let digest = compute_intent_hash(document.text(), &canonicalizer)?;
    let matches = verify_intent_hash(document.text(), &canonicalizer)?;
    let stored = document.stored_hash();
    let well_formed = stored.well_formed_digest().map(|check| check.is_ok());

    if json {
        let value = json!({
            "task_dir": task_dir.path().display().to_string(),
            "algo": digest.alg,
            "scope": INTENT_HASH_SCOPE,
            "digest": digest.hex,
            "stored": stored,
            "stored_well_formed": well_formed,
            "matches": matches,
        });
        println!("{}", output::format_json(&value));
    } else {
        println!("{}", digest.hex);
    }

    Ok(())
}
