use tracing::{info, warn};

use crate::chunks::chunks;
use crate::es::{EsError, ProfileHit};
use crate::stats::FreqDistribution;

/// Runs the chunked query/aggregation pass over the full id list.
///
/// Chunks are processed strictly in order, one blocking fetch at a time; the
/// first fetch error aborts the fold and no partial distribution escapes.
/// `fetch` is the per-chunk lookup against the search backend (injected so
/// the stage wiring is testable with synthetic results).
pub fn collect_stats<F>(
    mut fetch: F,
    ids: &[u64],
    chunk_size: usize,
) -> Result<FreqDistribution, EsError>
where
    F: FnMut(&[u64]) -> Result<Vec<ProfileHit>, EsError>,
{
    let mut dist = FreqDistribution::new();
    let mut submitted = 0usize;

    for chunk in chunks(ids, chunk_size) {
        submitted += chunk.len();
        info!(
            action = "query",
            component = "pipeline",
            submitted,
            total = ids.len(),
            "Querying next chunk"
        );

        let hits = fetch(chunk)?;
        let skipped = dist.absorb(&hits);
        if skipped > 0 {
            warn!(
                action = "aggregate",
                component = "pipeline",
                skipped,
                hit_count = hits.len(),
                "Skipped records without social profile data in chunk"
            );
        }
    }

    Ok(dist)
}
