//! Batch planning
//!
//! Splits an ordered posting list into consecutive per-message slices.

use contracts::{BatchRange, Posting};

/// One planned outbound message
#[derive(Debug, Clone, Copy)]
pub struct PlannedBatch<'a> {
    /// 1-based inclusive range; None when a single batch covers everything
    pub range: Option<BatchRange>,
    pub postings: &'a [Posting],
}

/// Partition `postings` into batches of at most `limit` items
///
/// `None` (or 0) means unbounded: one batch.
pub fn plan_batches(postings: &[Posting], limit: Option<usize>) -> Vec<PlannedBatch<'_>> {
    if postings.is_empty() {
        return Vec::new();
    }

    let size = limit.filter(|&n| n > 0).unwrap_or(postings.len());
    let multiple = postings.len() > size;

    let mut start = 1;
    postings
        .chunks(size)
        .map(|chunk| {
            let range = BatchRange {
                start,
                end: start + chunk.len() - 1,
            };
            start += chunk.len();
            PlannedBatch {
                range: multiple.then_some(range),
                postings: chunk,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postings(n: usize) -> Vec<Posting> {
        (0..n)
            .map(|i| Posting {
                id: format!("p{i}"),
                title: format!("Job {i}"),
                team: None,
                location: "Remote".into(),
                commitment: None,
                description: String::new(),
                apply_url: String::new(),
                created_at: 0,
            })
            .collect()
    }

    #[test]
    fn test_twenty_three_in_tens() {
        let input = postings(23);
        let batches = plan_batches(&input, Some(10));

        let ranges: Vec<String> = batches
            .iter()
            .map(|b| b.range.unwrap().to_string())
            .collect();
        assert_eq!(ranges, vec!["1-10", "11-20", "21-23"]);
        assert_eq!(batches[2].postings.len(), 3);
        assert_eq!(batches[1].postings[0].id, "p10");
    }

    #[test]
    fn test_single_batch_has_no_range() {
        let input = postings(10);
        let batches = plan_batches(&input, Some(10));
        assert_eq!(batches.len(), 1);
        assert!(batches[0].range.is_none());
    }

    #[test]
    fn test_unbounded() {
        let input = postings(120);
        let batches = plan_batches(&input, None);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].postings.len(), 120);
    }

    #[test]
    fn test_empty() {
        assert!(plan_batches(&[], Some(10)).is_empty());
    }
}
