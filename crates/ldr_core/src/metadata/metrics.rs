//! Metric aggregation and pattern search over the metadata document.

use super::document::MetadataDocument;

/// Median of a sample set; the midpoint average for even counts.
///
/// Returns `None` for an empty set. Callers asserting a minimum treat
/// `None` as a failure, never as a skip.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Median bPSNR across all fields that carry the metric.
pub fn median_bpsnr(doc: &MetadataDocument) -> Option<f64> {
    let values: Vec<f64> = doc
        .fields
        .iter()
        .filter_map(|f| f.vits_metrics.as_ref().and_then(|m| m.b_psnr))
        .collect();
    median(&values)
}

/// Scan fields in document order for one whose VBI data equals the
/// given triple.
pub fn find_vbi_triple(doc: &MetadataDocument, triple: [i64; 3]) -> bool {
    doc.fields
        .iter()
        .filter_map(|f| f.vbi.as_ref().and_then(|v| v.vbi_data.as_deref()))
        .any(|data| data == triple)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn doc(json: &str) -> MetadataDocument {
        MetadataDocument::from_json(json, Path::new("test.tbc.json")).unwrap()
    }

    #[test]
    fn median_odd_count() {
        assert_eq!(median(&[10.0, 20.0, 30.0]), Some(20.0));
        assert_eq!(median(&[30.0, 10.0, 20.0]), Some(20.0));
    }

    #[test]
    fn median_even_count_is_midpoint() {
        assert_eq!(median(&[10.0, 20.0, 30.0, 40.0]), Some(25.0));
    }

    #[test]
    fn median_empty_is_none() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_bpsnr_skips_fields_without_metric() {
        let d = doc(
            r#"{"fields": [
                {"vitsMetrics": {"bPSNR": 10.0}},
                {},
                {"vitsMetrics": {"bPSNR": 20.0}},
                {"vitsMetrics": {}},
                {"vitsMetrics": {"bPSNR": 30.0}}
            ]}"#,
        );
        assert_eq!(median_bpsnr(&d), Some(20.0));
    }

    #[test]
    fn median_bpsnr_none_when_no_field_qualifies() {
        let d = doc(r#"{"fields": [{}, {"vitsMetrics": {}}]}"#);
        assert_eq!(median_bpsnr(&d), None);
    }

    #[test]
    fn vbi_triple_found_in_document_order() {
        let d = doc(
            r#"{"fields": [
                {"vbi": {"vbiData": [1, 2, 3]}},
                {"vbi": {"vbiData": [9, 1, 2]}}
            ]}"#,
        );
        assert!(find_vbi_triple(&d, [9, 1, 2]));
        assert!(!find_vbi_triple(&d, [9, 9, 9]));
    }

    #[test]
    fn vbi_triple_ignores_malformed_lengths() {
        let d = doc(r#"{"fields": [{"vbi": {"vbiData": [9, 1]}}]}"#);
        assert!(!find_vbi_triple(&d, [9, 1, 2]));
    }
}
