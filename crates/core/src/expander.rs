//! Expansion of ambiguous attributes into separate records.
//!
//! The record schema only holds one value per field, so an attribute marked
//! both `Yes` and `No` is stored as two records, one per value. With `k`
//! such attributes a submission produces every one of the `2^k` combinations.

use serde_json::Value;

use crate::answer::Answer;
use crate::types::Record;

/// Produce every record implied by the conflicting attributes.
///
/// Each output record is `base` plus exactly one value (`"Yes"` or `"No"`)
/// for every name in `conflicting`. Earlier names vary slowest and `Yes`
/// comes before `No`, so the output reads like a binary counter.
///
/// With no conflicting attributes the result is a single copy of `base`.
/// `base` is never modified. Names in `conflicting` are expected not to be
/// fields of `base` already.
///
/// ```
/// use describer_core::expander::expand_documents;
/// use describer_core::types::Record;
///
/// let mut base = Record::new();
/// base.insert("id".into(), "P7".into());
///
/// let records = expand_documents(&base, &["HasScar".to_string()]);
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0]["HasScar"], "Yes");
/// assert_eq!(records[1]["HasScar"], "No");
/// ```
pub fn expand_documents(base: &Record, conflicting: &[String]) -> Vec<Record> {
    let mut records = vec![base.clone()];

    for name in conflicting {
        records = records
            .into_iter()
            .flat_map(|record| {
                Answer::ALL.into_iter().map(move |answer| {
                    let mut branch = record.clone();
                    branch.insert(name.clone(), Value::String(answer.as_str().to_string()));
                    branch
                })
            })
            .collect();
    }

    records
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_conflicts_returns_copy_of_base() {
        let base = record(json!({ "id": "P7" }));
        let out = expand_documents(&base, &[]);
        assert_eq!(out, vec![record(json!({ "id": "P7" }))]);
    }

    #[test]
    fn single_conflict_yields_yes_then_no() {
        let base = record(json!({ "id": "P7" }));
        let out = expand_documents(&base, &names(&["HasScar"]));
        assert_eq!(
            out,
            vec![
                record(json!({ "id": "P7", "HasScar": "Yes" })),
                record(json!({ "id": "P7", "HasScar": "No" })),
            ]
        );
    }

    #[test]
    fn two_conflicts_cover_all_pairs_in_counter_order() {
        let base = record(json!({ "id": "P7" }));
        let out = expand_documents(&base, &names(&["HasScar", "WearsGlasses"]));
        assert_eq!(
            out,
            vec![
                record(json!({ "id": "P7", "HasScar": "Yes", "WearsGlasses": "Yes" })),
                record(json!({ "id": "P7", "HasScar": "Yes", "WearsGlasses": "No" })),
                record(json!({ "id": "P7", "HasScar": "No", "WearsGlasses": "Yes" })),
                record(json!({ "id": "P7", "HasScar": "No", "WearsGlasses": "No" })),
            ]
        );

        let scar_yes_glasses_no = out
            .iter()
            .filter(|r| r["HasScar"] == "Yes" && r["WearsGlasses"] == "No")
            .count();
        assert_eq!(scar_yes_glasses_no, 1);
    }

    #[test]
    fn output_size_is_power_of_two() {
        let base = record(json!({ "id": "P1", "Blond hair?": "Yes" }));
        let all = names(&["a", "b", "c", "d", "e", "f"]);
        for k in 0..=all.len() {
            let out = expand_documents(&base, &all[..k]);
            assert_eq!(out.len(), 1 << k, "k = {k}");
        }
    }

    #[test]
    fn every_record_is_complete_and_distinct() {
        let base = record(json!({ "id": "P1", "Face mark?": "No" }));
        let conflicting = names(&["a", "b", "c", "d"]);
        let out = expand_documents(&base, &conflicting);

        let mut seen = HashSet::new();
        for r in &out {
            assert_eq!(r["id"], "P1");
            assert_eq!(r["Face mark?"], "No");
            assert_eq!(r.len(), base.len() + conflicting.len());
            for name in &conflicting {
                assert!(r[name] == "Yes" || r[name] == "No");
            }
            assert!(seen.insert(serde_json::to_string(r).unwrap()), "duplicate record {r:?}");
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn base_is_unchanged() {
        let base = record(json!({ "id": "P7", "Pointy chin?": "Yes" }));
        let before = base.clone();
        let _ = expand_documents(&base, &names(&["HasScar", "WearsGlasses", "Tattoo"]));
        assert_eq!(base, before);
    }
}
