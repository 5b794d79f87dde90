use crate::config::EPS;
use crate::scheme::Scheme;

/// Validates a complete scheme:
/// 1. The assigned pieces are exactly the requested multiset
/// 2. Every assignment fits its stock length, kerf between pieces included
/// 3. Every key has as many assignments as units, and at least one
pub(crate) fn assert_scheme_valid(scheme: &Scheme, pieces: &[f64]) {
    let mut expected = pieces.to_vec();
    let mut assigned = scheme.pieces();
    expected.sort_by(f64::total_cmp);
    assigned.sort_by(f64::total_cmp);
    assert_eq!(assigned, expected, "assigned pieces differ from requested pieces");

    for (key, cuts) in scheme.entries() {
        assert!(!cuts.is_empty(), "key {key} has no assignments");
        assert_eq!(cuts.len(), key.count, "key {key} has {} assignments", cuts.len());
        for cut in cuts {
            let used = cut.span(scheme.kerf());
            assert!(
                used <= key.length + EPS,
                "assignment {cut} uses {used} of stock {key}"
            );
        }
    }

    let waste = scheme.waste();
    assert!(
        (0.0..=100.0).contains(&waste.percent),
        "waste percent {} out of range",
        waste.percent
    );
}
