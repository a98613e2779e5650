use super::*;

/// Open tile in the middle of the lab ring.
pub const LAB_CENTER: (i8, i8) = (-4, 4);

/// Ten reagent labs in the south-west quadrant: a ring of eight around
/// `LAB_CENTER` plus two outriders toward the hub.
///
/// ```text
///      x: -5 -4 -3 -2
/// y: 2        L
/// y: 3     L  S  S
/// y: 4     L  .  L  L
/// y: 5     L  L  L
/// ```
///
/// The first two labs (S) are the reagent sources; every other lab is within
/// range 2 of both.
pub fn lab_stamp() -> Stamp {
    Stamp::new(
        StructureType::ReagentLab,
        &[
            (-3, 3),
            (-4, 3),
            (-3, 4),
            (-4, 2),
            (-2, 4),
            (-5, 3),
            (-5, 4),
            (-5, 5),
            (-4, 5),
            (-3, 5),
        ],
    )
}

/// Every lab after the first two must be within range 2 of both sources.
pub fn validate_lab_stamp(stamp: &Stamp) -> bool {
    let [source1, source2] = match stamp.offsets.get(..2) {
        Some(&[a, b]) => [a, b],
        _ => return false,
    };
    let range = |a: (i8, i8), b: (i8, i8)| (a.0 - b.0).abs().max((a.1 - b.1).abs());

    stamp.offsets[2..]
        .iter()
        .all(|&lab| range(lab, source1) <= 2 && range(lab, source2) <= 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_labs_reach_both_sources() {
        let stamp = lab_stamp();
        assert_eq!(stamp.offsets.len(), 10);
        assert!(validate_lab_stamp(&stamp));
        assert!(!stamp.offsets.contains(&LAB_CENTER));
    }
}
