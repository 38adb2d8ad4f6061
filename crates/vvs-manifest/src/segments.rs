//! Segment-group construction and the categorical color palette.

use std::collections::BTreeMap;

use crate::model::{SegmentMask, Segments};

/// Colors are assigned round-robin by a segment's position in the explicit
/// order, not by its value.
pub const SEGMENT_COLORS: [[u8; 4]; 12] = [
    [255, 0, 0, 255],     // red
    [0, 255, 0, 255],     // green
    [0, 0, 255, 255],     // blue
    [255, 255, 0, 255],   // yellow
    [255, 0, 255, 255],   // magenta
    [0, 255, 255, 255],   // cyan
    [255, 128, 0, 255],   // orange
    [128, 0, 255, 255],   // purple
    [0, 255, 128, 255],   // spring green
    [255, 128, 128, 255], // light red
    [128, 255, 128, 255], // light green
    [128, 128, 255, 255], // light blue
];

/// Build the segment table from `(value, name)` pairs in caller order.
///
/// A repeated value keeps its first position and takes the latest name.
pub fn build_segments(label_names: &[(u32, String)]) -> Segments {
    let mut order = Vec::with_capacity(label_names.len());
    let mut by_value: BTreeMap<u32, SegmentMask> = BTreeMap::new();

    for (value, name) in label_names {
        if let Some(existing) = by_value.get_mut(value) {
            existing.name = name.clone();
            continue;
        }
        let color = SEGMENT_COLORS[order.len() % SEGMENT_COLORS.len()];
        order.push(*value);
        by_value.insert(
            *value,
            SegmentMask {
                value: *value,
                name: name.clone(),
                color,
                visible: true,
            },
        );
    }

    Segments { order, by_value }
}

/// Opaque unique token for a segment group.
pub fn new_segment_group_id() -> String {
    ulid::Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pairs: &[(u32, &str)]) -> Vec<(u32, String)> {
        pairs.iter().map(|(v, n)| (*v, n.to_string())).collect()
    }

    #[test]
    fn test_colors_follow_position_not_value() {
        let forward = build_segments(&names(&[(1, "liver"), (2, "spleen")]));
        let reversed = build_segments(&names(&[(2, "spleen"), (1, "liver")]));

        assert_eq!(forward.order, vec![1, 2]);
        assert_eq!(reversed.order, vec![2, 1]);
        assert_eq!(forward.by_value[&1].color, SEGMENT_COLORS[0]);
        assert_eq!(reversed.by_value[&1].color, SEGMENT_COLORS[1]);
        assert_ne!(forward.by_value[&1].color, reversed.by_value[&1].color);
    }

    #[test]
    fn test_palette_wraps_round_robin() {
        let pairs: Vec<(u32, String)> = (1..=14).map(|v| (v * 10, format!("s{v}"))).collect();
        let segments = build_segments(&pairs);
        assert_eq!(segments.by_value[&130].color, SEGMENT_COLORS[0]);
        assert_eq!(segments.by_value[&140].color, SEGMENT_COLORS[1]);
        assert!(segments.by_value.values().all(|s| s.visible));
    }

    #[test]
    fn test_repeated_value_keeps_position_takes_last_name() {
        let segments = build_segments(&names(&[(3, "kidney"), (4, "aorta"), (3, "kidney_left")]));
        assert_eq!(segments.order, vec![3, 4]);
        assert_eq!(segments.by_value[&3].name, "kidney_left");
        assert_eq!(segments.by_value[&3].color, SEGMENT_COLORS[0]);
    }

    #[test]
    fn test_segment_group_ids_are_unique() {
        let a = new_segment_group_id();
        let b = new_segment_group_id();
        assert_eq!(a.len(), 26);
        assert_ne!(a, b);
    }
}
