//! Segment splitting by maximum length

/// Split `[start_md, end_md]` into equal, contiguous pieces no longer than
/// `max_segment_length`.
///
/// The piece count is `trunc(length / max) + 1`, so an interval that is an
/// exact multiple of the maximum still gets one extra piece, and a
/// zero-length interval yields a single zero-length piece. The last piece
/// ends exactly at `end_md`.
pub fn split_interval(start_md: f64, end_md: f64, max_segment_length: f64) -> Vec<(f64, f64)> {
    let length = end_md - start_md;
    let count = if max_segment_length > 0.0 && max_segment_length.is_finite() {
        (length / max_segment_length).trunc().max(0.0) as usize + 1
    } else {
        1
    };

    let piece = length / count as f64;
    (0..count)
        .map(|i| {
            let start = start_md + piece * i as f64;
            let end = if i + 1 == count { end_md } else { start_md + piece * (i + 1) as f64 };
            (start, end)
        })
        .collect()
}
