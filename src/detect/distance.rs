//! Bond geometry along a chromosome

/// Euclidean distance between two points.
pub fn euclidean(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Distance from each bead to the next one.
///
/// The output has one entry per bead; the last bead has no successor and
/// gets 0.0.
pub fn bond_distances(coords: &[[f64; 3]]) -> Vec<f64> {
    let mut distances: Vec<f64> = coords
        .windows(2)
        .map(|pair| euclidean(pair[0], pair[1]))
        .collect();
    if !coords.is_empty() {
        distances.push(0.0);
    }
    distances
}

/// Median of the finite values, averaging the two middle values for even counts.
///
/// Returns `None` when no finite value is present.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }

    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        Some((finite[mid - 1] + finite[mid]) / 2.0)
    } else {
        Some(finite[mid])
    }
}
