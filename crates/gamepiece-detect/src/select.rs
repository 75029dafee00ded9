//! Best-candidate selection per target class.

use gamepiece_core::Detection;

fn first_max_by<F>(candidates: &[Detection], key: F) -> Option<usize>
where
    F: Fn(&Detection) -> i64,
{
    let mut best: Option<(usize, i64)> = None;
    for (i, d) in candidates.iter().enumerate() {
        let k = key(d);
        match best {
            Some((_, bk)) if k <= bk => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the candidate with the tallest bounding box. Ties keep the
/// earliest candidate.
pub fn select_tallest(candidates: &[Detection]) -> Option<usize> {
    first_max_by(candidates, |d| d.bbox.height as i64)
}

/// Index of the candidate with the largest bounding-box area. Ties keep the
/// earliest candidate.
pub fn select_largest_area(candidates: &[Detection]) -> Option<usize> {
    first_max_by(candidates, |d| d.bbox.area())
}
