use crate::engine::prng::Mulberry32;

/// Fisher-Yates shuffle driven by a seeded [`Mulberry32`]. Returns a new
/// vector; the input slice is left untouched.
pub fn shuffle<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut out = items.to_vec();
    if out.len() <= 1 {
        return out;
    }

    let mut rng = Mulberry32::new(seed);
    for i in (1..out.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64) as usize;
        out.swap(i, j);
    }
    out
}
