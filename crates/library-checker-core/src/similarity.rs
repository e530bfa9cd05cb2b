/// Containment similarity between two names, in `[0, 1]`.
///
/// Case-insensitive. If neither name contains the other the score is 0;
/// otherwise it is the ratio of the shorter length to the longer one, so a
/// short name buried in a long one scores low only because of its length.
pub fn score(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }
    if !a.contains(b.as_str()) && !b.contains(a.as_str()) {
        return 0.0;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    len_a.min(len_b) as f64 / len_a.max(len_b) as f64
}
