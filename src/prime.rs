//! Prime bucket sizing.

/// Returns `true` if `n` is prime, by trial division up to `sqrt(n)`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    // Candidates of the form 6k ± 1.
    let mut d = 5usize;
    while d <= n / d {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Smallest prime `>= n`, or `None` if no such prime fits in `usize`.
///
/// ```
/// use chained_hash::prime::next_prime;
///
/// assert_eq!(next_prime(10), Some(11));
/// assert_eq!(next_prime(11), Some(11));
/// ```
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    if candidate > 2 && candidate % 2 == 0 {
        candidate = candidate.checked_add(1)?;
    }
    while !is_prime(candidate) {
        candidate = candidate.checked_add(if candidate == 2 { 1 } else { 2 })?;
    }
    Some(candidate)
}
