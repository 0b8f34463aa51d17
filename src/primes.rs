/// Ascending prime table used to size hash tables.
///
/// Every prime below 1024 is present, so small requests round to the true
/// next prime. Above that the entries are spaced roughly a tenth apart, which
/// keeps consecutive grow steps from rehashing into near-identical sizes.
#[rustfmt::skip]
const PRIME_CAPACITIES: [usize; 325] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29,
    31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
    73, 79, 83, 89, 97, 101, 103, 107, 109, 113,
    127, 131, 137, 139, 149, 151, 157, 163, 167, 173,
    179, 181, 191, 193, 197, 199, 211, 223, 227, 229,
    233, 239, 241, 251, 257, 263, 269, 271, 277, 281,
    283, 293, 307, 311, 313, 317, 331, 337, 347, 349,
    353, 359, 367, 373, 379, 383, 389, 397, 401, 409,
    419, 421, 431, 433, 439, 443, 449, 457, 461, 463,
    467, 479, 487, 491, 499, 503, 509, 521, 523, 541,
    547, 557, 563, 569, 571, 577, 587, 593, 599, 601,
    607, 613, 617, 619, 631, 641, 643, 647, 653, 659,
    661, 673, 677, 683, 691, 701, 709, 719, 727, 733,
    739, 743, 751, 757, 761, 769, 773, 787, 797, 809,
    811, 821, 823, 827, 829, 839, 853, 857, 859, 863,
    877, 881, 883, 887, 907, 911, 919, 929, 937, 941,
    947, 953, 967, 971, 977, 983, 991, 997, 1009, 1013,
    1019, 1021, 1129, 1249, 1381, 1523, 1693, 1867, 2063, 2273,
    2503, 2767, 3049, 3359, 3697, 4073, 4481, 4931, 5431, 5981,
    6581, 7243, 7993, 8803, 9689, 10663, 11731, 12907, 14207, 15629,
    17203, 18947, 20849, 22937, 25237, 27763, 30553, 33613, 36979, 40693,
    44771, 49253, 54181, 59611, 65579, 72139, 79357, 87293, 96043, 105649,
    116239, 127867, 140659, 154727, 170207, 187237, 205963, 226571, 249229, 274163,
    301583, 331753, 364937, 401473, 441631, 485819, 534403, 587849, 646637, 711307,
    782443, 860689, 946769, 1041449, 1145611, 1260191, 1386211, 1524839, 1677323, 1845073,
    2029597, 2232569, 2455847, 2701459, 2971607, 3268781, 3595661, 3955243, 4350769, 4785881,
    5264473, 5790943, 6370043, 7007069, 7707779, 8478571, 9326501, 10259153, 11285081, 12413617,
    13654987, 15020491, 16522543, 18174803, 19992311, 21991561, 24190721, 26609809, 29270797, 32197883,
    35417687, 38959489, 42855451, 47141023, 51855127, 57040693, 62744797, 69019289, 75921227, 83513357,
    91864739, 101051239, 111156373, 122272019, 134499221, 147949163, 162744151, 179018569, 196920443, 216612491,
    238273757, 262101149, 288311269, 317142409, 348856657, 383742323, 422116567, 464328229, 510761081, 561837223,
    618020957, 679823057, 747805393, 822585937, 904844531, 995329051, 1094861993, 1204348207, 1324783069, 1457261383,
    1602987559, 1763286323, 1939614961, 2133576493, 2147483647,
];

/// The largest capacity served from the precomputed table.
pub const LARGEST_TABLE_PRIME: usize = PRIME_CAPACITIES[PRIME_CAPACITIES.len() - 1];

/// Returns the smallest table prime that is `>= n`.
///
/// Requests above [`LARGEST_TABLE_PRIME`] fall back to searching for the
/// smallest prime `>= n` directly. If no such prime fits in a `usize`, the
/// result saturates at [`LARGEST_TABLE_PRIME`]; no table that large could be
/// allocated anyway.
///
/// # Examples
///
/// ```
/// use long_short_map::primes::next_prime;
///
/// assert_eq!(next_prime(0), 2);
/// assert_eq!(next_prime(907), 907);
/// assert_eq!(next_prime(908), 911);
/// ```
pub fn next_prime(n: usize) -> usize {
    match PRIME_CAPACITIES.binary_search(&n) {
        Ok(index) => PRIME_CAPACITIES[index],
        Err(index) if index < PRIME_CAPACITIES.len() => PRIME_CAPACITIES[index],
        Err(_) => search_prime(n),
    }
}

#[cold]
fn search_prime(n: usize) -> usize {
    // Past the table, so n is far above 2 and only odd candidates matter.
    let mut candidate = n | 1;
    while !is_prime(candidate) {
        candidate = match candidate.checked_add(2) {
            Some(next) => next,
            None => return LARGEST_TABLE_PRIME,
        };
    }
    candidate
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_primes() {
        assert!(PRIME_CAPACITIES.windows(2).all(|w| w[0] < w[1]));
        assert!(PRIME_CAPACITIES.iter().all(|&p| is_prime(p)));
    }

    #[test]
    fn small_requests_round_to_next_prime() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(1), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(4), 5);
        assert_eq!(next_prime(8), 11);
        assert_eq!(next_prime(277), 277);
        assert_eq!(next_prime(907), 907);
        assert_eq!(next_prime(908), 911);
        assert_eq!(next_prime(1000), 1009);
    }

    #[test]
    fn large_requests_use_sparse_entries() {
        assert_eq!(next_prime(1024), 1129);
        assert_eq!(next_prime(1814), 1867);
        assert_eq!(next_prime(LARGEST_TABLE_PRIME), LARGEST_TABLE_PRIME);
    }

    #[test]
    fn beyond_table_searches() {
        assert_eq!(next_prime(LARGEST_TABLE_PRIME + 1), 2_147_483_659);
    }

    #[test]
    fn unrepresentable_requests_saturate() {
        // usize::MAX is divisible by 3 on every target and there is no room
        // to search past it.
        assert_eq!(next_prime(usize::MAX), LARGEST_TABLE_PRIME);
    }
}
