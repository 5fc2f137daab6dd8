/// The mapping codec: a positional base-`k` integer encoding of an
/// assignment of a bag's vertices to `V(H)`, exposing `extract`, `insert`
/// and `remove` as pure integer operations on that encoding.
///
/// Positions stay within a `u64`/table-index range (a table that didn't fit
/// in `usize` couldn't be materialised anyway); only DP *cell values* need
/// arbitrary precision, handled separately in `dp`.
pub mod integer_functions {
    use std::collections::HashMap;

    /// An encoded assignment of a bag (in its canonical vertex order) to
    /// `V(H)`, base `k = |V(H)|`.
    pub type Mapping = u64;

    /// Returns the digit with significance `i`: `(p / k^i) mod k`.
    pub fn extract(k: Mapping, p: Mapping, i: Mapping) -> Mapping {
        (p / k.pow(i as u32)) % k
    }

    /// Inserts digit `d` at position `i`, shifting digits `>= i` one
    /// position up in significance.
    pub fn insert(k: Mapping, p: Mapping, i: Mapping, d: Mapping) -> Mapping {
        let r = p % k.pow(i as u32);
        let l = p - r;
        (k * l) + k.pow(i as u32) * d + r
    }

    /// Removes the digit at position `i`, shifting digits `> i` one
    /// position down in significance.
    pub fn remove(k: Mapping, p: Mapping, i: Mapping) -> Mapping {
        let r = p % k.pow(i as u32);
        let l = p - (p % k.pow((i + 1) as u32));
        (l / k) + r
    }

    /// The number of mappings from a `d`-element bag to a `k`-element
    /// target: `k^d`.
    pub fn max_mappings(d: Mapping, k: Mapping) -> Mapping {
        k.pow(d as u32)
    }

    /// Decodes `p` (base `k`) into a position -> digit map. Mostly useful
    /// for debugging/tests; the DP engine works with `extract` directly.
    pub fn to_hashmap(k: Mapping, p: Mapping) -> HashMap<Mapping, Mapping> {
        let mut mapping = HashMap::new();
        let mut rest = p;
        let mut pos = 0;
        while rest > 0 {
            mapping.insert(pos, rest % k);
            pos += 1;
            rest /= k;
        }
        mapping
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn round_trip_insert_extract_remove() {
            for k in 2..6 {
                for p in 0..k.pow(3) {
                    for i in 0..3 {
                        for d in 0..k {
                            let inserted = insert(k, p, i, d);
                            assert_eq!(extract(k, inserted, i), d);
                            assert_eq!(remove(k, inserted, i), p);
                        }
                    }
                }
            }
        }

        #[test]
        fn max_mappings_is_k_pow_d() {
            assert_eq!(max_mappings(0, 5), 1);
            assert_eq!(max_mappings(3, 2), 8);
        }

        #[test]
        fn to_hashmap_matches_extract() {
            let k = 4;
            let p = 1 * 4 + 3 * 16 + 2 * 64;
            let m = to_hashmap(k, p);
            for i in 0..4 {
                assert_eq!(*m.get(&i).unwrap_or(&0), extract(k, p, i));
            }
        }
    }
}
