//! Coordinate hashing: the deterministic foundation of the library.
//!
//! Every generated book and every mapped search coordinate derives from this
//! polynomial rolling hash, so its output must stay bit-identical forever.
//! It walks the UTF-16 code units of the input, multiplying the accumulator
//! by 31 in wrapping 32-bit signed arithmetic, and returns the absolute value.

/// Hash a string to a non-negative 32-bit integer.
///
/// `h = (h << 5) - h + unit` for each UTF-16 code unit, truncated to a signed
/// 32-bit integer after every step. The absolute value of `i32::MIN` is
/// returned as `2_147_483_648`, which is why the result is a `u32`.
pub fn hash(text: &str) -> u32 {
    let h = text.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    h.unsigned_abs()
}

/// A deterministic stream of draws derived from a single seed.
///
/// Draw `n` is `hash("{seed}/{n}")`, so every choice the generator makes is
/// routed through [`hash`] and nothing depends on an RNG implementation.
#[derive(Debug, Clone)]
pub struct DrawStream {
    seed: u64,
    counter: u64,
}

impl DrawStream {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    /// Next raw draw.
    pub fn next_u32(&mut self) -> u32 {
        let value = hash(&format!("{}/{}", self.seed, self.counter));
        self.counter += 1;
        value
    }

    /// Next draw in the inclusive range `lo..=hi`.
    pub fn range(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo <= hi);
        let span = u64::from(hi - lo) + 1;
        lo + (u64::from(self.next_u32()) % span) as u32
    }

    /// Pick one element of a slice, or `None` when the slice is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_u32() as usize % items.len();
        items.get(idx)
    }
}
