//! Slot placement for the linear-probing tables.
//!
//! A key's 64-bit hash is multiplied by an odd multiplier and the top
//! `log2(capacity)` bits of the product select the slot. Multiplying by an odd
//! value is a bijection mod 2^64, and the high bits of the product depend on
//! every bit of the hash, so weak hashes with poor low-bit entropy still spread
//! across the table.
//!
//! Every resize replaces the multiplier with another entry of
//! [`GOOD_MULTIPLIERS`], picked from the old multiplier and the new shift. The
//! sequence of multipliers a table goes through is therefore not a fixed
//! function of its capacity alone, which makes it harder to keep a set of
//! colliding keys colliding across resizes.

/// Number of entries in [`GOOD_MULTIPLIERS`]. Always a power of two.
pub const MULTIPLIER_COUNT: usize = 512;

/// Odd 64-bit multipliers with a balanced bit population and a set high nibble.
///
/// Generated at compile time from a SplitMix64 stream, keeping only candidates
/// with between 28 and 36 set bits.
pub static GOOD_MULTIPLIERS: [u64; MULTIPLIER_COUNT] = generate_multipliers();

const fn generate_multipliers() -> [u64; MULTIPLIER_COUNT] {
    let mut table = [0u64; MULTIPLIER_COUNT];
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut filled = 0;
    while filled < MULTIPLIER_COUNT {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;

        let candidate = z | 1;
        let ones = candidate.count_ones();
        if ones >= 28 && ones <= 36 && (candidate >> 60) != 0 {
            table[filled] = candidate;
            filled += 1;
        }
    }
    table
}

/// Picks the multiplier that follows `old` when a table is resized to a
/// capacity addressed by `shift`.
///
/// The result never equals `old`.
#[inline]
pub fn rotate_multiplier(old: u64, shift: u32) -> u64 {
    let mask = MULTIPLIER_COUNT - 1;
    let mut index = ((old >> 48) as usize).wrapping_add(shift as usize) & mask;
    if GOOD_MULTIPLIERS[index] == old {
        index = (index + 1) & mask;
    }
    GOOD_MULTIPLIERS[index]
}

/// The addressing state of one table: mask, shift and current multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    mask: usize,
    shift: u32,
    multiplier: u64,
}

impl Placement {
    /// Addressing for a fresh table of `capacity` slots.
    ///
    /// `capacity` must be a power of two no smaller than 2.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two() && capacity >= 2);
        let shift = shift_for(capacity);
        Self {
            mask: capacity - 1,
            shift,
            multiplier: GOOD_MULTIPLIERS[shift as usize & (MULTIPLIER_COUNT - 1)],
        }
    }

    /// Re-targets this placement at `capacity` slots and rotates the multiplier.
    pub(crate) fn resize(&mut self, capacity: usize) {
        debug_assert!(capacity.is_power_of_two() && capacity >= 2);
        self.shift = shift_for(capacity);
        self.mask = capacity - 1;
        self.multiplier = rotate_multiplier(self.multiplier, self.shift);
    }

    /// Maps a hash to its ideal slot in `0..=mask`.
    #[inline(always)]
    pub(crate) fn place(&self, hash: u64) -> usize {
        (hash.wrapping_mul(self.multiplier) >> self.shift) as usize
    }

    #[inline(always)]
    pub(crate) fn mask(&self) -> usize {
        self.mask
    }

    #[inline(always)]
    pub(crate) fn multiplier(&self) -> u64 {
        self.multiplier
    }
}

#[inline(always)]
fn shift_for(capacity: usize) -> u32 {
    u64::BITS - capacity.trailing_zeros()
}
