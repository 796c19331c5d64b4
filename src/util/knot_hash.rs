//! The Knot Hash mixing function from Advent of Code 2017.
//!
//! A `Ring` of marks `0..len` is permuted by reversing circular segments, where the segment start
//! is tracked by a cursor (`position`) that advances by each processed length plus an
//! ever-increasing `skip` value. Running 64 rounds over the byte values of an input string
//! (plus a fixed length suffix) and XOR-folding the result into 16 bytes yields the hash.
//!
//! The algorithm resurfaces in later puzzles, so it lives here instead of in the day 10 module.

use {
    bitvec::prelude::*,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        ops::Range,
    },
};

/// Mark count of the ring used for full hash computations.
pub const FULL_RING_LEN: usize = 256_usize;

/// Lengths appended to the byte-derived length sequence in full hash mode.
pub const SUFFIX_LENGTHS: [usize; 5_usize] = [17_usize, 31_usize, 73_usize, 47_usize, 23_usize];

/// Rounds executed by a full hash computation, cursor state carried across rounds.
pub const ROUNDS: usize = 64_usize;

const CHUNK_LEN: usize = 16_usize;

#[derive(Debug, PartialEq)]
pub enum KnotHashError {
    /// Ring lengths outside of `1..=256` cannot be constructed: every mark must fit in a `u8`.
    InvalidRingLen(usize),

    /// A segment length exceeding the ring length is a contract violation, not a wraparound case.
    LengthExceedsRingLen { length: usize, ring_len: usize },

    /// XOR folding needs the ring to split into whole chunks of 16 marks.
    RingLenNotChunkable(usize),
}

/// A fixed-size circular sequence of marks, always a permutation of `0..len`, plus the cursor
/// state that persists across mixing rounds.
#[derive(Clone)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Ring {
    marks: Vec<u8>,
    position: usize,
    skip: usize,
}

impl Ring {
    pub fn new(len: usize) -> Result<Self, KnotHashError> {
        if (1_usize..=FULL_RING_LEN).contains(&len) {
            Ok(Self {
                marks: (0_usize..len).map(|mark| mark as u8).collect(),
                position: 0_usize,
                skip: 0_usize,
            })
        } else {
            Err(KnotHashError::InvalidRingLen(len))
        }
    }

    /// The canonical 256-mark ring.
    pub fn full() -> Self {
        Self {
            marks: (0_usize..FULL_RING_LEN).map(|mark| mark as u8).collect(),
            position: 0_usize,
            skip: 0_usize,
        }
    }

    #[inline]
    pub fn marks(&self) -> &[u8] {
        &self.marks
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Reverses the `length` marks starting at `position`, wrapping around the end of the ring.
    ///
    /// Reversing 0 or 1 marks is a no-op. Applying this twice with identical arguments restores
    /// the ring.
    pub fn reverse_segment(&mut self, position: usize, length: usize) -> Result<(), KnotHashError> {
        self.check_length(length)?;
        self.reverse_segment_unchecked(position, length);

        Ok(())
    }

    /// Processes each length in order: reverse the segment at the cursor, advance the cursor by
    /// the length plus the skip value, increment the skip value.
    ///
    /// Cursor state is intentionally not reset, so repeated invocations continue where the
    /// previous round left off. All lengths are validated before the first mutation.
    pub fn run_round(&mut self, lengths: &[usize]) -> Result<(), KnotHashError> {
        self.check_lengths(lengths)?;
        self.run_round_unchecked(lengths);

        Ok(())
    }

    pub fn run_rounds(&mut self, lengths: &[usize], rounds: usize) -> Result<(), KnotHashError> {
        self.check_lengths(lengths)?;

        for _ in 0_usize..rounds {
            self.run_round_unchecked(lengths);
        }

        Ok(())
    }

    /// The product of the first two marks, the answer checked after a single literal-lengths
    /// round.
    pub fn first_pair_product(&self) -> u32 {
        self.marks[0_usize] as u32 * self.marks[1_usize] as u32
    }

    /// XOR-folds consecutive chunks of 16 marks into one byte each.
    pub fn dense_digest(&self) -> Result<Digest, KnotHashError> {
        if self.marks.len() % CHUNK_LEN != 0_usize {
            Err(KnotHashError::RingLenNotChunkable(self.marks.len()))
        } else {
            Ok(self.fold_chunks())
        }
    }

    fn check_length(&self, length: usize) -> Result<(), KnotHashError> {
        if length > self.marks.len() {
            Err(KnotHashError::LengthExceedsRingLen {
                length,
                ring_len: self.marks.len(),
            })
        } else {
            Ok(())
        }
    }

    fn check_lengths(&self, lengths: &[usize]) -> Result<(), KnotHashError> {
        lengths
            .iter()
            .try_for_each(|length| self.check_length(*length))
    }

    fn reverse_segment_unchecked(&mut self, position: usize, length: usize) {
        let ring_len: usize = self.marks.len();

        for offset in 0_usize..length / 2_usize {
            let front: usize = (position + offset) % ring_len;
            let back: usize = (position + length - 1_usize - offset) % ring_len;

            self.marks.swap(front, back);
        }
    }

    fn run_round_unchecked(&mut self, lengths: &[usize]) {
        for length in lengths.iter().copied() {
            self.reverse_segment_unchecked(self.position, length);
            self.position = (self.position + length + self.skip) % self.marks.len();
            self.skip += 1_usize;
        }
    }

    fn fold_chunks(&self) -> Digest {
        Digest(
            self.marks
                .chunks_exact(CHUNK_LEN)
                .map(|chunk| {
                    chunk
                        .iter()
                        .copied()
                        .fold(0_u8, |acc, mark| acc ^ mark)
                })
                .collect(),
        )
    }
}

/// The dense hash: one XOR-folded byte per chunk of 16 ring marks.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Digest(Vec<u8>);

impl Digest {
    const ALPHA_OFFSET: u8 = b'a' - 10_u8;
    const HIGH_NIBBLE_RANGE: Range<usize> = u8::BITS as usize / 2_usize..u8::BITS as usize;
    const LOW_NIBBLE_RANGE: Range<usize> = 0_usize..Self::HIGH_NIBBLE_RANGE.start;

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Renders each byte as exactly two lowercase hexadecimal digits, in chunk order.
    pub fn to_hex(&self) -> String {
        let mut hex: Vec<u8> = Vec::with_capacity(self.0.len() * 2_usize);

        for byte in self.0.iter().copied() {
            let nibbles: &BitSlice<u8> = byte.view_bits::<Lsb0>();

            hex.push(Self::nibble_value_to_ascii(
                nibbles[Self::HIGH_NIBBLE_RANGE].load(),
            ));
            hex.push(Self::nibble_value_to_ascii(
                nibbles[Self::LOW_NIBBLE_RANGE].load(),
            ));
        }

        // SAFETY: `nibble_value_to_ascii` only produces ASCII hexadecimal digits.
        unsafe { String::from_utf8_unchecked(hex) }
    }

    fn nibble_value_to_ascii(nibble: u8) -> u8 {
        if nibble < 10_u8 {
            nibble + b'0'
        } else {
            nibble + Self::ALPHA_OFFSET
        }
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.to_hex())
    }
}

/// Computes the full 64-round Knot Hash of an input string.
///
/// The length sequence is the byte value of each input character followed by the fixed suffix.
/// Both are at most 255, so they can never exceed the 256-mark ring.
pub fn knot_hash(input: &str) -> Digest {
    let lengths: Vec<usize> = input
        .bytes()
        .map(usize::from)
        .chain(SUFFIX_LENGTHS)
        .collect();
    let mut ring: Ring = Ring::full();

    for _ in 0_usize..ROUNDS {
        ring.run_round_unchecked(&lengths);
    }

    ring.fold_chunks()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_LENGTHS: [usize; 4_usize] = [3_usize, 4_usize, 1_usize, 5_usize];
    const EXAMPLE_RING_LEN: usize = 5_usize;

    fn example_ring() -> Ring {
        Ring::new(EXAMPLE_RING_LEN).unwrap()
    }

    #[test]
    fn test_new() {
        assert_eq!(example_ring().marks(), &[0_u8, 1_u8, 2_u8, 3_u8, 4_u8]);
        assert_eq!(Ring::new(0_usize), Err(KnotHashError::InvalidRingLen(0_usize)));
        assert_eq!(
            Ring::new(257_usize),
            Err(KnotHashError::InvalidRingLen(257_usize))
        );
        assert_eq!(Ring::full().marks().len(), FULL_RING_LEN);
    }

    #[test]
    fn test_reverse_segment_is_self_inverse() {
        for (position, length) in [
            (0_usize, 3_usize),
            (3_usize, 4_usize),
            (4_usize, 5_usize),
            (2_usize, 2_usize),
        ] {
            let mut ring: Ring = example_ring();

            ring.reverse_segment(position, length).unwrap();
            ring.reverse_segment(position, length).unwrap();

            assert_eq!(ring, example_ring());
        }
    }

    #[test]
    fn test_reverse_segment_short_lengths_are_no_ops() {
        let mut ring: Ring = example_ring();

        ring.reverse_segment(2_usize, 0_usize).unwrap();

        assert_eq!(ring, example_ring());

        ring.reverse_segment(2_usize, 1_usize).unwrap();

        assert_eq!(ring, example_ring());
    }

    #[test]
    fn test_reverse_segment_wraps_around() {
        let mut ring: Ring = example_ring();

        ring.reverse_segment(3_usize, 4_usize).unwrap();

        assert_eq!(ring.marks(), &[4_u8, 3_u8, 2_u8, 1_u8, 0_u8]);
    }

    #[test]
    fn test_invalid_length_leaves_ring_untouched() {
        let mut ring: Ring = example_ring();

        assert_eq!(
            ring.run_round(&[3_usize, 6_usize]),
            Err(KnotHashError::LengthExceedsRingLen {
                length: 6_usize,
                ring_len: EXAMPLE_RING_LEN,
            })
        );
        assert_eq!(ring, example_ring());
    }

    #[test]
    fn test_run_round_example() {
        let mut ring: Ring = example_ring();

        ring.run_round(&EXAMPLE_LENGTHS).unwrap();

        assert_eq!(ring.marks(), &[3_u8, 4_u8, 2_u8, 1_u8, 0_u8]);
        assert_eq!(ring.position(), 4_usize);
        assert_eq!(ring.skip(), 4_usize);
        assert_eq!(ring.first_pair_product(), 12_u32);
    }

    #[test]
    fn test_rounds_preserve_permutation() {
        let mut ring: Ring = example_ring();

        ring.run_rounds(&EXAMPLE_LENGTHS, 3_usize).unwrap();

        let mut marks: Vec<u8> = ring.marks().into();

        marks.sort_unstable();

        assert_eq!(marks, example_ring().marks());
    }

    #[test]
    fn test_cursor_persists_across_rounds() {
        let mut two_single_rounds: Ring = example_ring();

        two_single_rounds.run_round(&EXAMPLE_LENGTHS).unwrap();
        two_single_rounds.run_round(&EXAMPLE_LENGTHS).unwrap();

        let mut one_double_round: Ring = example_ring();

        one_double_round.run_rounds(&EXAMPLE_LENGTHS, 2_usize).unwrap();

        assert_eq!(two_single_rounds, one_double_round);
        assert!(two_single_rounds.skip() > example_ring().skip());
    }

    #[test]
    fn test_dense_digest_requires_chunkable_ring() {
        assert_eq!(
            example_ring().dense_digest(),
            Err(KnotHashError::RingLenNotChunkable(EXAMPLE_RING_LEN))
        );
        assert_eq!(
            Ring::full().dense_digest().unwrap().to_hex(),
            // All chunks of an unmixed full ring XOR-fold to zero.
            "00000000000000000000000000000000"
        );
    }

    #[test]
    fn test_knot_hash() {
        for (input, hex) in [
            ("", "a2582a3a0e66e6e86e3812dcb672a272"),
            ("AoC 2017", "33efeb34ea91902bb2f59c9920caa6cd"),
            ("1,2,3", "3efbe78a8d82f29979031a4aa0b16a9d"),
            ("1,2,4", "63960835bcdc130f0b66d7ff4f6a5a8e"),
        ] {
            assert_eq!(knot_hash(input).to_hex(), hex);
        }
    }

    #[test]
    fn test_knot_hash_is_pure() {
        assert_eq!(knot_hash("AoC 2017"), knot_hash("AoC 2017"));
    }
}
