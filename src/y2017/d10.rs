use {
    crate::*,
    nom::{
        bytes::complete::tag,
        character::complete::{not_line_ending, space0},
        combinator::map,
        error::Error,
        multi::separated_list0,
        sequence::tuple,
        Err, IResult,
    },
};

/* --- Day 10: Knot Hash ---

This hash function simulates tying a knot in a circle of string with 256 marks on it. Based on the input to be hashed, the function repeatedly selects a span of string, brings the ends together, and gives the span a half-twist to reverse the order of the marks within it. After doing this many times, the order of the marks is used to build the resulting hash.

To achieve this, begin with a list of numbers from 0 to 255, a current position which begins at 0 (the first element in the list), a skip size (which starts at 0), and a sequence of lengths (your puzzle input). Then, for each length:

    Reverse the order of that length of elements in the list, starting with the element at the current position.
    Move the current position forward by that length plus the skip size.
    Increase the skip size by one.

The list is circular; if the current position and the length try to reverse elements beyond the end of the list, the operation reverses using as many extra elements as it needs from the front of the list. If the current position moves past the end of the list, it wraps around to the front. Lengths larger than the size of the list are invalid.

Suppose we instead only had a circular list containing five elements, 0, 1, 2, 3, 4, and were given input lengths of 3, 4, 1, 5. In this example, the first two numbers in the list end up being 3 and 4; to check the process, you can multiply them together to produce 12.

However, you should instead use the standard list size of 256 (with values 0 to 255) and the sequence of lengths in your puzzle input. Once this process is complete, what is the result of multiplying the first two numbers in the list?

--- Part Two ---

The logic you've constructed forms a single round of the Knot Hash algorithm; running the full thing requires many of these rounds. Some input and output processing is also required.

First, from now on, your input should be taken not as a list of numbers, but as a string of bytes instead. Unless otherwise specified, convert characters to bytes using their ASCII codes. Once you have determined the sequence of lengths to use, add the following lengths to the end of the sequence: 17, 31, 73, 47, 23.

Second, instead of merely running one round like you did above, run a total of 64 rounds, using the same length sequence in each round. The current position and skip size should be preserved between rounds.

Once the rounds are complete, you will be left with the numbers from 0 to 255 in some order, called the sparse hash. Your next task is to reduce these to a list of only 16 numbers called the dense hash. To do this, use numeric bitwise XOR to combine each consecutive block of 16 numbers in the sparse hash (there are 16 such blocks in a list of 256 numbers).

Finally, the standard way to represent a Knot Hash is as a single hexadecimal string; the final output is the dense hash in hexadecimal notation. Because each number in your dense hash will be between 0 and 255 (inclusive), always represent each number as two hexadecimal digits (including a leading zero as necessary).

Here are some example hashes:

    The empty string becomes a2582a3a0e66e6e86e3812dcb672a272.
    AoC 2017 becomes 33efeb34ea91902bb2f59c9920caa6cd.
    1,2,3 becomes 3efbe78a8d82f29979031a4aa0b16a9d.
    1,2,4 becomes 63960835bcdc130f0b66d7ff4f6a5a8e.

Treating your puzzle input as a string of ASCII characters, what is the Knot Hash of your puzzle input? Ignore any leading or trailing whitespace you might encounter. */

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution {
    /// The raw input line, hashed byte-wise in question 2.
    input: String,

    /// The same line read as comma-separated literal lengths for question 1.
    literal_lengths: Vec<usize>,
}

impl Solution {
    fn first_pair_product_for_ring_len(&self, ring_len: usize) -> Result<u32, KnotHashError> {
        let mut ring: Ring = Ring::new(ring_len)?;

        ring.run_round(&self.literal_lengths)?;

        Ok(ring.first_pair_product())
    }

    fn first_pair_product(&self) -> Result<u32, KnotHashError> {
        self.first_pair_product_for_ring_len(FULL_RING_LEN)
    }

    fn knot_hash_hex(&self) -> String {
        knot_hash(&self.input).to_hex()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        let (_, line): (&'i str, &'i str) = not_line_ending::<&'i str, NomError<'i>>(input)?;

        map(
            separated_list0(tuple((tag(","), space0)), parse_integer),
            |literal_lengths| Self {
                input: line.trim().into(),
                literal_lengths,
            },
        )(input)
    }
}

impl RunQuestions for Solution {
    /// The circular reversal is the whole puzzle here; everything else is cursor bookkeeping.
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        match self.first_pair_product() {
            Ok(first_pair_product) => {
                dbg!(first_pair_product);
            }
            Err(error) => eprintln!("Failed to mix lengths:\n{error:#?}"),
        }
    }

    /// Same round logic, different input reading. The classic mistake is letting the trailing
    /// newline of the input file sneak into the byte sequence, which silently changes the hash.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.knot_hash_hex());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STRS: &[&str] = &["3, 4, 1, 5"];

    fn solution(index: usize) -> &'static Solution {
        static ONCE_LOCK: OnceLock<Vec<Solution>> = OnceLock::new();

        &ONCE_LOCK.get_or_init(|| {
            vec![Solution {
                input: SOLUTION_STRS[0_usize].into(),
                literal_lengths: vec![3_usize, 4_usize, 1_usize, 5_usize],
            }]
        })[index]
    }

    #[test]
    fn test_try_from_str() {
        for (index, solution_str) in SOLUTION_STRS.iter().copied().enumerate() {
            assert_eq!(
                Solution::try_from(solution_str).as_ref(),
                Ok(solution(index))
            );
        }
    }

    #[test]
    fn test_first_pair_product_for_ring_len() {
        assert_eq!(
            solution(0_usize).first_pair_product_for_ring_len(5_usize),
            Ok(12_u32)
        );
    }

    #[test]
    fn test_first_pair_product_rejects_oversized_lengths() {
        assert_eq!(
            solution(0_usize).first_pair_product_for_ring_len(4_usize),
            Err(KnotHashError::LengthExceedsRingLen {
                length: 5_usize,
                ring_len: 4_usize,
            })
        );
    }

    #[test]
    fn test_knot_hash_hex() {
        for (input, hex) in [
            ("", "a2582a3a0e66e6e86e3812dcb672a272"),
            ("AoC 2017", "33efeb34ea91902bb2f59c9920caa6cd"),
            ("1,2,3", "3efbe78a8d82f29979031a4aa0b16a9d"),
            ("1,2,4", "63960835bcdc130f0b66d7ff4f6a5a8e"),
        ]
        .into_iter()
        {
            assert_eq!(Solution::try_from(input).unwrap().knot_hash_hex(), hex);
        }
    }
}
