pub use knot_hash::*;

use {
    clap::Parser,
    memmap::Mmap,
    nom::{
        bytes::complete::tag,
        character::complete::digit1,
        combinator::{map, map_res, opt},
        error::Error,
        sequence::tuple,
        IResult,
    },
    num::Integer,
    std::{
        any::type_name,
        collections::BTreeMap,
        fmt::Debug,
        fs::File,
        io::{Error as IoError, ErrorKind, Result as IoResult},
        str::{from_utf8, FromStr, Utf8Error},
    },
};

pub mod knot_hash;

pub type NomError<'i> = Error<&'i str>;

#[derive(Debug, Parser)]
pub struct QuestionArgs {
    /// Print extra information, if there is any
    #[arg(short, long, default_value_t)]
    pub verbose: bool,
}

/// Arguments for program execution
#[derive(Debug, Parser)]
pub struct Args {
    /// Input file path
    #[arg(short, long, default_value_t)]
    input_file_path: String,

    /// The year to run
    #[arg(short, long)]
    pub year: u16,

    /// The day to run
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=25))]
    pub day: u8,

    /// The question to run, both if omitted
    #[arg(short, long, default_value_t, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub question: u8,

    #[command(flatten)]
    pub question_args: QuestionArgs,
}

impl Args {
    fn try_to_intermediate<I>(&self) -> Option<I>
    where
        I: for<'a> TryFrom<&'a str>,
        for<'a> <I as TryFrom<&'a str>>::Error: Debug,
    {
        let default_file_path: String;
        let file_path: &str = if self.input_file_path.is_empty() {
            default_file_path = format!("input/y{}/d{}.txt", self.year, self.day);

            &default_file_path
        } else {
            &self.input_file_path
        };

        // SAFETY: This isn't truly safe, we're just hoping nobody touches our file before we're
        // done parsing it
        unsafe {
            open_utf8_file(file_path, |s| {
                s.try_into().map_or_else(
                    |error| {
                        eprintln!(
                            "Failed to convert file \"{file_path}\" to type {}:\n{error:#?}",
                            type_name::<I>()
                        );

                        None
                    },
                    Some,
                )
            })
        }
        .unwrap_or_else(|error| {
            eprintln!("Failed to open UTF-8 file \"{file_path}\":\n{error}");

            None
        })
    }
}

pub trait RunQuestions
where
    Self: Sized + for<'a> TryFrom<&'a str>,
    for<'a> <Self as TryFrom<&'a str>>::Error: Debug,
{
    fn q2_internal(&mut self, args: &QuestionArgs);
    fn q1_internal(&mut self, args: &QuestionArgs);

    fn q1(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q1_internal(&args.question_args);
        }
    }

    fn q2(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q2_internal(&args.question_args);
        }
    }

    fn both(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q1_internal(&args.question_args);
            intermediate.q2_internal(&args.question_args);
        }
    }
}

#[derive(Clone, Copy)]
pub struct Day {
    pub q1: fn(&Args),
    pub q2: fn(&Args),
    pub both: fn(&Args),
}

impl Day {
    fn run(&self, args: &Args) {
        match args.question {
            0 => (self.both)(args),
            1 => (self.q1)(args),
            2 => (self.q2)(args),
            question => unreachable!(
                "A valid Args will have a question value in the range 0..=2, but {question} was \
                encountered.\n\
                Args:\n\
                {args:#?}"
            ),
        }
    }
}

/// A registry of solution entry points, keyed by year and day.
///
/// Entries are registered through the `solutions!` macro, which hands over the `yYYYY`/`dD` module
/// identifiers as strings alongside the question function pointers.
#[derive(Default)]
pub struct Solutions {
    days: BTreeMap<(u16, u8), Day>,
}

fn parse_tagged_int<'i, I: FromStr>(t: &'static str, input: &'i str) -> IResult<&'i str, I> {
    map(tuple((tag(t), map_res(digit1, I::from_str))), |(_, i)| i)(input)
}

impl Solutions {
    pub fn run(&self, args: &Args) {
        match self.days.get(&(args.year, args.day)) {
            None => panic!(
                "Queried year {} day {} has no registered questions. Registered days: {:?}\n\
                Args:\n\
                {args:#?}",
                args.year,
                args.day,
                self.days.keys().collect::<Vec<&(u16, u8)>>()
            ),
            Some(day) => day.run(args),
        }
    }

    pub fn try_from_entries(entries: Vec<(&str, &str, Day)>) -> Option<Self> {
        let mut days: BTreeMap<(u16, u8), Day> = BTreeMap::new();

        for (year_str, day_str, day) in entries {
            match (
                parse_tagged_int::<u16>("y", year_str),
                parse_tagged_int::<u8>("d", day_str),
            ) {
                (Ok((_, year)), Ok((_, day_index))) => {
                    days.insert((year, day_index), day);
                }
                (year_result, day_result) => {
                    eprintln!(
                        "Invalid solution module pair \"{year_str}\"/\"{day_str}\"\n\
                        Year error:\n\
                        {:?}\n\
                        Day error:\n\
                        {:?}",
                        year_result.err(),
                        day_result.err()
                    );
                }
            }
        }

        (!days.is_empty()).then_some(Self { days })
    }
}

#[macro_export]
macro_rules! solutions {
    [ $( ( $year:ident, [ $( $day:ident ),* $(,)? ] ) ),* $(,)? ] => {
        $(
            pub mod $year {
                $(
                    pub mod $day;
                )*
            }
        )*

        pub fn solutions() -> &'static Solutions {
            static ONCE_LOCK: std::sync::OnceLock<Solutions> = std::sync::OnceLock::new();

            ONCE_LOCK.get_or_init(|| {
                Solutions::try_from_entries(vec![ $( $(
                    (
                        stringify!($year),
                        stringify!($day),
                        Day {
                            q1: $year::$day::Solution::q1,
                            q2: $year::$day::Solution::q2,
                            both: $year::$day::Solution::both,
                        },
                    ),
                )* )* ])
                .unwrap_or_else(Solutions::default)
            })
        }
    };
}

/// Opens a memory-mapped UTF-8 file at a specified path, and passes in a `&str` over the file to a
/// provided callback function
///
/// # Arguments
///
/// * `file_path` - A string slice file path to open as a read-only file
/// * `f` - A callback function to invoke on the contents of the file as a string slice
///
/// # Errors
///
/// This function returns a `Result::Err`-wrapped `std::io::Error` if an error has occurred.
/// Possible causes are:
///
/// * `std::fs::File::open` was unable to open a read-only file at `file_path`
/// * `memmap::Mmap::map` fails to create an `Mmap` instance for the opened file
/// * `std::str::from_utf8` determines the file is not in valid UTF-8 format
///
/// `f` is only executed *iff* an error is not encountered.
///
/// # Safety
///
/// This function uses `Mmap::map`, which is an unsafe function. There is no guarantee that an
/// external process won't modify the file after it is opened as read-only.
///
/// # Undefined Behavior
///
/// Related to the **Safety** section above, it is UB if the opened file is modified by an external
/// process while this function is referring to it as an immutable string slice.
pub unsafe fn open_utf8_file<T, F: FnOnce(&str) -> T>(file_path: &str, f: F) -> IoResult<T> {
    let file: File = File::open(file_path)?;

    // SAFETY: This operation is unsafe
    let mmap: Mmap = Mmap::map(&file)?;
    let bytes: &[u8] = &mmap;
    let utf8_str: &str = from_utf8(bytes).map_err(|utf8_error: Utf8Error| -> IoError {
        IoError::new(ErrorKind::InvalidData, utf8_error)
    })?;

    Ok(f(utf8_str))
}

pub fn parse_integer<'i, I: FromStr + Integer>(input: &'i str) -> IResult<&'i str, I> {
    map(
        tuple((
            map(opt(tag("-")), |minus| {
                if minus.is_some() {
                    I::zero() - I::one()
                } else {
                    I::one()
                }
            }),
            map_res(digit1, I::from_str),
        )),
        |(sign, bound)| sign * bound,
    )(input)
}

pub trait Parse: Sized {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Args) {}

    const NOOP_DAY: Day = Day {
        q1: noop,
        q2: noop,
        both: noop,
    };

    #[test]
    fn test_parse_tagged_int() {
        assert_eq!(parse_tagged_int::<u16>("y", "y2017"), Ok(("", 2017_u16)));
        assert_eq!(parse_tagged_int::<u8>("d", "d10"), Ok(("", 10_u8)));
        assert!(parse_tagged_int::<u8>("d", "y2017").is_err());
    }

    #[test]
    fn test_try_from_entries() {
        assert!(Solutions::try_from_entries(Vec::new()).is_none());
        assert!(Solutions::try_from_entries(vec![("2017", "10", NOOP_DAY)]).is_none());

        let solutions: Solutions =
            Solutions::try_from_entries(vec![("y2017", "d10", NOOP_DAY)]).unwrap();

        assert!(solutions.days.contains_key(&(2017_u16, 10_u8)));
    }
}
