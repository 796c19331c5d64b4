pub use util::*;

pub mod util;

solutions![(y2017, [d10])];
