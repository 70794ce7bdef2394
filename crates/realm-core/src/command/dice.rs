//! Dice notation (`NdM`) parsing and rolling

use rand::Rng;

/// Notation used when `/roll` has no argument
pub const DEFAULT_NOTATION: &str = "1d20";

/// Upper bound on dice per roll
pub const MAX_DICE: u64 = 100;

/// Upper bound on sides per die
pub const MAX_SIDES: u64 = 1000;

/// A parsed dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceSpec {
    pub count: u64,
    pub sides: u64,
}

impl DiceSpec {
    /// Find the first `<digits>d<digits>` run in `notation` (case-insensitive).
    ///
    /// Counts and sides are clamped to [`MAX_DICE`] and [`MAX_SIDES`].
    pub fn find(notation: &str) -> Option<Self> {
        let bytes = notation.as_bytes();
        let mut start = 0;

        while start < bytes.len() {
            if !bytes[start].is_ascii_digit() {
                start += 1;
                continue;
            }
            let count_end = digit_run_end(bytes, start);
            let has_separator = bytes
                .get(count_end)
                .is_some_and(|b| b.eq_ignore_ascii_case(&b'd'));
            let sides_start = count_end + 1;

            if has_separator && bytes.get(sides_start).is_some_and(u8::is_ascii_digit) {
                let sides_end = digit_run_end(bytes, sides_start);
                return Some(Self {
                    count: saturating_parse(&bytes[start..count_end]).min(MAX_DICE),
                    sides: saturating_parse(&bytes[sides_start..sides_end]).min(MAX_SIDES),
                });
            }
            start = count_end;
        }
        None
    }

    /// Sum of `count` uniform draws in `[1, sides]`; zero dice or zero sides roll 0
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.sides == 0 {
            return 0;
        }
        (0..self.count).map(|_| rng.gen_range(1..=self.sides)).sum()
    }
}

/// Roll a notation string; malformed notation yields 0
pub fn roll_notation<R: Rng + ?Sized>(notation: &str, rng: &mut R) -> u64 {
    DiceSpec::find(notation).map_or(0, |spec| spec.roll(rng))
}

fn digit_run_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |offset| from + offset)
}

fn saturating_parse(digits: &[u8]) -> u64 {
    digits.iter().fold(0u64, |acc, d| {
        acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
    })
}
