//! Edit-distance scoring over Unicode scalar values.
//!
//! Distances are computed with a single-row dynamic-programming sweep: one
//! row sized to the source string is rewritten in place for every character
//! of the target.

/// Edit-distance calculator with configurable operation costs.
///
/// # Examples
/// ```
/// use poimatch_core::EditDistance;
///
/// let substitutions_expensive = EditDistance::new(1, 2);
/// // Swapping one letter now costs a deletion plus an insertion.
/// assert_eq!(substitutions_expensive.distance("cat", "cut"), 2);
/// assert_eq!(EditDistance::default().distance("cat", "cut"), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDistance {
    /// Cost of inserting or deleting one character.
    pub indel_cost: usize,
    /// Cost of replacing one character with another.
    pub substitution_cost: usize,
}

impl Default for EditDistance {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl EditDistance {
    /// Build a calculator with explicit costs.
    #[must_use]
    pub const fn new(indel_cost: usize, substitution_cost: usize) -> Self {
        Self {
            indel_cost,
            substitution_cost,
        }
    }

    /// Minimum total cost of turning `source` into `target`.
    #[must_use]
    pub fn distance(&self, source: &str, target: &str) -> usize {
        let columns: Vec<char> = source.chars().collect();
        let mut row: Vec<usize> = (0..=columns.len()).map(|i| i * self.indel_cost).collect();

        for (x, target_char) in target.chars().enumerate() {
            let mut cells = row.iter_mut();
            let Some(first) = cells.next() else {
                break;
            };
            let mut diagonal = *first;
            *first = (x + 1) * self.indel_cost;
            let mut left = *first;
            for (cell, source_char) in cells.zip(&columns) {
                let above = *cell;
                *cell = (above + self.indel_cost)
                    .min(left + self.indel_cost)
                    .min(diagonal + self.substitution(*source_char, target_char));
                diagonal = above;
                left = *cell;
            }
        }

        row.last().copied().unwrap_or_default()
    }

    const fn substitution(&self, a: char, b: char) -> usize {
        if a == b { 0 } else { self.substitution_cost }
    }
}

/// Levenshtein distance with unit costs.
///
/// # Examples
/// ```
/// use poimatch_core::levenshtein_distance;
///
/// assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
/// ```
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    EditDistance::default().distance(a, b)
}

/// Levenshtein distance relative to the longer input, in `0.0..=1.0`.
///
/// `0.0` means identical. Lengths are counted in Unicode scalar values; two
/// empty strings have a ratio of `0.0`.
///
/// # Examples
/// ```
/// use poimatch_core::levenshtein_ratio;
///
/// assert_eq!(levenshtein_ratio("abc", "abc"), 0.0);
/// assert_eq!(levenshtein_ratio("abcd", "abxy"), 0.5);
/// assert_eq!(levenshtein_ratio("", ""), 0.0);
/// ```
#[must_use]
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    levenshtein_distance(a, b) as f64 / longest as f64
}
