use crate::types::{FeedbackRatings, RatingDimension, Stars, MAX_STARS};

pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';

/// A labelled row of five stars, filled up to `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating<'a> {
    pub label: &'a str,
    pub value: u8,
}

impl<'a> StarRating<'a> {
    pub fn new(label: &'a str, value: u8) -> Self {
        Self { label, value }
    }

    pub fn for_dimension(dimension: RatingDimension, ratings: &FeedbackRatings) -> Self {
        Self::new(dimension.label(), ratings.get(dimension))
    }

    /// `(index, filled)` for each of the five symbols
    pub fn symbols(&self) -> impl Iterator<Item = (u8, bool)> + '_ {
        (1..=MAX_STARS).map(move |index| (index, index <= self.value))
    }

    pub fn render(&self) -> String {
        self.symbols()
            .map(|(_, filled)| if filled { FILLED_STAR } else { EMPTY_STAR })
            .collect()
    }

    /// Report the star at `index` to `on_change`. Indices outside 1..=5 are
    /// not symbols of the row and report nothing.
    pub fn activate(&self, index: u8, on_change: impl FnOnce(Stars)) -> bool {
        match Stars::new(index) {
            Ok(stars) => {
                on_change(stars);
                true
            }
            Err(_) => false,
        }
    }
}
