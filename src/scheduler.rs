//! SM-2 scheduling
//!
//! Quality ratings (1-5):
//! - 1: Complete blackout
//! - 2: Wrong, but recognised the solution once seen
//! - 3: Solved with serious difficulty
//! - 4: Solved after hesitation
//! - 5: Perfect recall
//!
//! Anything below 3 is a failed recall and restarts the repetition chain.

use chrono::{Days, NaiveDate};

use crate::error::{Error, Result};

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const INITIAL_EASE_FACTOR: f64 = 2.5;
/// Longest interval ever scheduled, in days (about 100 years)
pub const MAX_INTERVAL: u32 = 36_500;

/// A recall rating, guaranteed to be within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const ALL: [Quality; 5] = [Quality(1), Quality(2), Quality(3), Quality(4), Quality(5)];

    pub fn new(value: u8) -> Result<Self> {
        Self::try_from(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self.0 >= 3
    }

    /// button caption
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Blackout",
            2 => "Wrong",
            3 => "Hard",
            4 => "Good",
            _ => "Perfect",
        }
    }
}

impl TryFrom<u8> for Quality {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if (1..=5).contains(&value) {
            Ok(Quality(value))
        } else {
            Err(Error::InvalidInput(format!(
                "quality must be between 1 and 5, got {value}"
            )))
        }
    }
}

/// The scheduling fields of a card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewState {
    pub interval: u32,
    pub repetitions: u32,
    pub ease_factor: f64,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            interval: 0,
            repetitions: 0,
            ease_factor: INITIAL_EASE_FACTOR,
        }
    }
}

/// Output of one review
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub interval: u32,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub next_review: NaiveDate,
}

impl Schedule {
    pub fn state(&self) -> ReviewState {
        ReviewState {
            interval: self.interval,
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
        }
    }
}

/// Compute the next schedule from a raw rating.
///
/// Fails with [`Error::InvalidInput`] when `quality` is outside 1..=5.
pub fn schedule(state: ReviewState, quality: u8, today: NaiveDate) -> Result<Schedule> {
    let quality = Quality::try_from(quality)?;
    next_schedule(state, quality, today)
}

/// Intervals grow up to [`MAX_INTERVAL`] and stay there.
///
/// Fails with [`Error::InvalidInput`] only when `today + interval` is past the
/// last representable date.
pub fn next_schedule(state: ReviewState, quality: Quality, today: NaiveDate) -> Result<Schedule> {
    let ease_factor = state.ease_factor.max(MIN_EASE_FACTOR);

    let (interval, repetitions, ease_factor) = if quality.is_pass() {
        let interval = match state.repetitions {
            0 => 1,
            1 => 6,
            _ => grow(state.interval, ease_factor),
        };
        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        let miss = f64::from(5 - quality.value());
        let ease_factor = (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR);
        (interval, state.repetitions.saturating_add(1), ease_factor)
    } else {
        (1, 0, ease_factor)
    };

    let next_review = today
        .checked_add_days(Days::new(u64::from(interval)))
        .ok_or_else(|| {
            Error::InvalidInput(format!("{today} + {interval} days is out of the date range"))
        })?;

    Ok(Schedule {
        interval,
        repetitions,
        ease_factor,
        next_review,
    })
}

/// floor(interval * ease), capped
fn grow(interval: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(interval) * ease_factor).floor();
    if grown >= f64::from(MAX_INTERVAL) {
        MAX_INTERVAL
    } else {
        grown as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn state(interval: u32, repetitions: u32, ease_factor: f64) -> ReviewState {
        ReviewState {
            interval,
            repetitions,
            ease_factor,
        }
    }

    #[test]
    fn first_perfect_review() {
        let s = schedule(state(0, 0, 2.5), 5, today()).unwrap();
        assert_eq!(s.interval, 1);
        assert_eq!(s.repetitions, 1);
        assert!((s.ease_factor - 2.6).abs() < EPS);
        assert_eq!(s.next_review, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn second_good_review() {
        let s = schedule(state(1, 1, 2.5), 4, today()).unwrap();
        assert_eq!(s.interval, 6);
        assert_eq!(s.repetitions, 2);
        assert!((s.ease_factor - 2.5).abs() < EPS);
        assert_eq!(s.next_review, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    }

    #[test]
    fn failed_review_resets_chain() {
        let s = schedule(state(6, 2, 2.5), 2, today()).unwrap();
        assert_eq!(s.interval, 1);
        assert_eq!(s.repetitions, 0);
        assert_eq!(s.ease_factor, 2.5);
        assert_eq!(s.next_review, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn hard_review_multiplies_interval() {
        let s = schedule(state(6, 3, 2.5), 3, today()).unwrap();
        assert_eq!(s.interval, 15);
        assert_eq!(s.repetitions, 4);
        assert!(s.ease_factor < 2.5);
        assert!((s.ease_factor - 2.36).abs() < EPS);
        assert_eq!(s.next_review, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    }

    #[test]
    fn interval_is_floored() {
        // 7 * 2.36 = 16.52
        let s = schedule(state(7, 4, 2.36), 4, today()).unwrap();
        assert_eq!(s.interval, 16);
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        for q in [0, 6, 255] {
            assert!(matches!(
                schedule(state(0, 0, 2.5), q, today()),
                Err(Error::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn ease_factor_never_below_minimum() {
        let mut st = state(10, 5, MIN_EASE_FACTOR);
        for _ in 0..20 {
            let s = schedule(st, 3, today()).unwrap();
            assert!(s.ease_factor >= MIN_EASE_FACTOR);
            st = s.state();
        }
        assert_eq!(st.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn ease_below_minimum_on_input_is_lifted() {
        let s = schedule(state(6, 0, 1.0), 1, today()).unwrap();
        assert_eq!(s.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn ease_factor_is_not_capped() {
        let mut st = ReviewState::default();
        for _ in 0..10 {
            st = schedule(st, 5, today()).unwrap().state();
        }
        assert!((st.ease_factor - 3.5).abs() < 1e-6);
    }

    #[test]
    fn properties_hold_over_all_inputs() {
        let eases = [1.3, 1.7, 2.0, 2.5, 2.9, 3.4];
        for interval in [0u32, 1, 2, 6, 15, 40, 365] {
            for repetitions in [0u32, 1, 2, 3, 10] {
                for ease in eases {
                    for quality in Quality::ALL {
                        let before = state(interval, repetitions, ease);
                        let s = next_schedule(before, quality, today()).unwrap();

                        assert!(s.ease_factor >= MIN_EASE_FACTOR);
                        assert_eq!(s.next_review, today() + Days::new(u64::from(s.interval)));
                        assert_eq!(s, next_schedule(before, quality, today()).unwrap());

                        if !quality.is_pass() {
                            assert_eq!((s.interval, s.repetitions), (1, 0));
                            assert_eq!(s.ease_factor, ease);
                            continue;
                        }
                        assert_eq!(s.repetitions, repetitions + 1);
                        let expected = match repetitions {
                            0 => 1,
                            1 => 6,
                            _ => ((f64::from(interval) * ease).floor() as u32).min(MAX_INTERVAL),
                        };
                        assert_eq!(s.interval, expected);
                    }
                }
            }
        }
    }

    #[test]
    fn huge_interval_is_capped() {
        let s = schedule(state(100_000_000, 2, 2.5), 4, today()).unwrap();
        assert_eq!(s.interval, MAX_INTERVAL);
        assert_eq!(s.next_review, today() + Days::new(u64::from(MAX_INTERVAL)));

        let s = schedule(state(u32::MAX, u32::MAX, 3.0), 5, today()).unwrap();
        assert_eq!(s.interval, MAX_INTERVAL);
        assert_eq!(s.repetitions, u32::MAX);
    }

    #[test]
    fn perfect_reviews_settle_at_max_interval() {
        let mut st = ReviewState::default();
        for _ in 0..100 {
            let s = schedule(st, 5, today()).unwrap();
            assert!(s.interval <= MAX_INTERVAL);
            st = s.state();
        }
        assert_eq!(st.interval, MAX_INTERVAL);
        assert_eq!(st.repetitions, 100);
    }

    #[test]
    fn date_overflow_is_an_error() {
        let s = schedule(state(6, 3, 2.5), 4, NaiveDate::MAX);
        assert!(matches!(s, Err(Error::InvalidInput(_))));
        // a failed recall still needs one more day
        let s = schedule(state(6, 3, 2.5), 1, NaiveDate::MAX);
        assert!(matches!(s, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn quality_labels() {
        let labels: Vec<_> = Quality::ALL.iter().map(|q| q.label()).collect();
        assert_eq!(labels, ["Blackout", "Wrong", "Hard", "Good", "Perfect"]);
        assert!(!Quality::new(2).unwrap().is_pass());
        assert!(Quality::new(3).unwrap().is_pass());
    }
}
