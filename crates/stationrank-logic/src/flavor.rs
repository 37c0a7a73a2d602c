//! Cosmetic flavor text. The only place randomness is allowed.
//!
//! Scoring never takes a [`FlavorSource`]; the dashboard hands one to
//! [`crate::dashboard::UnifiedDashboard::flavor`] after all numbers are
//! fixed. Tests use [`FixedFlavor`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Picks an index into a table of `len` options.
pub trait FlavorSource {
    fn choose(&mut self, len: usize) -> usize;
}

/// Seeded pseudo-random choice.
pub struct SeededFlavor(StdRng);

impl SeededFlavor {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl FlavorSource for SeededFlavor {
    fn choose(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0.gen_range(0..len)
    }
}

/// Always the same slot, wrapped to the table length.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedFlavor(pub usize);

impl FlavorSource for FixedFlavor {
    fn choose(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.0 % len
        }
    }
}

pub fn pick<'a>(source: &mut impl FlavorSource, options: &[&'a str]) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    options.get(source.choose(options.len())).copied()
}

/// Taglines by overall progression band (0–19, 20–39, … 80–100).
static TAGLINES: [&[&str]; 5] = [
    &[
        "Every station starts with a single light.",
        "The concourse is still learning your name.",
        "Fresh off the shuttle.",
    ],
    &[
        "People are starting to nod when you pass.",
        "Your footsteps have a rhythm now.",
    ],
    &[
        "The station hums a little differently around you.",
        "Halfway to somewhere worth going.",
        "Known on more than one deck.",
    ],
    &[
        "Your name comes up in the galley.",
        "Newcomers ask where to find you.",
    ],
    &[
        "The station would feel emptier without you.",
        "A fixed star in the station sky.",
        "They tell stories about you on the night shift.",
    ],
];

static CONSTELLATION_NARRATION: &[&str] = &[
    "Tonight the viewport shows {}.",
    "Someone has traced {} on the observation glass.",
    "{} hangs over the platform.",
];

pub fn tagline(source: &mut impl FlavorSource, overall_progression: f64) -> &'static str {
    let band = if overall_progression.is_finite() {
        ((overall_progression / 20.0).floor().max(0.0) as usize).min(TAGLINES.len() - 1)
    } else {
        0
    };
    pick(source, TAGLINES[band]).unwrap_or("")
}

pub fn constellation_narration(source: &mut impl FlavorSource, constellation: &str) -> String {
    pick(source, CONSTELLATION_NARRATION)
        .map(|t| t.replace("{}", constellation))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlavorText {
    pub tagline: &'static str,
    pub narration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_flavor_wraps() {
        let mut f = FixedFlavor(4);
        assert_eq!(pick(&mut f, &["a", "b", "c"]), Some("b"));
        assert_eq!(pick(&mut f, &[]), None);
    }

    #[test]
    fn seeded_flavor_is_repeatable() {
        let mut a = SeededFlavor::new(7);
        let mut b = SeededFlavor::new(7);
        let xs: Vec<usize> = (0..16).map(|_| a.choose(5)).collect();
        let ys: Vec<usize> = (0..16).map(|_| b.choose(5)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|x| *x < 5));
    }

    #[test]
    fn tagline_bands() {
        let mut f = FixedFlavor(0);
        assert_eq!(tagline(&mut f, 0.0), TAGLINES[0][0]);
        assert_eq!(tagline(&mut f, 45.0), TAGLINES[2][0]);
        assert_eq!(tagline(&mut f, 100.0), TAGLINES[4][0]);
        assert_eq!(tagline(&mut f, f64::NAN), TAGLINES[0][0]);
    }

    #[test]
    fn narration_names_the_constellation() {
        let line = constellation_narration(&mut FixedFlavor(2), "Lyre");
        assert_eq!(line, "Lyre hangs over the platform.");
    }
}
