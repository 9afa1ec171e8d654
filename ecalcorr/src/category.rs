//! Range categories used as keys of the correction tables.
//!
//! A [`CategoryKey`] describes a box in (run, |η|, R9, E<sub>T</sub>, gain) space. Table rows
//! are boxes, measurements are degenerate boxes (points), and a lookup succeeds when the point
//! is *equivalent* to a row, i.e. neither orders before the other. Gain `0` is a wildcard.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// An inclusive interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval<T> {
    /// Lower bound.
    pub min: T,
    /// Upper bound.
    pub max: T,
}

impl<T: Copy> Interval<T> {
    /// Constructor.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Interval containing the single value `value`.
    pub const fn point(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

// `Some(true)` if `a` orders before `b`, `Some(false)` if after, `None` if they overlap
fn interval_order<T: PartialOrd>(a: &Interval<T>, b: &Interval<T>) -> Option<bool> {
    if a.min < b.min && a.max < b.max {
        Some(true)
    } else if a.max > b.max && a.min > b.min {
        Some(false)
    } else {
        None
    }
}

/// Multi-dimensional range descriptor mapping measurements to corrections.
#[derive(Clone, Copy, Debug)]
pub struct CategoryKey {
    runs: Interval<u32>,
    position: Interval<f64>,
    shape: Interval<f64>,
    energy: Interval<f64>,
    gain: u32,
}

impl CategoryKey {
    /// Creates a key from explicit intervals. A `gain` of `0` matches every gain.
    #[must_use]
    pub const fn new(
        runs: Interval<u32>,
        position: Interval<f64>,
        shape: Interval<f64>,
        energy: Interval<f64>,
        gain: u32,
    ) -> Self {
        Self {
            runs,
            position,
            shape,
            energy,
            gain,
        }
    }

    /// Creates the key of a single measurement. The position is used as absolute value.
    #[must_use]
    pub fn from_point(run: u32, position: f64, shape: f64, energy: f64, gain: u32) -> Self {
        Self {
            runs: Interval::point(run),
            position: Interval::point(position.abs()),
            shape: Interval::point(shape),
            energy: Interval::point(energy),
            gain,
        }
    }

    /// Builds a key from a category label such as `absEta_0_1-R9_0.94_1-Et_20_30-gainEle_12`.
    /// Markers that are not present leave the corresponding default in place; see
    /// [`LABEL_RULES`] for the order in which the label is interpreted.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let mut key = Self::default();

        for rule in LABEL_RULES {
            rule(label, &mut key);
        }

        key
    }

    /// Returns a copy of this key with the run range replaced.
    #[must_use]
    pub const fn with_runs(mut self, min: u32, max: u32) -> Self {
        self.runs = Interval::new(min, max);
        self
    }

    /// Run-number range.
    #[must_use]
    pub const fn runs(&self) -> Interval<u32> {
        self.runs
    }

    /// Range of the absolute pseudo-rapidity.
    #[must_use]
    pub const fn position(&self) -> Interval<f64> {
        self.position
    }

    /// Range of the shower-shape variable R9.
    #[must_use]
    pub const fn shape(&self) -> Interval<f64> {
        self.shape
    }

    /// Range of the transverse energy.
    #[must_use]
    pub const fn energy(&self) -> Interval<f64> {
        self.energy
    }

    /// Gain tag; `0` is the wildcard.
    #[must_use]
    pub const fn gain(&self) -> u32 {
        self.gain
    }

    /// Strict weak ordering of categories: dimensions are compared in the order run, position,
    /// shape and energy; overlapping intervals defer to the next dimension. If all intervals
    /// overlap, the key orders before `other` only if both gains are non-zero and its gain is
    /// smaller.
    #[must_use]
    pub fn less(&self, other: &Self) -> bool {
        if let Some(less) = interval_order(&self.runs, &other.runs)
            .or_else(|| interval_order(&self.position, &other.position))
            .or_else(|| interval_order(&self.shape, &other.shape))
            .or_else(|| interval_order(&self.energy, &other.energy))
        {
            return less;
        }

        if self.gain == 0 || other.gain == 0 {
            return false;
        }

        self.gain < other.gain
    }
}

impl Default for CategoryKey {
    fn default() -> Self {
        Self {
            runs: Interval::new(0, 999_999),
            position: Interval::new(2.0, 7.0),
            shape: Interval::new(-1.0, f64::INFINITY),
            energy: Interval::new(-1.0, 99_999.0),
            gain: 0,
        }
    }
}

impl Ord for CategoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.less(other) {
            Ordering::Less
        } else if other.less(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl PartialOrd for CategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CategoryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CategoryKey {}

impl Display for CategoryKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "runs {} |eta| {} R9 {} Et {} gain {}",
            self.runs, self.position, self.shape, self.energy, self.gain
        )
    }
}

/// A rule interpreting one aspect of a category label.
pub type LabelRule = fn(&str, &mut CategoryKey);

/// Rules applied by [`CategoryKey::from_label`], in this order.
pub const LABEL_RULES: [LabelRule; 7] = [
    position_rule,
    snap_rule,
    region_rule,
    energy_rule,
    shape_keyword_rule,
    shape_range_rule,
    gain_rule,
];

const POSITION_ALIASES: [(&str, Interval<f64>); 4] = [
    ("absEta_0_1", Interval::new(0.0, 1.0)),
    ("absEta_1_1.4442", Interval::new(1.0, 1.479)),
    ("absEta_1.566_2", Interval::new(1.479, 2.0)),
    ("absEta_2_2.5", Interval::new(2.0, 3.0)),
];

const REGION_ALIASES: [(&str, Interval<f64>); 4] = [
    ("EBlowEta", Interval::new(0.0, 1.0)),
    ("EBhighEta", Interval::new(1.0, 1.479)),
    ("EElowEta", Interval::new(1.479, 2.0)),
    ("EEhighEta", Interval::new(2.0, 7.0)),
];

const HIGH_QUALITY: [&str; 3] = ["gold", "Gold", "highR9"];
const LOW_QUALITY: [&str; 3] = ["bad", "Bad", "lowR9"];

/// Boundary between barrel and endcap; bounds inside the crack are moved onto it.
const CRACK: Interval<f64> = Interval::new(1.4442, 1.566);
const CRACK_BOUNDARY: f64 = 1.479;

const R9_THRESHOLD: f64 = 0.94;

/// Parses the longest numeric prefix of `text`, ignoring leading whitespace. Returns `0` if
/// there is none.
fn leading_float(text: &str) -> f64 {
    let text = text.trim_start();

    (1..=text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse().ok())
        .unwrap_or(0.0)
}

/// Reads `<lo>_<hi>` following the first `_` at or after `marker`. The lower field ends at the
/// next `_` or `-`, the upper one at the next `-`. The upper bound is only returned if the lower
/// field was terminated by `_`.
fn range_after(label: &str, marker: &str) -> Option<(f64, Option<f64>)> {
    let start = label.find(marker)?;
    let underscore = start + label[start..].find('_')?;
    let rest = &label[underscore + 1..];

    match rest.find(['_', '-']) {
        Some(end) if rest[end..].starts_with('_') => {
            let upper = &rest[end + 1..];
            let upper = upper.find('-').map_or(upper, |stop| &upper[..stop]);
            Some((leading_float(&rest[..end]), Some(leading_float(upper))))
        }
        Some(end) => Some((leading_float(&rest[..end]), None)),
        None => Some((leading_float(rest), None)),
    }
}

fn position_rule(label: &str, key: &mut CategoryKey) {
    if let Some((_, interval)) = POSITION_ALIASES
        .iter()
        .find(|(alias, _)| label.contains(alias))
    {
        key.position = *interval;
    } else if let Some((min, max)) = range_after(label, "absEta_") {
        key.position.min = min;
        if let Some(max) = max {
            key.position.max = max;
        }
    }
}

fn snap_rule(_: &str, key: &mut CategoryKey) {
    let in_crack = |value: f64| value >= CRACK.min && value <= CRACK.max;

    if in_crack(key.position.max) {
        key.position.max = CRACK_BOUNDARY;
    }
    if in_crack(key.position.min) {
        key.position.min = CRACK_BOUNDARY;
    }
}

fn region_rule(label: &str, key: &mut CategoryKey) {
    for (alias, interval) in REGION_ALIASES {
        if label.contains(alias) {
            key.position = interval;
        }
    }
}

fn energy_rule(label: &str, key: &mut CategoryKey) {
    if let Some((min, max)) = range_after(label, "-Et_") {
        key.energy.min = min;
        if let Some(max) = max {
            key.energy.max = max;
        }
    }
}

fn shape_keyword_rule(label: &str, key: &mut CategoryKey) {
    if HIGH_QUALITY.iter().any(|keyword| label.contains(keyword)) {
        key.shape = Interval::new(R9_THRESHOLD, f64::INFINITY);
    } else if LOW_QUALITY.iter().any(|keyword| label.contains(keyword)) {
        key.shape = Interval::new(-1.0, R9_THRESHOLD);
    }
}

fn shape_range_rule(label: &str, key: &mut CategoryKey) {
    if let Some((min, max)) = range_after(label, "-R9") {
        key.shape.min = min;
        if let Some(max) = max {
            // an upper edge of one means "no upper edge"
            #[allow(clippy::float_cmp)]
            let unbounded = max == 1.0;
            key.shape.max = if unbounded { f64::INFINITY } else { max };
        }
    }
}

fn gain_rule(label: &str, key: &mut CategoryKey) {
    const MARKER: &str = "gainEle_";

    if let Some(start) = label.find(MARKER) {
        let digits: String = label[start + MARKER.len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();

        if let Ok(gain) = digits.parse() {
            key.gain = gain;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn leading_float_prefixes() {
        assert_eq!(leading_float("1.4442"), 1.4442);
        assert_eq!(leading_float(" 20abc"), 20.0);
        assert_eq!(leading_float("abc"), 0.0);
        assert_eq!(leading_float(""), 0.0);
    }

    #[test]
    fn label_defaults() {
        let key = CategoryKey::from_label("something");
        assert_eq!(key.runs(), Interval::new(0, 999_999));
        assert_eq!(key.position(), Interval::new(2.0, 7.0));
        assert_eq!(key.shape(), Interval::new(-1.0, f64::INFINITY));
        assert_eq!(key.energy(), Interval::new(-1.0, 99_999.0));
        assert_eq!(key.gain(), 0);
    }

    #[test]
    fn label_position_aliases() {
        assert_eq!(
            CategoryKey::from_label("absEta_1_1.4442-gold").position(),
            Interval::new(1.0, 1.479)
        );
        assert_eq!(
            CategoryKey::from_label("absEta_1.566_2-bad").position(),
            Interval::new(1.479, 2.0)
        );
        assert_eq!(
            CategoryKey::from_label("absEta_2_2.5-bad").position(),
            Interval::new(2.0, 3.0)
        );
    }

    #[test]
    fn label_generic_position_and_snap() {
        assert_eq!(
            CategoryKey::from_label("absEta_0.5_0.8-R9_0.94_1").position(),
            Interval::new(0.5, 0.8)
        );
        assert_eq!(
            CategoryKey::from_label("absEta_1.2_1.5-gold").position(),
            Interval::new(1.2, 1.479)
        );
        assert_eq!(
            CategoryKey::from_label("absEta_1.5_2.5-gold").position(),
            Interval::new(1.479, 2.5)
        );
    }

    #[test]
    fn label_region_overrides_numeric_position() {
        let key = CategoryKey::from_label("EBlowEta-absEta_1.2_1.3-Gold");
        assert_eq!(key.position(), Interval::new(0.0, 1.0));

        let key = CategoryKey::from_label("EEhighEta_absEta_0_1");
        assert_eq!(key.position(), Interval::new(2.0, 7.0));
    }

    #[test]
    fn label_energy() {
        let key = CategoryKey::from_label("absEta_0_1-Et_20_30-gainEle_12");
        assert_eq!(key.energy(), Interval::new(20.0, 30.0));
        assert_eq!(key.gain(), 12);

        let key = CategoryKey::from_label("absEta_0_1-Et_45");
        assert_eq!(key.energy(), Interval::new(45.0, 99_999.0));

        let key = CategoryKey::from_label("absEta_0_1-Et_45-gainEle_6");
        assert_eq!(key.energy(), Interval::new(45.0, 99_999.0));
        assert_eq!(key.gain(), 6);
    }

    #[test]
    fn label_shape() {
        assert_eq!(
            CategoryKey::from_label("EBlowEtaGold8TeV").shape(),
            Interval::new(0.94, f64::INFINITY)
        );
        assert_eq!(
            CategoryKey::from_label("EBlowEtaBad8TeV").shape(),
            Interval::new(-1.0, 0.94)
        );
        // numeric ranges take precedence over keywords
        assert_eq!(
            CategoryKey::from_label("absEta_0_1-bad-R9_0.5_0.8").shape(),
            Interval::new(0.5, 0.8)
        );
        assert_eq!(
            CategoryKey::from_label("absEta_0_1-R9_0.96_1").shape(),
            Interval::new(0.96, f64::INFINITY)
        );
        assert_eq!(
            CategoryKey::from_label("absEta_0_1-R9_0.96").shape(),
            Interval::new(0.96, f64::INFINITY)
        );
    }

    #[test]
    fn ordering_of_disjoint_ranges() {
        let low = CategoryKey::from_label("absEta_0_1").with_runs(0, 100);
        let high = CategoryKey::from_label("absEta_0_1").with_runs(101, 200);

        assert!(low.less(&high));
        assert!(!high.less(&low));
        assert_eq!(low.cmp(&high), Ordering::Less);
    }

    #[test]
    fn point_is_equivalent_to_containing_range() {
        let range = CategoryKey::new(
            Interval::new(100, 200),
            Interval::new(0.0, 1.0),
            Interval::new(0.94, 10.0),
            Interval::new(0.0, 100.0),
            12,
        );

        assert_eq!(CategoryKey::from_point(150, -0.5, 0.95, 40.0, 12), range);
        assert_eq!(CategoryKey::from_point(150, 0.5, 0.95, 40.0, 0), range);
        assert_ne!(CategoryKey::from_point(150, 0.5, 0.95, 40.0, 6), range);
        assert_ne!(CategoryKey::from_point(250, 0.5, 0.95, 40.0, 12), range);
        assert_ne!(CategoryKey::from_point(150, 1.2, 0.95, 40.0, 12), range);
    }

    #[test]
    fn wildcard_gain_never_orders() {
        let wildcard = CategoryKey::from_point(1, 0.5, 0.9, 30.0, 0);
        let tagged = CategoryKey::from_point(1, 0.5, 0.9, 30.0, 6);

        assert!(!wildcard.less(&tagged));
        assert!(!tagged.less(&wildcard));
        assert!(CategoryKey::from_point(1, 0.5, 0.9, 30.0, 1).less(&tagged));
    }

    #[test]
    fn lookup_in_ordered_map() {
        let mut map = BTreeMap::new();

        for (index, label) in ["EBlowEta", "EBhighEta", "EElowEta", "EEhighEta"]
            .iter()
            .enumerate()
        {
            map.insert(CategoryKey::from_label(label), index);
        }

        assert_eq!(map.len(), 4);
        assert_eq!(map.get(&CategoryKey::from_point(5, 0.3, 0.9, 30.0, 12)), Some(&0));
        assert_eq!(map.get(&CategoryKey::from_point(5, -1.3, 0.9, 30.0, 1)), Some(&1));
        assert_eq!(map.get(&CategoryKey::from_point(5, 1.7, 0.9, 30.0, 0)), Some(&2));
        assert_eq!(map.get(&CategoryKey::from_point(5, 2.4, 0.9, 30.0, 0)), Some(&3));
        assert_eq!(map.get(&CategoryKey::from_point(5, 7.5, 0.9, 30.0, 0)), None);
    }
}
