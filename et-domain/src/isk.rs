use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// An amount of ISK, stored as integer hundredths so that budget arithmetic is exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Isk(pub i64);

impl Isk {
    pub const ZERO: Isk = Isk(0);

    pub fn from_f64(amount: f64) -> Self {
        Isk((amount * 100.0).round() as i64)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// How many whole units at `unit_price` fit into this amount.
    pub fn affordable_units(&self, unit_price: Isk) -> u64 {
        if !self.is_positive() || !unit_price.is_positive() {
            return 0;
        }
        (self.0 / unit_price.0) as u64
    }
}

impl Add for Isk {
    type Output = Isk;

    fn add(self, other: Isk) -> Isk {
        Isk(self.0 + other.0)
    }
}

impl AddAssign for Isk {
    fn add_assign(&mut self, other: Isk) {
        self.0 += other.0;
    }
}

impl Sub for Isk {
    type Output = Isk;

    fn sub(self, other: Isk) -> Isk {
        Isk(self.0 - other.0)
    }
}

impl SubAssign for Isk {
    fn sub_assign(&mut self, other: Isk) {
        self.0 -= other.0;
    }
}

impl Neg for Isk {
    type Output = Isk;

    fn neg(self) -> Isk {
        Isk(-self.0)
    }
}

impl Mul<u64> for Isk {
    type Output = Isk;

    fn mul(self, units: u64) -> Isk {
        Isk(self.0 * units as i64)
    }
}

impl Sum for Isk {
    fn sum<I: Iterator<Item = Isk>>(iter: I) -> Isk {
        iter.fold(Isk::ZERO, |acc, isk| acc + isk)
    }
}

impl fmt::Display for Isk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ISK", self.as_f64())
    }
}
