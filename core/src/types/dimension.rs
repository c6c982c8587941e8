// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::ops;

/// Number of base dimensions tracked by the dimension vector.
pub const DIMENSION_COUNT: usize = 7;

/// Names of the base axes, in dataset order.
pub const AXIS_NAMES: [&str; DIMENSION_COUNT] = [
    "mass",
    "length",
    "time",
    "plane angle",
    "temperature",
    "electric charge",
    "luminous intensity",
];

/// The dimension of a unit: integer exponents over the seven base axes,
/// in the order mass, length, time, plane angle, temperature, electric
/// charge, luminous intensity.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[serde(transparent)]
pub struct Dimension {
    exponents: [i32; DIMENSION_COUNT],
}

impl Dimension {
    /// The zero vector, i.e. dimensionless.
    pub fn zero() -> Dimension {
        Dimension::default()
    }

    /// A vector with a single axis set to 1.
    pub fn base_axis(axis: usize) -> Dimension {
        let mut value = Dimension::zero();
        value.exponents[axis] = 1;
        value
    }

    pub fn from_exponents(exponents: [i32; DIMENSION_COUNT]) -> Dimension {
        Dimension { exponents }
    }

    pub fn exponent(&self, axis: usize) -> i32 {
        self.exponents[axis]
    }

    pub fn is_zero(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiplies every component by an integer, for exponentiation.
    pub fn power(&self, n: i32) -> Dimension {
        let mut exponents = self.exponents;
        for e in exponents.iter_mut() {
            *e *= n;
        }
        Dimension { exponents }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.exponents
            .iter()
            .enumerate()
            .map(|(axis, &e)| (axis, e))
    }
}

impl ops::Add for Dimension {
    type Output = Dimension;

    fn add(self, rhs: Dimension) -> Dimension {
        let mut exponents = self.exponents;
        for (e, r) in exponents.iter_mut().zip(rhs.exponents.iter()) {
            *e += r;
        }
        Dimension { exponents }
    }
}

impl ops::Sub for Dimension {
    type Output = Dimension;

    fn sub(self, rhs: Dimension) -> Dimension {
        let mut exponents = self.exponents;
        for (e, r) in exponents.iter_mut().zip(rhs.exponents.iter()) {
            *e -= r;
        }
        Dimension { exponents }
    }
}

impl ops::Neg for Dimension {
    type Output = Dimension;

    fn neg(self) -> Dimension {
        let mut exponents = self.exponents;
        for e in exponents.iter_mut() {
            *e = -*e;
        }
        Dimension { exponents }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "[")?;
        for (axis, e) in self.exponents.iter().enumerate() {
            if axis > 0 {
                write!(fmt, ",")?;
            }
            write!(fmt, "{}", e)?;
        }
        write!(fmt, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn componentwise_ops() {
        let force = Dimension::from_exponents([1, 1, -2, 0, 0, 0, 0]);
        let mass = Dimension::base_axis(0);
        let accel = Dimension::from_exponents([0, 1, -2, 0, 0, 0, 0]);
        assert_eq!(mass + accel, force);
        assert_eq!(force - mass, accel);
        assert_eq!(-accel, Dimension::from_exponents([0, -1, 2, 0, 0, 0, 0]));
    }

    #[test]
    fn power_scales_every_axis() {
        let speed = Dimension::from_exponents([0, 1, -1, 0, 0, 0, 0]);
        assert_eq!(
            speed.power(3),
            Dimension::from_exponents([0, 3, -3, 0, 0, 0, 0])
        );
        assert!(speed.power(0).is_zero());
    }

    #[test]
    fn zero_test() {
        assert!(Dimension::zero().is_zero());
        assert!(!Dimension::base_axis(4).is_zero());
    }
}
