//! Capability inventory — which outputs a model supports or a caller wants.
//!
//! The same type plays both roles. A model publishes its supported set, a
//! caller passes a requested set, and the estimate is filled with exactly
//! `requested ∧ supported`. Unsupported requests are dropped without error.
//!
//! Flags are exchanged in a fixed order:
//! `parameters, covariance, confidence, predicted, residuals,
//! log_likelihood, names`.
use std::{ops::BitAnd, str::FromStr};

use crate::optimization::errors::{OptError, OptResult};

/// Seven named output flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Inventory {
    pub parameters: bool,
    pub covariance: bool,
    pub confidence: bool,
    pub predicted: bool,
    pub residuals: bool,
    pub log_likelihood: bool,
    pub names: bool,
}

impl Inventory {
    /// Flag names in exchange order.
    pub const FIELD_NAMES: [&'static str; 7] = [
        "parameters",
        "covariance",
        "confidence",
        "predicted",
        "residuals",
        "log_likelihood",
        "names",
    ];

    pub const fn all() -> Self {
        Self {
            parameters: true,
            covariance: true,
            confidence: true,
            predicted: true,
            residuals: true,
            log_likelihood: true,
            names: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            parameters: false,
            covariance: false,
            confidence: false,
            predicted: false,
            residuals: false,
            log_likelihood: false,
            names: false,
        }
    }

    /// `self ∧ supported`, flag by flag.
    pub const fn filter(self, supported: Inventory) -> Self {
        Self {
            parameters: self.parameters && supported.parameters,
            covariance: self.covariance && supported.covariance,
            confidence: self.confidence && supported.confidence,
            predicted: self.predicted && supported.predicted,
            residuals: self.residuals && supported.residuals,
            log_likelihood: self.log_likelihood && supported.log_likelihood,
            names: self.names && supported.names,
        }
    }

    /// Flags in exchange order.
    pub const fn flags(self) -> [bool; 7] {
        [
            self.parameters,
            self.covariance,
            self.confidence,
            self.predicted,
            self.residuals,
            self.log_likelihood,
            self.names,
        ]
    }

    pub const fn from_flags(flags: [bool; 7]) -> Self {
        Self {
            parameters: flags[0],
            covariance: flags[1],
            confidence: flags[2],
            predicted: flags[3],
            residuals: flags[4],
            log_likelihood: flags[5],
            names: flags[6],
        }
    }

    /// Bit `i` is the `i`-th flag in exchange order; bits above 6 are
    /// ignored.
    pub fn from_bits(bits: u8) -> Self {
        let mut flags = [false; 7];
        for (i, flag) in flags.iter_mut().enumerate() {
            *flag = bits & (1 << i) != 0;
        }
        Self::from_flags(flags)
    }

    pub fn bits(self) -> u8 {
        self.flags().iter().enumerate().fold(0, |acc, (i, &f)| acc | (u8::from(f) << i))
    }

    /// Build an inventory with exactly the named flags set.
    ///
    /// # Errors
    /// - `OptError::UnknownInventoryFlag` for a name outside
    ///   [`Inventory::FIELD_NAMES`] (matched case-insensitively).
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> OptResult<Self> {
        let mut flags = [false; 7];
        for name in names {
            let lowered = name.trim().to_lowercase();
            let pos = Self::FIELD_NAMES
                .iter()
                .position(|field| *field == lowered)
                .ok_or_else(|| OptError::UnknownInventoryFlag { name: name.to_string() })?;
            flags[pos] = true;
        }
        Ok(Self::from_flags(flags))
    }

    /// Names of the set flags, in exchange order.
    pub fn enabled(self) -> impl Iterator<Item = &'static str> {
        Self::FIELD_NAMES.into_iter().zip(self.flags()).filter_map(|(n, f)| f.then_some(n))
    }
}

impl BitAnd for Inventory {
    type Output = Inventory;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.filter(rhs)
    }
}

/// Comma-separated flag names, e.g. `"parameters, covariance"`.
impl FromStr for Inventory {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_names(s.split(',').map(str::trim).filter(|n| !n.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Filtering is a flag-wise AND, exposed both as a method and `&`.
    //
    // Given
    // -----
    // - request = {parameters, covariance, predicted}
    // - support = {parameters, covariance, confidence, log_likelihood}
    //
    // Expect
    // ------
    // - {parameters, covariance}.
    fn filter_is_flagwise_and() {
        // Arrange
        let request: Inventory = "parameters, covariance, predicted".parse().expect("valid names");
        let support = Inventory {
            parameters: true,
            covariance: true,
            confidence: true,
            log_likelihood: true,
            ..Inventory::none()
        };

        // Act
        let filtered = request.filter(support);

        // Assert
        assert_eq!(filtered, request & support);
        assert_eq!(filtered.enabled().collect::<Vec<_>>(), vec!["parameters", "covariance"]);
    }

    #[test]
    // Purpose
    // -------
    // Bit encoding follows exchange order and covers all 2⁷ combinations.
    //
    // Given
    // -----
    // - Every `bits` in 0..128.
    //
    // Expect
    // ------
    // - `from_bits(bits).bits() == bits`, and bit 0 is `parameters`.
    fn bits_follow_exchange_order() {
        for bits in 0u8..128 {
            assert_eq!(Inventory::from_bits(bits).bits(), bits);
        }
        assert!(Inventory::from_bits(1).parameters);
        assert!(Inventory::from_bits(1 << 6).names);
        assert_eq!(Inventory::all().bits(), 0x7f);
    }

    #[test]
    // Purpose
    // -------
    // Unknown names are rejected with the offending name.
    //
    // Given
    // -----
    // - ["parameters", "bogus"].
    //
    // Expect
    // ------
    // - `Err(UnknownInventoryFlag { name: "bogus" })`.
    fn unknown_flag_names_are_rejected() {
        let err = Inventory::from_names(["parameters", "bogus"]).expect_err("bogus should fail");
        assert_eq!(err, OptError::UnknownInventoryFlag { name: "bogus".into() });
    }
}
