//! Compensated summation for long log-likelihood accumulations.

/// Compensated running sum, Neumaier's variant of Kahan summation.
///
/// Keeps a running compensation term so that adding many terms of very
/// different magnitude loses far less precision than a plain `+=` loop.
/// Unlike plain Kahan, the error of each step is taken from whichever
/// operand is smaller, so a term larger than the running sum is not lost.
/// The compensation is folded in by [`KahanSum::sum`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KahanSum {
    sum: f64,
    c: f64,
}

impl KahanSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.c += (self.sum - t) + value;
        } else {
            self.c += (value - t) + self.sum;
        }
        self.sum = t;
    }

    pub fn sum(self) -> f64 {
        self.sum + self.c
    }
}

impl Extend<f64> for KahanSum {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for KahanSum {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut acc = KahanSum::new();
        acc.extend(iter);
        acc
    }
}
