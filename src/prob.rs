//!
//! probability calculation in log space
//! implements logaddexp
//!
//! Used by the log-space forward/backward variant and for reporting
//! likelihoods of sequences and corpora.
//!
use serde_with::SerializeDisplay;

///
/// Wrapper of f64 that represents probability `0 <= p <= 1`
/// by storing `ln p`.
///
/// Serialized as its `Display` form `ln p(p)`.
///
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, SerializeDisplay)]
pub struct Prob(f64);

///
/// short-hand of `Prob::from_prob`
///
pub fn p(p: f64) -> Prob {
    Prob::from_prob(p)
}

impl Prob {
    pub fn from_prob(value: f64) -> Prob {
        Prob(value.ln())
    }
    ///
    /// Get the probability (in `[0, 1]`)
    pub fn to_value(self) -> f64 {
        self.0.exp()
    }
    ///
    /// Get the log probability
    pub fn to_log_value(self) -> f64 {
        self.0
    }
    ///
    /// Is `p == 0` or not? (log p = -inf)
    ///
    pub fn is_zero(self) -> bool {
        self.0.is_infinite() && self.0.is_sign_negative()
    }
    ///
    /// prob=0.0
    ///
    pub fn zero() -> Prob {
        Prob(f64::NEG_INFINITY)
    }
    ///
    /// prob=1.0
    ///
    pub fn one() -> Prob {
        Prob(0.0)
    }
}

// display
impl std::fmt::Display for Prob {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({:.4})", self.0, self.to_value())
    }
}

/// Addition of two probabilities `px + py` in log space
///
/// If `px > py`:
///
/// ```text
/// log(exp(x) + exp(y))
///  = x + log(1 + exp(y-x))
/// ```
impl std::ops::Add for Prob {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let (x, y) = if self.0 >= other.0 {
            (self.0, other.0)
        } else {
            (other.0, self.0)
        };
        if y == f64::NEG_INFINITY {
            Prob(x)
        } else {
            Prob(x + (y - x).exp().ln_1p())
        }
    }
}

/// Multiplication `px * py`, i.e. `log px + log py`
impl std::ops::Mul for Prob {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Prob(self.0 + other.0)
    }
}

/// Division `px / py`, i.e. `log px - log py`
impl std::ops::Div for Prob {
    type Output = Self;
    fn div(self, other: Self) -> Self {
        Prob(self.0 - other.0)
    }
}

impl std::ops::MulAssign for Prob {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

// sum/prod
impl std::iter::Sum for Prob {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Prob::zero(), |a, b| a + b)
    }
}
impl<'a> std::iter::Sum<&'a Self> for Prob {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Prob::zero(), |a, b| a + *b)
    }
}
impl<'a> std::iter::Product<&'a Self> for Prob {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Prob::one(), |a, b| a * *b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prob_identity() {
        let x = p(0.3);
        let e = p(0.0);
        assert_relative_eq!((x + e).0, x.0);
        assert!((x * e).is_zero());
        assert_eq!(x * Prob::one(), x);
    }
    #[test]
    fn prob_sum_prod() {
        let xs = vec![p(0.1), p(0.1), p(0.1)];
        let sum: Prob = xs.iter().sum();
        let product: Prob = xs.iter().product();
        assert_relative_eq!(sum.to_value(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(product.to_value(), 0.001, epsilon = 1e-12);

        // sum/prod of zero element vec
        let xs: Vec<Prob> = vec![];
        let sum: Prob = xs.iter().sum();
        let product: Prob = xs.iter().product();
        assert!(sum.is_zero());
        assert_eq!(product, Prob::one());
    }
    #[test]
    fn prob_add_mul_div() {
        assert_eq!(p(0.0) + p(1.0), p(1.0));
        assert_eq!(p(0.0) * p(1.0), p(0.0));
        assert_abs_diff_eq!((p(0.3) + p(0.3)).0, p(0.6).0, epsilon = 1e-12);
        assert_abs_diff_eq!((p(0.3) * p(0.3)).0, p(0.09).0, epsilon = 1e-12);
        assert_abs_diff_eq!((p(0.5) + p(0.00001)).0, p(0.50001).0, epsilon = 1e-12);
        assert_abs_diff_eq!((p(0.6) / p(0.3)).0, p(2.0).0, epsilon = 1e-12);
        let mut x = p(0.6);
        x *= p(0.5);
        assert_abs_diff_eq!(x.to_value(), 0.3, epsilon = 1e-12);
    }
    #[test]
    fn prob_zero_one() {
        assert_eq!(Prob::one(), p(1.0));
        assert_eq!(Prob::zero(), p(0.0));
        assert!(Prob::zero().is_zero());
        assert!(!p(0.00001).is_zero());
        // logaddexp of two zeros
        assert!((Prob::zero() + Prob::zero()).is_zero());
    }
    #[test]
    fn prob_serialize_as_display() {
        assert_eq!(
            serde_json::to_string(&Prob::one()).unwrap(),
            "\"0(1.0000)\""
        );
        assert_eq!(
            serde_json::to_string(&Prob::zero()).unwrap(),
            "\"-inf(0.0000)\""
        );
    }
}
