//! Quadratic extension GF(p²) = GF(p)[i]/(i² + 2).
//!
//! −2 is the standard's quadratic non-residue for this prime (p ≡ 1 mod 4,
//! so i² = −1 would be reducible). An element is `x·i + y`. The cubic
//! non-residue used by the next tower level is ξ = i⁻¹ = −i/2, which makes
//! the twist equation y² = x³ + 5i exactly y² = x³ + 5/ξ.

use crate::arithmetic::field::FieldElement;
use core::fmt::{self, Debug};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Element of the quadratic extension field, `x·i + y`.
#[derive(Clone, Copy, Default)]
pub struct Fp2 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

impl Fp2 {
    /// The additive identity.
    pub const ZERO: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
    };

    /// The multiplicative identity.
    pub const ONE: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
    };

    pub(crate) const fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }

    /// Determine if this element is zero.
    pub fn is_zero(&self) -> Choice {
        self.x.is_zero() & self.y.is_zero()
    }

    /// Returns `self + rhs`.
    pub const fn add(&self, rhs: &Self) -> Self {
        Self {
            x: self.x.add(&rhs.x),
            y: self.y.add(&rhs.y),
        }
    }

    /// Returns `self - rhs`.
    pub const fn sub(&self, rhs: &Self) -> Self {
        Self {
            x: self.x.sub(&rhs.x),
            y: self.y.sub(&rhs.y),
        }
    }

    /// Returns `2 * self`.
    pub const fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `-self`.
    pub const fn neg(&self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y.neg(),
        }
    }

    /// Returns the conjugate `-x·i + y`, which is also the p-power Frobenius
    /// (i^p = -i since -2 is a non-residue).
    pub const fn conjugate(&self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y,
        }
    }

    /// Returns `self * rhs` by Karatsuba over the two coordinates,
    /// reducing with i² = -2.
    pub const fn mul(&self, rhs: &Self) -> Self {
        let v0 = self.x.mul(&rhs.x);
        let v1 = self.y.mul(&rhs.y);
        let tx = self
            .x
            .add(&self.y)
            .mul(&rhs.x.add(&rhs.y))
            .sub(&v0)
            .sub(&v1);
        let ty = v1.sub(&v0.double());
        Self { x: tx, y: ty }
    }

    /// Returns `self * self`.
    pub const fn square(&self) -> Self {
        // (xi + y)² = 2xy·i + (y² - 2x²)
        let tx = self.x.mul(&self.y).double();
        let ty = self.y.square().sub(&self.x.square().double());
        Self { x: tx, y: ty }
    }

    /// Returns `self * k` for a base-field scalar.
    pub(crate) const fn mul_scalar(&self, k: &FieldElement) -> Self {
        Self {
            x: self.x.mul(k),
            y: self.y.mul(k),
        }
    }

    /// Returns `self * ξ` where ξ = i⁻¹: `(x·i + y)·ξ = -(y/2)·i + x`.
    pub(crate) const fn mul_xi(&self) -> Self {
        Self {
            x: self.y.half().neg(),
            y: self.x,
        }
    }

    /// Returns the multiplicative inverse, if self is non-zero.
    ///
    /// The norm y² + 2x² lies in the base field, so a single base-field
    /// inversion suffices. Variable time only in the fixed Fermat exponent.
    pub fn invert(&self) -> subtle::CtOption<Self> {
        let norm = self.y.square().add(&self.x.square().double());
        norm.invert().map(|t| Self {
            x: self.x.neg().mul(&t),
            y: self.y.mul(&t),
        })
    }
}

impl Debug for Fp2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp2({:?}*i + {:?})", self.x, self.y)
    }
}

impl ConditionallySelectable for Fp2 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl ConstantTimeEq for Fp2 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

impl Eq for Fp2 {}

impl PartialEq for Fp2 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

#[cfg(test)]
mod tests {
    use super::Fp2;
    use crate::arithmetic::field::FieldElement;

    fn sample() -> (Fp2, Fp2) {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        for i in 0..32 {
            a[i] = i as u8;
            b[i] = 0x40 ^ (31 - i) as u8;
        }
        let fa = FieldElement::from_bytes(&a).unwrap();
        let fb = FieldElement::from_bytes(&b).unwrap();
        (Fp2::new(fa, fb), Fp2::new(fb, fa.square()))
    }

    #[test]
    fn field_laws() {
        let (a, b) = sample();
        assert_eq!(a.add(&b), b.add(&a));
        assert_eq!(a.mul(&b), b.mul(&a));
        assert_eq!(a.sub(&a), Fp2::ZERO);
        assert_eq!(a.square(), a.mul(&a));
        assert_eq!(a.mul(&Fp2::ONE), a);
    }

    #[test]
    fn inversion() {
        let (a, _) = sample();
        assert_eq!(a.mul(&a.invert().unwrap()), Fp2::ONE);
        assert!(bool::from(Fp2::ZERO.invert().is_none()));
    }

    #[test]
    fn xi_is_inverse_of_i() {
        // ξ * i == 1
        let i = Fp2::new(FieldElement::ONE, FieldElement::ZERO);
        assert_eq!(i.mul_xi(), Fp2::ONE);
    }

    #[test]
    fn conjugate_is_frobenius() {
        let (a, _) = sample();
        // a^p via conjugation must square-commute: conj(conj(a)) == a
        assert_eq!(a.conjugate().conjugate(), a);
        // norm = a * conj(a) lies in the base field
        let n = a.mul(&a.conjugate());
        assert_eq!(n.x, FieldElement::ZERO);
    }
}
