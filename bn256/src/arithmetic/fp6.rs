//! Cubic extension GF(p⁶) = GF(p²)[v]/(v³ − ξ), ξ = i⁻¹.
//!
//! An element is `x·v² + y·v + z` with coefficients in GF(p²).

use crate::arithmetic::{field::FieldElement, fp2::Fp2};
use core::fmt::{self, Debug};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// ξ^((p−1)/3). All ξ-power Frobenius constants of this tower are real, so
/// they are stored as base-field scalars.
pub(crate) const XI_PM1O3: FieldElement = FieldElement([
    0x646a_4b5a_4e67_83b9,
    0xd5e4_017f_8d98_0f9d,
    0x8d8b_f6fd_0cdf_e790,
    0x2d4a_c18b_775a_8f7b,
]);

/// ξ^(2(p−1)/3).
pub(crate) const XI_2PM2O3: FieldElement = FieldElement([
    0x2f49_81aa_150a_0eb3,
    0x19c9_2815_c28d_ed55,
    0x3993_4d9c_f7fd_761b,
    0x99ca_c18b_7ca1_dd5f,
]);

/// ξ^((p²−1)/3), a primitive cube root of unity in GF(p).
pub(crate) const XI_P2M1O3: FieldElement = FieldElement([
    0x2f49_81aa_150a_0eb3,
    0x19c9_2815_c28d_ed55,
    0x3993_4d9c_f7fd_761b,
    0x99ca_c18b_7ca1_dd5f,
]);

/// ξ^(2(p²−1)/3) = (ξ^((p²−1)/3))².
pub(crate) const XI_P2M1O3_SQ: FieldElement = FieldElement([
    0x8105_4fcd_94e9_c1c4,
    0x4c0e_91cb_8ce2_df3e,
    0x4877_b452_e8ae_dfb4,
    0x88f5_3e74_8b49_1776,
]);

/// Element of the sextic extension field, `x·v² + y·v + z`.
#[derive(Clone, Copy, Default)]
pub struct Fp6 {
    pub(crate) x: Fp2,
    pub(crate) y: Fp2,
    pub(crate) z: Fp2,
}

impl Fp6 {
    /// The additive identity.
    pub const ZERO: Self = Self {
        x: Fp2::ZERO,
        y: Fp2::ZERO,
        z: Fp2::ZERO,
    };

    /// The multiplicative identity.
    pub const ONE: Self = Self {
        x: Fp2::ZERO,
        y: Fp2::ZERO,
        z: Fp2::ONE,
    };

    pub(crate) const fn new(x: Fp2, y: Fp2, z: Fp2) -> Self {
        Self { x, y, z }
    }

    /// Determine if this element is zero.
    pub fn is_zero(&self) -> Choice {
        self.x.is_zero() & self.y.is_zero() & self.z.is_zero()
    }

    /// Returns `self + rhs`.
    pub const fn add(&self, rhs: &Self) -> Self {
        Self {
            x: self.x.add(&rhs.x),
            y: self.y.add(&rhs.y),
            z: self.z.add(&rhs.z),
        }
    }

    /// Returns `self - rhs`.
    pub const fn sub(&self, rhs: &Self) -> Self {
        Self {
            x: self.x.sub(&rhs.x),
            y: self.y.sub(&rhs.y),
            z: self.z.sub(&rhs.z),
        }
    }

    /// Returns `-self`.
    pub const fn neg(&self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y.neg(),
            z: self.z.neg(),
        }
    }

    /// Returns `self * rhs` (interpolation-style schoolbook with three
    /// coordinate products and ξ-reduction of the overflow terms).
    pub const fn mul(&self, rhs: &Self) -> Self {
        let v0 = self.z.mul(&rhs.z);
        let v1 = self.y.mul(&rhs.y);
        let v2 = self.x.mul(&rhs.x);

        let t0 = self
            .x
            .add(&self.y)
            .mul(&rhs.x.add(&rhs.y))
            .sub(&v1)
            .sub(&v2)
            .mul_xi()
            .add(&v0);
        let t1 = self
            .y
            .add(&self.z)
            .mul(&rhs.y.add(&rhs.z))
            .sub(&v0)
            .sub(&v1)
            .add(&v2.mul_xi());
        let t2 = self
            .x
            .add(&self.z)
            .mul(&rhs.x.add(&rhs.z))
            .sub(&v0)
            .add(&v1)
            .sub(&v2);

        Self {
            x: t2,
            y: t1,
            z: t0,
        }
    }

    /// Returns `self * self`.
    pub const fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns `self * b` for b in GF(p²).
    pub(crate) const fn mul_scalar(&self, b: &Fp2) -> Self {
        Self {
            x: self.x.mul(b),
            y: self.y.mul(b),
            z: self.z.mul(b),
        }
    }

    /// Returns `self * k` for a base-field scalar.
    pub(crate) const fn mul_gfp(&self, k: &FieldElement) -> Self {
        Self {
            x: self.x.mul_scalar(k),
            y: self.y.mul_scalar(k),
            z: self.z.mul_scalar(k),
        }
    }

    /// Returns `self * v`: `(x·v² + y·v + z)·v = y·v² + z·v + ξ·x`.
    pub(crate) const fn mul_tau(&self) -> Self {
        Self {
            x: self.y,
            y: self.z,
            z: self.x.mul_xi(),
        }
    }

    /// The p-power Frobenius: conjugate the coefficients and scale by
    /// v^p = ξ^((p−1)/3)·v.
    pub(crate) const fn frobenius(&self) -> Self {
        Self {
            x: self.x.conjugate().mul_scalar(&XI_2PM2O3),
            y: self.y.conjugate().mul_scalar(&XI_PM1O3),
            z: self.z.conjugate(),
        }
    }

    /// The p²-power Frobenius; the coefficient maps are scalar.
    pub(crate) const fn frobenius_p2(&self) -> Self {
        Self {
            x: self.x.mul_scalar(&XI_P2M1O3_SQ),
            y: self.y.mul_scalar(&XI_P2M1O3),
            z: self.z,
        }
    }

    /// Returns the multiplicative inverse, if self is non-zero.
    ///
    /// See "Implementing cryptographic pairings", M. Scott, section 3.2.
    pub fn invert(&self) -> subtle::CtOption<Self> {
        let a = self.z.square().sub(&self.x.mul(&self.y).mul_xi());
        let b = self.x.square().mul_xi().sub(&self.y.mul(&self.z));
        let c = self.y.square().sub(&self.x.mul(&self.z));
        let f = self
            .y
            .mul(&c)
            .add(&self.x.mul(&b))
            .mul_xi()
            .add(&self.z.mul(&a));
        f.invert().map(|f| Self {
            x: c.mul(&f),
            y: b.mul(&f),
            z: a.mul(&f),
        })
    }
}

impl Debug for Fp6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp6({:?}*v^2 + {:?}*v + {:?})", self.x, self.y, self.z)
    }
}

impl ConditionallySelectable for Fp6 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp2::conditional_select(&a.x, &b.x, choice),
            y: Fp2::conditional_select(&a.y, &b.y, choice),
            z: Fp2::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for Fp6 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y) & self.z.ct_eq(&other.z)
    }
}

impl Eq for Fp6 {}

impl PartialEq for Fp6 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

#[cfg(test)]
mod tests {
    use super::Fp6;
    use crate::arithmetic::{field::FieldElement, fp2::Fp2};

    fn sample() -> (Fp6, Fp6) {
        let mut seed = [0u8; 32];
        for i in 0..32 {
            seed[i] = 3 * i as u8 + 1;
        }
        let f = FieldElement::from_bytes(&seed).unwrap();
        let a = Fp6::new(
            Fp2::new(f, f.square()),
            Fp2::new(f.double(), f),
            Fp2::new(f.square().square(), f.neg()),
        );
        let b = Fp6::new(
            Fp2::new(f.neg(), f),
            Fp2::new(f.square(), f.square().neg()),
            Fp2::new(f, FieldElement::ONE),
        );
        (a, b)
    }

    #[test]
    fn ring_laws() {
        let (a, b) = sample();
        assert_eq!(a.mul(&b), b.mul(&a));
        assert_eq!(a.mul(&Fp6::ONE), a);
        assert_eq!(a.square(), a.mul(&a));
        assert_eq!(a.sub(&a), Fp6::ZERO);
    }

    #[test]
    fn inversion() {
        let (a, _) = sample();
        assert_eq!(a.mul(&a.invert().unwrap()), Fp6::ONE);
    }

    #[test]
    fn tau_multiplication() {
        // x * v three times must equal x * ξ
        let (a, _) = sample();
        let via_tau = a.mul_tau().mul_tau().mul_tau();
        let xi = Fp2::ONE.mul_xi();
        assert_eq!(via_tau, a.mul_scalar(&xi));
    }

    #[test]
    fn frobenius_composition() {
        // frobenius twice == frobenius_p2
        let (a, _) = sample();
        assert_eq!(a.frobenius().frobenius(), a.frobenius_p2());
    }
}
