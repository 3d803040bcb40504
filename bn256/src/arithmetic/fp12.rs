//! Quadratic extension GF(p¹²) = GF(p⁶)[w]/(w² − v).
//!
//! An element is `x·w + y` with coefficients in GF(p⁶). Together with the
//! lower levels this realizes GF(p¹²) = GF(p)[w]/(w¹² + 2).

use crate::arithmetic::{
    field::FieldElement,
    fp2::Fp2,
    fp6::Fp6,
};
use core::fmt::{self, Debug};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// ξ^((p−1)/6), the w-coefficient scale of the p-power Frobenius.
const XI_PM1O6: FieldElement = FieldElement([
    0xe0e3_f0ae_068e_0476,
    0xc3c4_1886_1c04_2d7a,
    0x3cca_13fb_bf32_f288,
    0x06ae_5153_8108_98de,
]);

/// ξ^((p²−1)/6).
const XI_P2M1O6: FieldElement = FieldElement([
    0x646a_4b5a_4e67_83b9,
    0xd5e4_017f_8d98_0f9d,
    0x8d8b_f6fd_0cdf_e790,
    0x2d4a_c18b_775a_8f7b,
]);

/// Element of the degree-12 extension field, `x·w + y`.
#[derive(Clone, Copy, Default)]
pub struct Fp12 {
    pub(crate) x: Fp6,
    pub(crate) y: Fp6,
}

impl Fp12 {
    /// The multiplicative identity.
    pub const ONE: Self = Self {
        x: Fp6::ZERO,
        y: Fp6::ONE,
    };

    pub(crate) const fn new(x: Fp6, y: Fp6) -> Self {
        Self { x, y }
    }

    /// Determine if this element is the multiplicative identity.
    pub fn is_one(&self) -> Choice {
        self.ct_eq(&Self::ONE)
    }

    /// Returns `self * rhs`.
    pub const fn mul(&self, rhs: &Self) -> Self {
        // (x1·w + y1)(x2·w + y2) = (x1·y2 + x2·y1)·w + (y1·y2 + x1·x2·v)
        let tx = self.x.mul(&rhs.y).add(&rhs.x.mul(&self.y));
        let ty = self.y.mul(&rhs.y).add(&self.x.mul(&rhs.x).mul_tau());
        Self { x: tx, y: ty }
    }

    /// Returns `self * self`.
    pub const fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns the conjugate `-x·w + y`, which is the p⁶-power Frobenius and
    /// hence the inverse on the cyclotomic subgroup.
    pub const fn conjugate(&self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y,
        }
    }

    /// The p-power Frobenius.
    pub(crate) const fn frobenius(&self) -> Self {
        Self {
            x: self.x.frobenius().mul_gfp(&XI_PM1O6),
            y: self.y.frobenius(),
        }
    }

    /// The p²-power Frobenius.
    pub(crate) const fn frobenius_p2(&self) -> Self {
        Self {
            x: self.x.frobenius_p2().mul_gfp(&XI_P2M1O6),
            y: self.y.frobenius_p2(),
        }
    }

    /// Returns the multiplicative inverse, if self is non-zero:
    /// `1/(x·w + y) = (y - x·w)/(y² - x²·v)`.
    pub fn invert(&self) -> subtle::CtOption<Self> {
        let t = self.y.square().sub(&self.x.square().mul_tau());
        t.invert().map(|t| Self {
            x: self.x.neg().mul(&t),
            y: self.y.mul(&t),
        })
    }

    /// Returns `self^by`, where `by` is a little-endian integer exponent.
    ///
    /// **This operation is variable time with respect to the exponent.**
    pub fn pow_vartime(&self, by: &[u64; 4]) -> Self {
        let mut res = Self::ONE;
        for e in by.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if ((*e >> i) & 1) == 1 {
                    res = res.mul(self);
                }
            }
        }
        res
    }

    /// Granger–Scott squaring, valid only on the cyclotomic subgroup (the
    /// image of the easy part of the final exponentiation).
    pub(crate) fn cyclotomic_square(&self) -> Self {
        // coefficients by power of w: (w⁰ w¹ w² w³ w⁴ w⁵) =
        // (y.z, x.z, y.y, x.y, y.x, x.x), processed as three Fp4 pairs
        // (w⁰,w³), (w¹,w⁴), (w²,w⁵) with s = w³, s² = ξ.
        let (z0, z1) = (self.y.z, self.x.y);
        let (z2, z3) = (self.x.z, self.y.x);
        let (z4, z5) = (self.y.y, self.x.x);

        let (t0, t1) = fp4_square(&z1, &z0);
        let z0 = t0.sub(&z0).double().add(&t0);
        let z1 = t1.add(&z1).double().add(&t1);

        let (t0, t1) = fp4_square(&z3, &z2);
        let (t2, t3) = fp4_square(&z5, &z4);
        let z4 = t0.sub(&z4).double().add(&t0);
        let z5 = t1.add(&z5).double().add(&t1);
        let t0 = t3.mul_xi();
        let z2 = t0.add(&z2).double().add(&t0);
        let z3 = t2.sub(&z3).double().add(&t2);

        Self {
            x: Fp6::new(z5, z1, z2),
            y: Fp6::new(z3, z4, z0),
        }
    }

    /// Returns `self^u` for the BN parameter u, valid on the cyclotomic
    /// subgroup.
    ///
    /// The fixed schedule evaluates the windows 3·2⁴¹ ∥ 5·2¹ ∥ 1·2⁶ ∥ 7·2² ∥
    /// 3·2⁴ ∥ 3·2⁶ ∥ 5·2¹ of u over the table {x², x³, x⁵, x⁷}: exactly 61
    /// cyclotomic squarings interleaved with 10 full multiplications (the
    /// table's x² step uses the full multiplication). Deviating from the
    /// chain silently breaks the pairing.
    pub(crate) fn pow_u(&self) -> Self {
        let x2 = self.mul(self);
        let x3 = x2.mul(self);
        let x5 = x3.mul(&x2);
        let x7 = x5.mul(&x2);

        let mut acc = x3;
        for _ in 0..41 {
            acc = acc.cyclotomic_square();
        }
        acc = acc.mul(&x5);
        acc = acc.cyclotomic_square();
        acc = acc.mul(self);
        for _ in 0..6 {
            acc = acc.cyclotomic_square();
        }
        acc = acc.mul(&x7);
        for _ in 0..2 {
            acc = acc.cyclotomic_square();
        }
        acc = acc.mul(&x3);
        for _ in 0..4 {
            acc = acc.cyclotomic_square();
        }
        acc = acc.mul(&x3);
        for _ in 0..6 {
            acc = acc.cyclotomic_square();
        }
        acc = acc.mul(&x5);
        acc.cyclotomic_square()
    }
}

/// `(b + a·s)²` in GF(p⁴) = GF(p²)[s]/(s² − ξ): returns (b² + ξ·a², 2ab).
#[inline]
fn fp4_square(a: &Fp2, b: &Fp2) -> (Fp2, Fp2) {
    let t0 = a.square();
    let t1 = b.square();
    let c0 = t1.add(&t0.mul_xi());
    let c1 = a.add(b).square().sub(&t0).sub(&t1);
    (c0, c1)
}

impl Debug for Fp12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fp12({:?}*w + {:?})", self.x, self.y)
    }
}

impl ConditionallySelectable for Fp12 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp6::conditional_select(&a.x, &b.x, choice),
            y: Fp6::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl ConstantTimeEq for Fp12 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

impl Eq for Fp12 {}

impl PartialEq for Fp12 {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
