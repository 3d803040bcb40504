//! G2: Jacobian points on the sextic twist y² = x³ + 5i = x³ + 5/ξ over
//! GF(p²).
//!
//! Unlike [`CurvePoint`](crate::CurvePoint), a twist point keeps the t = Z²
//! cache: the pairing's line functions consume it on every step. It is
//! maintained by `make_affine` and the Miller loop and is meaningless on
//! other intermediate values.

use crate::{
    arithmetic::{field::FieldElement, fp2::Fp2, scalar::Scalar},
    Error, Result,
};
use core::fmt::{self, Debug};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// The twist coefficient b' = 5i.
pub(crate) const TWIST_B: Fp2 = Fp2::new(
    FieldElement([
        0xb9f2_c1e8_c8c7_1995,
        0x125d_f8f2_46a3_77fc,
        0x25e6_50d0_4918_8d1c,
        0x043f_ffff_ed86_6f63,
    ]),
    FieldElement::ZERO,
);

/// Point in the order-n twist subgroup G2, in Jacobian coordinates.
#[derive(Clone, Copy)]
pub struct TwistPoint {
    pub(crate) x: Fp2,
    pub(crate) y: Fp2,
    pub(crate) z: Fp2,
    pub(crate) t: Fp2,
}

impl TwistPoint {
    /// Additive identity of the group a.k.a. the point at infinity.
    pub const IDENTITY: Self = Self {
        x: Fp2::ZERO,
        y: Fp2::ONE,
        z: Fp2::ZERO,
        t: Fp2::ZERO,
    };

    /// Base point of G2 from GM/T 0044.
    pub const GENERATOR: Self = Self {
        x: Fp2::new(
            FieldElement([
                0xdb6d_b482_2750_a8a6,
                0x84c6_135a_5121_f134,
                0x1874_032f_8879_1d41,
                0x9051_12f2_b85f_3a37,
            ]),
            FieldElement([
                0x2602_26a6_8ce2_da8f,
                0x7ee5_645e_dbf6_c06b,
                0xf8f5_7c82_b149_5444,
                0x61fc_f018_bc47_c4d1,
            ]),
        ),
        y: Fp2::new(
            FieldElement([
                0xf7b8_2dac_4c89_bfbb,
                0x3706_f3f6_a49d_c12f,
                0x1e29_de93_d3ee_f769,
                0x81e4_48c3_c76a_5d53,
            ]),
            FieldElement([
                0xc03f_138f_9171_c24a,
                0x92fb_ab45_a15a_3ca7,
                0x2445_561e_2ff7_7cdb,
                0x1084_95e0_c0f6_2ece,
            ]),
        ),
        z: Fp2::ONE,
        t: Fp2::ONE,
    };

    /// Determine if this point is the point at infinity.
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Returns `-self`.
    pub const fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
            t: Fp2::ZERO,
        }
    }

    /// Returns `self + other`; same contract as the G1 addition.
    pub fn add(&self, other: &Self) -> Self {
        if bool::from(self.is_identity()) {
            return *other;
        }
        if bool::from(other.is_identity()) {
            return *self;
        }

        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);
        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        if bool::from(h.is_zero()) {
            if bool::from(r.is_zero()) {
                return self.double();
            }
            return Self::IDENTITY;
        }

        let i = h.double().square();
        let j = h.mul(&i);
        let r = r.double();
        let v = u1.mul(&i);
        let x3 = r.square().sub(&j).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&j).double());
        let z3 = self
            .z
            .add(&other.z)
            .square()
            .sub(&z1z1)
            .sub(&z2z2)
            .mul(&h);

        Self {
            x: x3,
            y: y3,
            z: z3,
            t: Fp2::ZERO,
        }
    }

    /// Returns `2 * self`.
    pub fn double(&self) -> Self {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = self.x.add(&b).square().sub(&a).sub(&c).double();
        let e = a.double().add(&a);
        let f = e.square();
        let x3 = f.sub(&d.double());
        let y3 = e.mul(&d.sub(&x3)).sub(&c.double().double().double());
        let z3 = self.y.mul(&self.z).double();

        Self {
            x: x3,
            y: y3,
            z: z3,
            t: Fp2::ZERO,
        }
    }

    /// Returns `[k] self` by double-and-add.
    ///
    /// **Variable time in the scalar**; G2 scalars are public at this layer.
    pub fn mul(&self, k: &Scalar) -> Self {
        let mut q = Self::IDENTITY;
        for byte in k.to_be_bytes() {
            for bit in (0..8).rev() {
                q = q.double();
                if (byte >> bit) & 1 == 1 {
                    q = q.add(self);
                }
            }
        }
        q
    }

    /// Replaces the coordinates with (X/Z², Y/Z³, 1) and refreshes t = Z²;
    /// infinity normalizes to the canonical encoding.
    pub fn make_affine(&self) -> Self {
        let zinv = match Option::<Fp2>::from(self.z.invert()) {
            Some(zinv) => zinv,
            None => return Self::IDENTITY,
        };
        let zinv2 = zinv.square();
        Self {
            x: self.x.mul(&zinv2),
            y: self.y.mul(&zinv2).mul(&zinv),
            z: Fp2::ONE,
            t: Fp2::ONE,
        }
    }

    /// Verifies Y² = X³ + 5i after normalization; infinity is on the twist.
    pub fn is_on_curve(&self) -> bool {
        if bool::from(self.is_identity()) {
            return true;
        }
        let a = self.make_affine();
        a.y.square() == a.x.square().mul(&a.x).add(&TWIST_B)
    }

    /// Returns the uncompressed 129-byte encoding
    /// 0x04 || x.i || x.1 || y.i || y.1 of the affine point; infinity is the
    /// tag byte followed by zeroes.
    pub fn to_bytes(&self) -> [u8; 129] {
        let mut out = [0u8; 129];
        out[0] = 0x04;
        if bool::from(self.is_identity()) {
            return out;
        }
        let a = self.make_affine();
        out[1..33].copy_from_slice(&a.x.x.to_bytes());
        out[33..65].copy_from_slice(&a.x.y.to_bytes());
        out[65..97].copy_from_slice(&a.y.x.to_bytes());
        out[97..129].copy_from_slice(&a.y.y.to_bytes());
        out
    }

    /// Parses the uncompressed 129-byte encoding, rejecting out-of-field
    /// coordinates and points that are not on the twist.
    pub fn from_bytes(bytes: &[u8; 129]) -> Result<Self> {
        if bytes[0] != 0x04 {
            return Err(Error::MalformedInput);
        }
        if bytes[1..].iter().all(|&b| b == 0) {
            return Ok(Self::IDENTITY);
        }
        let x = Fp2::new(
            FieldElement::from_be_slice(&bytes[1..33])?,
            FieldElement::from_be_slice(&bytes[33..65])?,
        );
        let y = Fp2::new(
            FieldElement::from_be_slice(&bytes[65..97])?,
            FieldElement::from_be_slice(&bytes[97..129])?,
        );
        if y.square() != x.square().mul(&x).add(&TWIST_B) {
            return Err(Error::MalformedInput);
        }
        Ok(Self {
            x,
            y,
            z: Fp2::ONE,
            t: Fp2::ONE,
        })
    }
}

impl ConstantTimeEq for TwistPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        let a = self.make_affine();
        let b = other.make_affine();
        a.x.ct_eq(&b.x) & a.y.ct_eq(&b.y) & a.z.ct_eq(&b.z)
    }
}

impl ConditionallySelectable for TwistPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp2::conditional_select(&a.x, &b.x, choice),
            y: Fp2::conditional_select(&a.y, &b.y, choice),
            z: Fp2::conditional_select(&a.z, &b.z, choice),
            t: Fp2::conditional_select(&a.t, &b.t, choice),
        }
    }
}

impl Debug for TwistPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if bool::from(self.is_identity()) {
            return write!(f, "TwistPoint(infinity)");
        }
        let a = self.make_affine();
        write!(f, "TwistPoint({:?}, {:?})", a.x, a.y)
    }
}

impl Default for TwistPoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Eq for TwistPoint {}

impl PartialEq for TwistPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

#[cfg(test)]
mod tests {
    use super::TwistPoint;
    use crate::arithmetic::scalar::Scalar;

    #[test]
    fn generator_is_on_twist() {
        assert!(TwistPoint::GENERATOR.is_on_curve());
        assert!(TwistPoint::IDENTITY.is_on_curve());
    }

    #[test]
    fn group_laws() {
        let g = TwistPoint::GENERATOR;
        assert_eq!(g.add(&TwistPoint::IDENTITY), g);
        assert_eq!(g.add(&g.neg()), TwistPoint::IDENTITY);
        assert_eq!(g.add(&g), g.double());
        let five = g.mul(&Scalar::from_u64(5));
        let two_three = g.mul(&Scalar::from_u64(2)).add(&g.mul(&Scalar::from_u64(3)));
        assert_eq!(five, two_three);
        assert!(five.is_on_curve());
    }

    #[test]
    fn generator_has_order_n() {
        let g = TwistPoint::GENERATOR;
        assert!(bool::from(g.mul(&Scalar::ORDER).is_identity()));
    }
}
