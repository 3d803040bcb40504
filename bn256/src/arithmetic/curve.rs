//! G1: Jacobian points on the curve y² = x³ + 5 over GF(p).
//!
//! The group has prime order n (cofactor 1). A point (X, Y, Z) represents
//! the affine point (X/Z², Y/Z³); the point at infinity is encoded as
//! Z = 0 with (X, Y) = (0, 1). The Z² value is recomputed where the
//! formulas need it rather than cached in the point.

use crate::{
    arithmetic::{field::FieldElement, scalar::Scalar},
    Error, Result,
};
use core::fmt::{self, Debug};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::DefaultIsZeroes;

/// The curve coefficient b = 5.
const CURVE_B: FieldElement = FieldElement([
    0xb9f2_c1e8_c8c7_1995,
    0x125d_f8f2_46a3_77fc,
    0x25e6_50d0_4918_8d1c,
    0x043f_ffff_ed86_6f63,
]);

/// Point in the prime-order group G1, in Jacobian coordinates.
#[derive(Clone, Copy)]
pub struct CurvePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl CurvePoint {
    /// Additive identity of the group a.k.a. the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Base point of G1 from GM/T 0044.
    pub const GENERATOR: Self = Self {
        x: FieldElement([
            0x22e9_35e2_9860_501b,
            0xa946_fd5e_0073_282c,
            0xefd0_cec8_17a6_49be,
            0x5129_787c_8691_40b5,
        ]),
        y: FieldElement([
            0xee77_9649_eb87_f7c7,
            0x1556_3cbd_ec30_a576,
            0x3263_5391_2824_efbf,
            0x7215_7177_63c3_9828,
        ]),
        z: FieldElement::ONE,
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
        }
    }

    /// Returns `self + other` following the add-2007-bl formulas.
    ///
    /// The identity and equal-X early exits are not constant-time; the main
    /// formula is branch-free on field values.
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
            // Equal X: either a doubling (equal Y, detected by r == 0) or a
            // pair of opposite points summing to infinity.
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
        }
    }

    /// Returns `2 * self` following the dbl-2009-l formulas.
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
        }
    }

    /// Unified addition for the scalar ladder: the add-2007-bl formula is
    /// evaluated unconditionally and the identity, doubling and inverse
    /// cases are merged by selection afterwards, so no branch or memory
    /// access observes the operands.
    fn add_complete(&self, other: &Self) -> Self {
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);
        let h = u2.sub(&u1);
        let r0 = s2.sub(&s1);

        let i = h.double().square();
        let j = h.mul(&i);
        let r = r0.double();
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

        let mut res = Self {
            x: x3,
            y: y3,
            z: z3,
        };
        let dbl = self.double();
        let h_zero = h.is_zero();
        let r_zero = r0.is_zero();
        res.conditional_assign(&dbl, h_zero & r_zero);
        res.conditional_assign(&Self::IDENTITY, h_zero & !r_zero);
        res.conditional_assign(other, self.is_identity());
        res.conditional_assign(self, other.is_identity());
        res
    }

    /// Returns `[k] self` by a fixed 64-iteration 4-bit window ladder over a
    /// 15-entry table. Each window is looked up with [`LookupTable::select`]
    /// and merged through the unified addition, so the accumulator never
    /// reaches a branch that depends on the scalar.
    pub fn mul(&self, k: &Scalar) -> Self {
        let table = LookupTable::new(self);
        let mut q = Self::IDENTITY;
        for (i, nibble) in k.nibbles().enumerate() {
            if i != 0 {
                q = q.double().double().double().double();
            }
            q = q.add_complete(&table.select(nibble));
        }
        q
    }

    /// Replaces the coordinates with (X/Z², Y/Z³, 1); infinity normalizes to
    /// the canonical (0, 1, 0).
    pub fn make_affine(&self) -> Self {
        let zinv = match Option::<FieldElement>::from(self.z.invert()) {
            Some(zinv) => zinv,
            None => return Self::IDENTITY,
        };
        let zinv2 = zinv.square();
        Self {
            x: self.x.mul(&zinv2),
            y: self.y.mul(&zinv2).mul(&zinv),
            z: FieldElement::ONE,
        }
    }

    /// Verifies Y² = X³ + 5 after normalization; infinity is on the curve.
    pub fn is_on_curve(&self) -> bool {
        if bool::from(self.is_identity()) {
            return true;
        }
        let a = self.make_affine();
        a.y.square() == a.x.square().mul(&a.x).add(&CURVE_B)
    }

    /// Returns the uncompressed 64-byte big-endian encoding X || Y of the
    /// affine point; infinity is all zero.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        if bool::from(self.is_identity()) {
            return out;
        }
        let a = self.make_affine();
        out[..32].copy_from_slice(&a.x.to_bytes());
        out[32..].copy_from_slice(&a.y.to_bytes());
        out
    }

    /// Parses an uncompressed 64-byte encoding, rejecting out-of-field
    /// coordinates and points that are not on the curve.
    pub fn from_bytes(bytes: &[u8; 64]) -> Result<Self> {
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::IDENTITY);
        }
        let x = FieldElement::from_be_slice(&bytes[..32])?;
        let y = FieldElement::from_be_slice(&bytes[32..])?;
        let p = Self {
            x,
            y,
            z: FieldElement::ONE,
        };
        if y.square() != x.square().mul(&x).add(&CURVE_B) {
            return Err(Error::MalformedInput);
        }
        Ok(p)
    }

    /// Returns the compressed 33-byte encoding: a parity tag (0x02 even Y,
    /// 0x03 odd Y) followed by X. Infinity is all zero.
    pub fn to_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        if bool::from(self.is_identity()) {
            return out;
        }
        let a = self.make_affine();
        out[0] = 0x02 | u8::conditional_select(&0, &1, a.y.is_odd());
        out[1..].copy_from_slice(&a.x.to_bytes());
        out
    }

    /// Parses a compressed 33-byte encoding, recovering Y from the curve
    /// equation and the tag's parity.
    pub fn from_compressed(bytes: &[u8; 33]) -> Result<Self> {
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::IDENTITY);
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(Error::MalformedInput);
        }
        let x = FieldElement::from_be_slice(&bytes[1..])?;
        let y2 = x.square().mul(&x).add(&CURVE_B);
        let y = Option::<FieldElement>::from(y2.sqrt()).ok_or(Error::MalformedInput)?;
        let want_odd = Choice::from(bytes[0] & 1);
        let y = FieldElement::conditional_select(&y, &y.neg(), y.is_odd() ^ want_odd);
        Ok(Self {
            x,
            y,
            z: FieldElement::ONE,
        })
    }
}

impl ConditionallySelectable for CurvePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for CurvePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // compare affine forms so distinct Jacobian scalings agree
        let a = self.make_affine();
        let b = other.make_affine();
        a.x.ct_eq(&b.x) & a.y.ct_eq(&b.y) & a.z.ct_eq(&b.z)
    }
}

impl Debug for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if bool::from(self.is_identity()) {
            return write!(f, "CurvePoint(infinity)");
        }
        let a = self.make_affine();
        write!(f, "CurvePoint({:?}, {:?})", a.x, a.y)
    }
}

impl Default for CurvePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DefaultIsZeroes for CurvePoint {}

impl Eq for CurvePoint {}

impl PartialEq for CurvePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

/// Precomputed table of [1]P .. [15]P for 4-bit windowed multiplication;
/// index 0 of a window selects the implicit identity.
#[derive(Clone, Copy)]
pub struct LookupTable([CurvePoint; 15]);

impl LookupTable {
    /// Compute a new lookup table from the given point.
    pub fn new(p: &CurvePoint) -> Self {
        let mut points = [*p; 15];
        for i in 1..15 {
            points[i] = points[i - 1].add(p);
        }
        Self(points)
    }

    /// Given 0 <= n <= 15, returns [n]P in constant time; n = 0 yields the
    /// identity.
    pub fn select(&self, n: u8) -> CurvePoint {
        debug_assert!(n < 16);
        let mut t = CurvePoint::IDENTITY;
        for (j, point) in self.0.iter().enumerate() {
            let c = n.ct_eq(&(j as u8 + 1));
            t.conditional_assign(point, c);
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::{CurvePoint, LookupTable};
    use crate::arithmetic::scalar::Scalar;

    #[test]
    fn generator_is_on_curve() {
        assert!(CurvePoint::GENERATOR.is_on_curve());
        assert!(CurvePoint::IDENTITY.is_on_curve());
    }

    #[test]
    fn identity_contract() {
        let g = CurvePoint::GENERATOR;
        assert_eq!(g.add(&CurvePoint::IDENTITY), g);
        assert_eq!(CurvePoint::IDENTITY.add(&g), g);
        assert_eq!(g.add(&g.neg()), CurvePoint::IDENTITY);
    }

    #[test]
    fn add_of_equal_points_doubles() {
        let g = CurvePoint::GENERATOR;
        assert_eq!(g.add(&g), g.double());
        // the same point under a different Jacobian scaling must also be
        // routed into the doubling path
        let g5 = g.mul(&Scalar::from_u64(5));
        let g5_affine = g5.make_affine();
        assert_eq!(g5.add(&g5_affine), g5.double());
    }

    #[test]
    fn unified_addition_covers_all_cases() {
        let g = CurvePoint::GENERATOR;
        let inf = CurvePoint::IDENTITY;
        assert_eq!(g.add_complete(&inf), g);
        assert_eq!(inf.add_complete(&g), g);
        assert!(bool::from(inf.add_complete(&inf).is_identity()));
        assert_eq!(g.add_complete(&g), g.double());
        assert!(bool::from(g.add_complete(&g.neg()).is_identity()));
        assert_eq!(g.double().add_complete(&g), g.mul(&Scalar::from_u64(3)));
        // the doubling and inverse cases must also trigger for the same
        // point under a different Jacobian scaling
        let g5 = g.mul(&Scalar::from_u64(5));
        let g5_affine = g5.make_affine();
        assert_eq!(g5.add_complete(&g5_affine), g5.double());
        assert!(bool::from(g5.add_complete(&g5_affine.neg()).is_identity()));
    }

    #[test]
    fn table_select() {
        let g = CurvePoint::GENERATOR;
        let table = LookupTable::new(&g);
        assert_eq!(table.select(0), CurvePoint::IDENTITY);
        assert_eq!(table.select(1), g);
        assert_eq!(table.select(15), g.mul(&Scalar::from_u64(15)));
    }

    #[test]
    fn small_multiples() {
        let g = CurvePoint::GENERATOR;
        let two = g.mul(&Scalar::from_u64(2));
        let three = g.mul(&Scalar::from_u64(3));
        assert_eq!(two, g.double());
        assert_eq!(three, g.double().add(&g));
        assert!(two.is_on_curve() && three.is_on_curve());
    }
}
