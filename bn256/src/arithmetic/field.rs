//! Field arithmetic modulo p = 0xb640000002a3a6f1d603ab4ff58ec74521f2934b1a7aeedbe56f9b27e351457d
//!
//! The modulus is the base-field prime of the SM9 BN curve,
//! p = 36u⁴ + 36u³ + 24u² + 6u + 1 with u = 0x600000000058f98a. Elements are
//! stored in Montgomery form (R = 2²⁵⁶) as four little-endian 64-bit limbs
//! and are strongly reduced (< p) after every exposed operation.

use crate::{
    arithmetic::{adc, mac, sbb},
    Error, Result,
};
use core::{
    fmt::{self, Debug},
    iter::{Product, Sum},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::DefaultIsZeroes;

const MODULUS: [u64; 4] = [
    0xe56f_9b27_e351_457d,
    0x21f2_934b_1a7a_eedb,
    0xd603_ab4f_f58e_c745,
    0xb640_0000_02a3_a6f1,
];

/// -p⁻¹ mod 2⁶⁴. Unlike P-256's, this modulus has no special shape, so the
/// reduction keeps the general word multiplier.
const NP0: u64 = 0x892b_c42c_2f2e_e42b;

/// R² mod p, used to enter the Montgomery domain.
const R2: FieldElement = FieldElement([
    0x27de_a312_b417_e2d2,
    0x88f8_105f_ae1a_5d3f,
    0xe479_b522_d670_6e7b,
    0x2ea7_95a6_56f6_2fbd,
]);

/// (p - 2), the Fermat inversion exponent.
const MODULUS_M2: [u64; 4] = [
    0xe56f_9b27_e351_457b,
    0x21f2_934b_1a7a_eedb,
    0xd603_ab4f_f58e_c745,
    0xb640_0000_02a3_a6f1,
];

/// (p - 5) / 8, the exponent of Atkin's square-root algorithm (p ≡ 5 mod 8).
const P58: [u64; 4] = [
    0x7cad_f364_fc6a_28af,
    0xa43e_5269_634f_5ddb,
    0x3ac0_7569_feb1_d8e8,
    0x16c8_0000_0054_74de,
];

/// Element of the BN256 base field used for curve point coordinates.
#[derive(Clone, Copy, Default)]
pub struct FieldElement(pub(crate) [u64; 4]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self([0, 0, 0, 0]);

    /// The multiplicative identity (R mod p).
    pub const ONE: Self = Self([
        0x1a90_64d8_1cae_ba83,
        0xde0d_6cb4_e585_1124,
        0x29fc_54b0_0a71_38ba,
        0x49bf_ffff_fd5c_590e,
    ]);

    /// Attempts to parse the given 32-byte big-endian encoding as a canonical
    /// field element, rejecting values ≥ p.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let mut w = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).rev().enumerate() {
            let mut limb = [0u8; 8];
            limb.copy_from_slice(chunk);
            w[i] = u64::from_be_bytes(limb);
        }

        // w < p iff subtracting the modulus borrows out of the top limb.
        let (_, borrow) = sbb(w[0], MODULUS[0], 0);
        let (_, borrow) = sbb(w[1], MODULUS[1], borrow);
        let (_, borrow) = sbb(w[2], MODULUS[2], borrow);
        let (_, borrow) = sbb(w[3], MODULUS[3], borrow);
        let is_some = Choice::from((borrow as u8) & 1);

        CtOption::new(Self(w).mul(&R2), is_some)
    }

    /// Parses a 32-byte big-endian slice, surfacing a [`Error::MalformedInput`]
    /// on wrong length or an out-of-field value.
    pub fn from_be_slice(slice: &[u8]) -> Result<Self> {
        let bytes: &[u8; 32] = slice.try_into().map_err(|_| Error::MalformedInput)?;
        Option::<Self>::from(Self::from_bytes(bytes)).ok_or(Error::MalformedInput)
    }

    /// Returns the canonical (non-Montgomery) 32-byte big-endian encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        let w = montgomery_reduce(&[self.0[0], self.0[1], self.0[2], self.0[3], 0, 0, 0, 0]);
        let mut out = [0u8; 32];
        for (chunk, limb) in out.chunks_exact_mut(8).rev().zip(w.iter()) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Determine if this `FieldElement` is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Determine if the canonical form of this `FieldElement` is odd.
    pub fn is_odd(&self) -> Choice {
        let w = montgomery_reduce(&[self.0[0], self.0[1], self.0[2], self.0[3], 0, 0, 0, 0]);
        Choice::from((w[0] & 1) as u8)
    }

    /// Returns `self + rhs mod p`.
    pub const fn add(&self, rhs: &Self) -> Self {
        let (w0, carry) = adc(self.0[0], rhs.0[0], 0);
        let (w1, carry) = adc(self.0[1], rhs.0[1], carry);
        let (w2, carry) = adc(self.0[2], rhs.0[2], carry);
        let (w3, w4) = adc(self.0[3], rhs.0[3], carry);

        // Attempt to subtract the modulus, to ensure the result is in the field.
        sub_inner(
            &[w0, w1, w2, w3, w4],
            &[MODULUS[0], MODULUS[1], MODULUS[2], MODULUS[3], 0],
        )
    }

    /// Returns `2 * self`.
    pub const fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `self - rhs mod p`.
    pub const fn sub(&self, rhs: &Self) -> Self {
        sub_inner(
            &[self.0[0], self.0[1], self.0[2], self.0[3], 0],
            &[rhs.0[0], rhs.0[1], rhs.0[2], rhs.0[3], 0],
        )
    }

    /// Returns `-self mod p`.
    pub const fn neg(&self) -> Self {
        FieldElement::sub(&Self::ZERO, self)
    }

    /// Returns `self / 2 mod p`.
    pub(crate) const fn half(&self) -> Self {
        // Add p when odd so the shift is exact; the mask keeps it branch-free.
        let mask = (self.0[0] & 1).wrapping_neg();
        let (w0, carry) = adc(self.0[0], MODULUS[0] & mask, 0);
        let (w1, carry) = adc(self.0[1], MODULUS[1] & mask, carry);
        let (w2, carry) = adc(self.0[2], MODULUS[2] & mask, carry);
        let (w3, w4) = adc(self.0[3], MODULUS[3] & mask, carry);
        Self([
            (w0 >> 1) | (w1 << 63),
            (w1 >> 1) | (w2 << 63),
            (w2 >> 1) | (w3 << 63),
            (w3 >> 1) | (w4 << 63),
        ])
    }

    /// Returns `self * rhs mod p` via schoolbook multiplication and
    /// word-by-word Montgomery reduction.
    pub const fn mul(&self, rhs: &Self) -> Self {
        let (w0, carry) = mac(0, self.0[0], rhs.0[0], 0);
        let (w1, carry) = mac(0, self.0[0], rhs.0[1], carry);
        let (w2, carry) = mac(0, self.0[0], rhs.0[2], carry);
        let (w3, w4) = mac(0, self.0[0], rhs.0[3], carry);

        let (w1, carry) = mac(w1, self.0[1], rhs.0[0], 0);
        let (w2, carry) = mac(w2, self.0[1], rhs.0[1], carry);
        let (w3, carry) = mac(w3, self.0[1], rhs.0[2], carry);
        let (w4, w5) = mac(w4, self.0[1], rhs.0[3], carry);

        let (w2, carry) = mac(w2, self.0[2], rhs.0[0], 0);
        let (w3, carry) = mac(w3, self.0[2], rhs.0[1], carry);
        let (w4, carry) = mac(w4, self.0[2], rhs.0[2], carry);
        let (w5, w6) = mac(w5, self.0[2], rhs.0[3], carry);

        let (w3, carry) = mac(w3, self.0[3], rhs.0[0], 0);
        let (w4, carry) = mac(w4, self.0[3], rhs.0[1], carry);
        let (w5, carry) = mac(w5, self.0[3], rhs.0[2], carry);
        let (w6, w7) = mac(w6, self.0[3], rhs.0[3], carry);

        Self(montgomery_reduce(&[w0, w1, w2, w3, w4, w5, w6, w7]))
    }

    /// Returns `self * self mod p`.
    pub const fn square(&self) -> Self {
        self.mul(self)
    }

    /// Returns `self^(2^n) mod p`, i.e. `n` repeated Montgomery squarings.
    /// `n = 0` returns `self` unchanged.
    pub fn sqn(&self, n: usize) -> Self {
        let mut t = *self;
        for _ in 0..n {
            t = t.square();
        }
        t
    }

    /// Returns `self^by mod p`, where `by` is a little-endian integer exponent.
    ///
    /// **This operation is variable time with respect to the exponent.** If
    /// the exponent is fixed, this operation is effectively constant time.
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

    /// Returns the multiplicative inverse of self, if self is non-zero, by
    /// Fermat's little theorem (a^(p-2)). The result stays in the Montgomery
    /// domain.
    pub fn invert(&self) -> CtOption<Self> {
        let inverse = self.pow_vartime(&MODULUS_M2);
        CtOption::new(inverse, !self.is_zero())
    }

    /// Returns the square root of self mod p, or `None` if no square root
    /// exists, using Atkin's algorithm for p ≡ 5 (mod 8).
    pub fn sqrt(&self) -> CtOption<Self> {
        let a2 = self.double();
        let t = a2.pow_vartime(&P58);
        let i = a2.mul(&t).mul(&t);
        let r = self.mul(&t).mul(&i.sub(&Self::ONE));
        CtOption::new(r, r.square().ct_eq(self))
    }

    /// Returns a uniformly-random element within the field.
    ///
    /// A double-width value is reduced, which leaves a negligible bias from
    /// the uniform distribution.
    pub fn random(rng: &mut (impl CryptoRng + RngCore)) -> Self {
        let mut w = [0u64; 8];
        for limb in w.iter_mut() {
            *limb = rng.next_u64();
        }
        Self(montgomery_reduce(&w))
    }
}

/// Montgomery reduction of a 512-bit product.
///
/// For each of the four limbs, the multiplier k = r[i] * p' mod 2⁶⁴ makes
/// r[i] + k*p ≡ 0 (mod 2⁶⁴), so the running value can be shifted down one
/// word per iteration. The result may still be within p of the correct
/// value, hence the final conditional subtraction.
///
/// References:
/// - Handbook of Applied Cryptography, Chapter 14, Algorithm 14.32
///   <http://cacr.uwaterloo.ca/hac/about/chap14.pdf>
#[inline]
const fn montgomery_reduce(v: &[u64; 8]) -> [u64; 4] {
    let mut r = [v[0], v[1], v[2], v[3], 0];
    let mut i = 0;
    while i < 4 {
        let k = r[0].wrapping_mul(NP0);
        let (_, mut carry) = mac(r[0], k, MODULUS[0], 0);
        let mut j = 1;
        while j < 4 {
            let t = mac(r[j], k, MODULUS[j], carry);
            r[j - 1] = t.0;
            carry = t.1;
            j += 1;
        }
        let t = adc(v[i + 4], r[4], carry);
        r[3] = t.0;
        r[4] = t.1;
        i += 1;
    }
    let out = sub_inner(&r, &[MODULUS[0], MODULUS[1], MODULUS[2], MODULUS[3], 0]);
    out.0
}

/// `l - r`, adding the modulus back when the subtraction underflows. The
/// final borrow is consumed as a mask, so callers observe no branch.
#[inline]
const fn sub_inner(l: &[u64; 5], r: &[u64; 5]) -> FieldElement {
    let (w0, borrow) = sbb(l[0], r[0], 0);
    let (w1, borrow) = sbb(l[1], r[1], borrow);
    let (w2, borrow) = sbb(l[2], r[2], borrow);
    let (w3, borrow) = sbb(l[3], r[3], borrow);
    let (_, borrow) = sbb(l[4], r[4], borrow);

    let (w0, carry) = adc(w0, MODULUS[0] & borrow, 0);
    let (w1, carry) = adc(w1, MODULUS[1] & borrow, carry);
    let (w2, carry) = adc(w2, MODULUS[2] & borrow, carry);
    let (w3, _) = adc(w3, MODULUS[3] & borrow, carry);

    FieldElement([w0, w1, w2, w3])
}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x")?;
        for byte in self.to_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl DefaultIsZeroes for FieldElement {}

impl Eq for FieldElement {}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Add<FieldElement> for FieldElement {
    type Output = FieldElement;

    #[inline]
    fn add(self, other: FieldElement) -> FieldElement {
        FieldElement::add(&self, &other)
    }
}

impl Add<&FieldElement> for FieldElement {
    type Output = FieldElement;

    #[inline]
    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement::add(&self, other)
    }
}

impl AddAssign<FieldElement> for FieldElement {
    #[inline]
    fn add_assign(&mut self, other: FieldElement) {
        *self = FieldElement::add(self, &other);
    }
}

impl Sub<FieldElement> for FieldElement {
    type Output = FieldElement;

    #[inline]
    fn sub(self, other: FieldElement) -> FieldElement {
        FieldElement::sub(&self, &other)
    }
}

impl Sub<&FieldElement> for FieldElement {
    type Output = FieldElement;

    #[inline]
    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement::sub(&self, other)
    }
}

impl SubAssign<FieldElement> for FieldElement {
    #[inline]
    fn sub_assign(&mut self, other: FieldElement) {
        *self = FieldElement::sub(self, &other);
    }
}

impl Mul<FieldElement> for FieldElement {
    type Output = FieldElement;

    #[inline]
    fn mul(self, other: FieldElement) -> FieldElement {
        FieldElement::mul(&self, &other)
    }
}

impl Mul<&FieldElement> for FieldElement {
    type Output = FieldElement;

    #[inline]
    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement::mul(&self, other)
    }
}

impl MulAssign<FieldElement> for FieldElement {
    #[inline]
    fn mul_assign(&mut self, other: FieldElement) {
        *self = FieldElement::mul(self, &other);
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    #[inline]
    fn neg(self) -> FieldElement {
        FieldElement::neg(&self)
    }
}

impl Sum for FieldElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for FieldElement {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldElement, MODULUS};

    fn fe(hex: &str) -> FieldElement {
        let mut bytes = [0u8; 32];
        let mut i = 0;
        while i < 32 {
            bytes[i] = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).unwrap();
            i += 1;
        }
        FieldElement::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn zero_and_one_round_trip() {
        assert_eq!(FieldElement::ZERO.to_bytes(), [0u8; 32]);
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(FieldElement::ONE.to_bytes(), one);
        assert_eq!(FieldElement::from_bytes(&one).unwrap(), FieldElement::ONE);
    }

    #[test]
    fn montgomery_round_trip() {
        let a = fe("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef");
        assert_eq!(
            a.to_bytes(),
            [
                0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89,
                0xab, 0xcd, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23,
                0x45, 0x67, 0x89, 0xab, 0xcd, 0xef
            ]
        );
    }

    #[test]
    fn known_product() {
        // (a * b) mod p computed independently from the standard parameters
        let a = fe("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef");
        let b = fe("2468ace02468ace02468ace02468ace02468ace02468ace02468ace02468ace0");
        let expect = fe("1d246feefe3bc48dd17630d05a19551b3afd27c6ddcdd84140f6c79ada9a219e");
        assert_eq!(a * b, expect);
    }

    #[test]
    fn known_sum() {
        let a = fe("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef");
        let b = fe("2468ace02468ace02468ace02468ace02468ace02468ace02468ace02468ace0");
        let expect = fe("258bf247ae147acf258bf247ae147acf258bf247ae147acf258bf247ae147acf");
        assert_eq!(a + b, expect);
    }

    #[test]
    fn rejects_modulus_and_larger() {
        let mut bytes = [0u8; 32];
        for (chunk, limb) in bytes.chunks_exact_mut(8).rev().zip(MODULUS.iter()) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        assert!(bool::from(FieldElement::from_bytes(&bytes).is_none()));
        assert!(bool::from(FieldElement::from_bytes(&[0xff; 32]).is_none()));

        // p - 1 is the largest canonical value
        bytes[31] -= 1;
        assert!(bool::from(FieldElement::from_bytes(&bytes).is_some()));
    }

    #[test]
    fn additive_laws() {
        let a = fe("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef");
        let b = fe("2468ace02468ace02468ace02468ace02468ace02468ace02468ace02468ace0");
        assert_eq!(a + b, b + a);
        assert_eq!(a - a, FieldElement::ZERO);
        assert_eq!(a + (-a), FieldElement::ZERO);
        assert_eq!(-FieldElement::ZERO, FieldElement::ZERO);
    }

    #[test]
    fn multiplicative_laws() {
        let a = fe("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef");
        let b = fe("2468ace02468ace02468ace02468ace02468ace02468ace02468ace02468ace0");
        let c = fe("00000000000000000000000000000000000000000000000000000000deadbeef");
        assert_eq!(a * b, b * a);
        assert_eq!(a * (b + c), a * b + a * c);
        assert_eq!(a * FieldElement::ONE, a);
        assert_eq!(a.square(), a * a);
        assert_eq!(a.sqn(3), a.square().square().square());
    }

    #[test]
    fn inversion() {
        let a = fe("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef");
        assert_eq!(a * a.invert().unwrap(), FieldElement::ONE);
        assert!(bool::from(FieldElement::ZERO.invert().is_none()));
    }

    #[test]
    fn square_root() {
        let a = fe("2468ace02468ace02468ace02468ace02468ace02468ace02468ace02468ace0");
        let sq = a.square();
        let r = sq.sqrt().unwrap();
        assert!(r == a || r == -a);
    }

    #[test]
    fn halving() {
        let a = fe("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef");
        assert_eq!(a.half() + a.half(), a);
        assert_eq!(FieldElement::ONE.half().double(), FieldElement::ONE);
    }
}
