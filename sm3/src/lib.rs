#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

/// SM3 digest size in bytes.
pub const DIGEST_SIZE: usize = 32;

/// SM3 block size in bytes.
pub const BLOCK_SIZE: usize = 64;

/// The fixed initialization vector.
const IV: [u32; 8] = [
    0x7380_166f, 0x4914_b2b9, 0x1724_42d7, 0xda8a_0600, 0xa96f_30bc, 0x1631_38aa, 0xe38d_ee4d,
    0xb0fb_0e4e,
];

const T0: u32 = 0x79cc_4519;
const T1: u32 = 0x7a87_9d8a;

#[inline(always)]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline(always)]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

/// One application of the 64-round compression function.
fn compress(h: &mut [u32; 8], block: &[u8; BLOCK_SIZE]) {
    let mut w = [0u32; 68];
    for (wj, chunk) in w[..16].iter_mut().zip(block.chunks_exact(4)) {
        *wj = u32::from_be_bytes(chunk.try_into().expect("chunk is 4 bytes"));
    }
    for j in 16..68 {
        w[j] = p1(w[j - 16] ^ w[j - 9] ^ w[j - 3].rotate_left(15))
            ^ w[j - 13].rotate_left(7)
            ^ w[j - 6];
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut hh] = *h;

    for j in 0..64 {
        let tj = if j < 16 { T0 } else { T1 };
        let ss1 = a
            .rotate_left(12)
            .wrapping_add(e)
            .wrapping_add(tj.rotate_left(j))
            .rotate_left(7);
        let ss2 = ss1 ^ a.rotate_left(12);
        let (ff, gg) = if j < 16 {
            (a ^ b ^ c, e ^ f ^ g)
        } else {
            ((a & b) | (a & c) | (b & c), (e & f) | (!e & g))
        };
        let ju = j as usize;
        let tt1 = ff
            .wrapping_add(d)
            .wrapping_add(ss2)
            .wrapping_add(w[ju] ^ w[ju + 4]);
        let tt2 = gg.wrapping_add(hh).wrapping_add(ss1).wrapping_add(w[ju]);
        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        hh = g;
        g = f.rotate_left(19);
        f = e;
        e = p0(tt2);
    }

    h[0] ^= a;
    h[1] ^= b;
    h[2] ^= c;
    h[3] ^= d;
    h[4] ^= e;
    h[5] ^= f;
    h[6] ^= g;
    h[7] ^= hh;
}

/// Streaming SM3 digest state.
#[derive(Clone)]
pub struct Sm3 {
    h: [u32; 8],
    buf: [u8; BLOCK_SIZE],
    /// Total message length in bytes.
    len: u64,
}

impl Sm3 {
    /// Creates a fresh state loaded with the standard IV.
    pub const fn new() -> Self {
        Self {
            h: IV,
            buf: [0; BLOCK_SIZE],
            len: 0,
        }
    }

    /// Absorbs message bytes. Output is independent of how the message is
    /// split across calls.
    pub fn update(&mut self, mut data: &[u8]) {
        let fill = (self.len % BLOCK_SIZE as u64) as usize;
        self.len += data.len() as u64;

        if fill != 0 {
            let take = data.len().min(BLOCK_SIZE - fill);
            self.buf[fill..fill + take].copy_from_slice(&data[..take]);
            data = &data[take..];
            if fill + take < BLOCK_SIZE {
                return;
            }
            let block = self.buf;
            compress(&mut self.h, &block);
        }

        let mut chunks = data.chunks_exact(BLOCK_SIZE);
        for block in &mut chunks {
            compress(&mut self.h, block.try_into().expect("chunk is 64 bytes"));
        }

        let rest = chunks.remainder();
        self.buf[..rest.len()].copy_from_slice(rest);
    }

    /// Applies the Merkle–Damgård padding (0x80, zeroes, 64-bit big-endian
    /// bit length) and returns the 32-byte digest.
    pub fn finalize(mut self) -> [u8; DIGEST_SIZE] {
        let bitlen = self.len.wrapping_mul(8);
        let fill = (self.len % BLOCK_SIZE as u64) as usize;

        let mut block = [0u8; BLOCK_SIZE];
        block[..fill].copy_from_slice(&self.buf[..fill]);
        block[fill] = 0x80;

        if fill + 1 > BLOCK_SIZE - 8 {
            compress(&mut self.h, &block);
            block = [0u8; BLOCK_SIZE];
        }
        block[BLOCK_SIZE - 8..].copy_from_slice(&bitlen.to_be_bytes());
        compress(&mut self.h, &block);

        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

impl Default for Sm3 {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience one-shot digest of a byte string.
pub fn digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut state = Sm3::new();
    state.update(data);
    state.finalize()
}
