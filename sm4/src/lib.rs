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

mod sbox;

use crate::sbox::tau;
use zeroize::Zeroize;

/// SM4 block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// SM4 key size in bytes.
pub const KEY_SIZE: usize = 16;

/// A 16-byte cipher block.
pub type Block = [u8; BLOCK_SIZE];

/// The system parameter FK of the key schedule.
const FK: [u32; 4] = [0xa3b1_bac6, 0x56aa_3350, 0x677d_9197, 0xb270_22dc];

/// The fixed key constants CK[i], ck_{i,j} = (4i + j)·7 mod 256.
const CK: [u32; 32] = [
    0x0007_0e15, 0x1c23_2a31, 0x383f_464d, 0x545b_6269,
    0x7077_7e85, 0x8c93_9aa1, 0xa8af_b6bd, 0xc4cb_d2d9,
    0xe0e7_eef5, 0xfc03_0a11, 0x181f_262d, 0x343b_4249,
    0x5057_5e65, 0x6c73_7a81, 0x888f_969d, 0xa4ab_b2b9,
    0xc0c7_ced5, 0xdce3_eaf1, 0xf8ff_060d, 0x141b_2229,
    0x3037_3e45, 0x4c53_5a61, 0x686f_767d, 0x848b_9299,
    0xa0a7_aeb5, 0xbcc3_cad1, 0xd8df_e6ed, 0xf4fb_0209,
    0x1017_1e25, 0x2c33_3a41, 0x484f_565d, 0x646b_7279,
];

/// The round transform T: S-box bytes then the diffusion layer L.
#[inline(always)]
fn t_enc(w: u32) -> u32 {
    let b = tau(w);
    b ^ b.rotate_left(2) ^ b.rotate_left(10) ^ b.rotate_left(18) ^ b.rotate_left(24)
}

/// The key-schedule transform T': S-box bytes then the lighter layer L'.
#[inline(always)]
fn t_key(w: u32) -> u32 {
    let b = tau(w);
    b ^ b.rotate_left(13) ^ b.rotate_left(23)
}

#[inline(always)]
fn load_block(block: &Block) -> [u32; 4] {
    let mut x = [0u32; 4];
    for (w, chunk) in x.iter_mut().zip(block.chunks_exact(4)) {
        *w = u32::from_be_bytes(chunk.try_into().expect("chunk is 4 bytes"));
    }
    x
}

#[inline(always)]
fn store_block(x: &[u32; 4]) -> Block {
    let mut out = [0u8; BLOCK_SIZE];
    for (chunk, w) in out.chunks_exact_mut(4).zip(x.iter()) {
        chunk.copy_from_slice(&w.to_be_bytes());
    }
    out
}

/// SM4 cipher state: the 32 encryption round keys and their reversal for
/// decryption, derived from a 128-bit key.
#[derive(Clone)]
pub struct Sm4 {
    rk: [u32; 32],
    drk: [u32; 32],
}

impl Sm4 {
    /// Expands a 128-bit key into the round keys:
    /// rk[i] = K[i] ⊕ T'(K[i+1] ⊕ K[i+2] ⊕ K[i+3] ⊕ CK[i]) with
    /// (K[0..4]) = key words ⊕ FK. Decryption keys are the same sequence
    /// reversed.
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        let mut k = [0u32; 4];
        for (w, (chunk, fk)) in k
            .iter_mut()
            .zip(key.chunks_exact(4).zip(FK.iter()))
        {
            *w = u32::from_be_bytes(chunk.try_into().expect("chunk is 4 bytes")) ^ fk;
        }

        let mut rk = [0u32; 32];
        for i in 0..32 {
            let next = k[0] ^ t_key(k[1] ^ k[2] ^ k[3] ^ CK[i]);
            rk[i] = next;
            k = [k[1], k[2], k[3], next];
        }

        let mut drk = rk;
        drk.reverse();

        Self { rk, drk }
    }

    /// Encrypts a single 16-byte block.
    pub fn encrypt_block(&self, block: &Block) -> Block {
        crypt_block(&self.rk, block)
    }

    /// Decrypts a single 16-byte block.
    pub fn decrypt_block(&self, block: &Block) -> Block {
        crypt_block(&self.drk, block)
    }

    /// Encrypts a slice of blocks in place, running the rounds over four or
    /// eight blocks at a time where the input length allows. Output is
    /// identical to per-block encryption.
    pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
        crypt_blocks(&self.rk, blocks);
    }

    /// Decrypts a slice of blocks in place, the parallel counterpart of
    /// [`Self::encrypt_blocks`].
    pub fn decrypt_blocks(&self, blocks: &mut [Block]) {
        crypt_blocks(&self.drk, blocks);
    }
}

/// Dispatches a run of blocks through the widest available lane count.
fn crypt_blocks(rk: &[u32; 32], blocks: &mut [Block]) {
    let mut by8 = blocks.chunks_exact_mut(8);
    for chunk in &mut by8 {
        crypt_par::<8>(rk, chunk);
    }
    let mut by4 = by8.into_remainder().chunks_exact_mut(4);
    for chunk in &mut by4 {
        crypt_par::<4>(rk, chunk);
    }
    for block in by4.into_remainder() {
        *block = crypt_block(rk, block);
    }
}

impl Zeroize for Sm4 {
    fn zeroize(&mut self) {
        self.rk.zeroize();
        self.drk.zeroize();
    }
}

/// The 32-round Feistel-like core: X[i+4] = X[i] ⊕ T(X[i+1] ⊕ X[i+2] ⊕
/// X[i+3] ⊕ rk[i]), output reversed.
fn crypt_block(rk: &[u32; 32], block: &Block) -> Block {
    let mut x = load_block(block);
    for key in rk {
        let t = t_enc(x[1] ^ x[2] ^ x[3] ^ key);
        x = [x[1], x[2], x[3], x[0] ^ t];
    }
    store_block(&[x[3], x[2], x[1], x[0]])
}

/// Lane-parallel rounds over N blocks: the state is transposed so that each
/// word position holds one lane per block, and all lanes step through the
/// same 32 rounds.
fn crypt_par<const N: usize>(rk: &[u32; 32], blocks: &mut [Block]) {
    debug_assert_eq!(blocks.len(), N);

    let mut x = [[0u32; N]; 4];
    for (lane, block) in blocks.iter().enumerate() {
        let w = load_block(block);
        for i in 0..4 {
            x[i][lane] = w[i];
        }
    }

    for key in rk {
        let mut t = [0u32; N];
        for lane in 0..N {
            t[lane] = t_enc(x[1][lane] ^ x[2][lane] ^ x[3][lane] ^ key);
        }
        for lane in 0..N {
            t[lane] ^= x[0][lane];
        }
        x = [x[1], x[2], x[3], t];
    }

    for (lane, block) in blocks.iter_mut().enumerate() {
        *block = store_block(&[x[3][lane], x[2][lane], x[1][lane], x[0][lane]]);
    }
}

#[cfg(test)]
mod tests {
    use super::Sm4;
    use zeroize::Zeroize;

    const KEY: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54,
        0x32, 0x10,
    ];

    #[test]
    fn standard_vector() {
        let cipher = Sm4::new(&KEY);
        let ct = cipher.encrypt_block(&KEY);
        assert_eq!(
            ct,
            [
                0x68, 0x1e, 0xdf, 0x34, 0xd2, 0x06, 0x96, 0x5e, 0x86, 0xb3, 0xe9, 0x4f, 0x53,
                0x6e, 0x42, 0x46
            ]
        );
        assert_eq!(cipher.decrypt_block(&ct), KEY);
    }

    #[test]
    fn zeroize_clears_round_keys() {
        let mut cipher = Sm4::new(&KEY);
        cipher.zeroize();
        assert_eq!(cipher.rk, [0u32; 32]);
        assert_eq!(cipher.drk, [0u32; 32]);
    }
}
