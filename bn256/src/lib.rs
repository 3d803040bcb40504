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

mod arithmetic;
mod pairing;

pub use crate::{
    arithmetic::{
        curve::{CurvePoint, LookupTable},
        field::FieldElement,
        fp2::Fp2,
        fp6::Fp6,
        fp12::Fp12,
        scalar::Scalar,
        twist::TwistPoint,
    },
    pairing::{pairing, Gt},
};

use core::fmt;

/// Errors produced by the byte-level decoding APIs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A buffer of the wrong length, an out-of-field coordinate, a point
    /// that is not on the curve, or an unrecognized tag byte.
    MalformedInput,
    /// A scalar encoding of a disallowed shape (e.g. the empty slice).
    InvalidScalar,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedInput => f.write_str("malformed input"),
            Error::InvalidScalar => f.write_str("invalid scalar"),
        }
    }
}

impl core::error::Error for Error {}

/// Result type with the crate-local [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
