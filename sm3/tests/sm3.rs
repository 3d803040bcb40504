//! SM3 known-answer and streaming tests.

use hex_literal::hex;
use proptest::prelude::*;
use sm3::{digest, Sm3};

#[test]
fn gmt0004_vector_1() {
    assert_eq!(
        digest(b"abc"),
        hex!("66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0")
    );
}

#[test]
fn gmt0004_vector_2() {
    // the standard's 512-bit message: "abcd" repeated 16 times
    let msg = [b'a', b'b', b'c', b'd'].repeat(16);
    assert_eq!(
        digest(&msg),
        hex!("debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732")
    );
}

#[test]
fn empty_message() {
    assert_eq!(
        digest(b""),
        hex!("1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b")
    );
}

#[test]
fn repeated_abc() {
    let msg = b"abc".repeat(64);
    assert_eq!(
        digest(&msg),
        hex!("b8109d54b9e5848db6230419ea2958c63f7afd474f9f5239dfa69c3f632696b7")
    );
}

#[test]
fn split_updates_match_one_shot() {
    let msg = b"abcd".repeat(16);
    let mut state = Sm3::new();
    state.update(&msg[..1]);
    state.update(&msg[1..7]);
    state.update(&msg[7..63]);
    state.update(&msg[63..]);
    assert_eq!(state.finalize(), digest(&msg));
}

proptest! {
    #[test]
    fn chunking_independence(data in prop::collection::vec(any::<u8>(), 0..512), split in 0usize..512) {
        let split = split.min(data.len());
        let mut state = Sm3::new();
        state.update(&data[..split]);
        state.update(&data[split..]);
        prop_assert_eq!(state.finalize(), digest(&data));
    }
}
