//! Calldata for the ATM contract.
//!
//! The contract exposes `getBalance()`, `deposit(uint256)` and
//! `withdraw(uint256)`; selectors are derived from those signatures with
//! keccak at call time, arguments are a single 32-byte big-endian word.
use ethers_core::{
    types::{Bytes, U256},
    utils::id,
};

use crate::{EngineError, ResultEngine};

/// Calldata for the read-only `getBalance()` call.
#[must_use]
pub fn get_balance() -> Bytes {
    Bytes::from(id("getBalance()").to_vec())
}

/// Calldata for `deposit(uint256)`.
#[must_use]
pub fn deposit(amount: U256) -> Bytes {
    encode_uint_call("deposit(uint256)", amount)
}

/// Calldata for `withdraw(uint256)`.
#[must_use]
pub fn withdraw(amount: U256) -> Bytes {
    encode_uint_call("withdraw(uint256)", amount)
}

fn encode_uint_call(signature: &str, amount: U256) -> Bytes {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&id(signature));
    let mut word = [0u8; 32];
    amount.to_big_endian(&mut word);
    data.extend_from_slice(&word);
    Bytes::from(data)
}

/// Decodes a single `uint256` return word from an `eth_call` result.
pub fn decode_uint(data: &[u8]) -> ResultEngine<U256> {
    if data.len() < 32 {
        return Err(EngineError::Decode(format!(
            "expected a 32-byte word, got {} bytes",
            data.len()
        )));
    }
    Ok(U256::from_big_endian(&data[..32]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_balance_selector_is_stable() {
        // keccak("getBalance()")[..4]
        assert_eq!(get_balance().as_ref(), [0x12, 0x06, 0x5f, 0xe0]);
    }

    #[test]
    fn deposit_encodes_selector_and_amount_word() {
        let data = deposit(U256::one());
        assert_eq!(data.len(), 36);
        // keccak("deposit(uint256)")[..4]
        assert_eq!(&data[..4], [0xb6, 0xb5, 0x5f, 0x25]);
        assert!(data[4..35].iter().all(|byte| *byte == 0));
        assert_eq!(data[35], 1);
    }

    #[test]
    fn withdraw_uses_its_own_selector() {
        let data = withdraw(U256::one());
        // keccak("withdraw(uint256)")[..4]
        assert_eq!(&data[..4], [0x2e, 0x1a, 0x7d, 0x4d]);
    }

    #[test]
    fn decode_uint_reads_the_return_word() {
        let mut word = [0u8; 32];
        word[31] = 7;
        assert_eq!(decode_uint(&word).unwrap(), U256::from(7));
    }

    #[test]
    fn decode_uint_guards_short_data() {
        assert!(matches!(decode_uint(&[]), Err(EngineError::Decode(_))));
        assert!(matches!(decode_uint(&[0; 31]), Err(EngineError::Decode(_))));
    }
}
