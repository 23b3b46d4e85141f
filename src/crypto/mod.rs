//! Cryptographic operations: Keccak-256 and deployment-address derivation.
//!
//! This module provides:
//! - Keccak-256 hashing and init-code hash computation
//! - CREATE and CREATE2 address derivation
//! - Ethereum address representation with checksum encoding
//! - secp256k1 keypair minting for deployer-key searches

mod address;
mod create;
mod keypair;

pub use address::{Address, ParseAddressError};
pub use create::{create2_address, create_address};
pub use keypair::Keypair;

use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes (output 32 bytes).
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Hash of deployment bytecode followed by its ABI-encoded constructor
/// arguments, as committed to by a CREATE2 deployment. One-shot; never part
/// of the search loop.
pub fn init_code_hash(init_code: &[u8], constructor_args: &[u8]) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(init_code.len() + constructor_args.len());
    preimage.extend_from_slice(init_code);
    preimage.extend_from_slice(constructor_args);
    keccak256(&preimage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_init_code_hash_concatenates() {
        let code = [0xde, 0xad];
        let args = [0xbe, 0xef];
        assert_eq!(
            init_code_hash(&code, &args),
            keccak256(&[0xde, 0xad, 0xbe, 0xef])
        );
        assert_eq!(init_code_hash(&code, &[]), keccak256(&code));
    }
}
