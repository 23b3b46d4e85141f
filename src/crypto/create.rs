//! Deployment-address derivation.
//!
//! CREATE:  address = keccak256(rlp([deployer, nonce]))[12..32]
//! CREATE2: address = keccak256(0xff || factory || salt || initCodeHash)[12..32]

use super::{keccak256, Address};

/// Computes the contract address for a deployer's transaction at `nonce`.
///
/// The RLP payload is a 20-byte string plus an integer, at most 30 bytes, so
/// the whole encoding fits a single short-list header. Nonce 0 encodes as the
/// RLP empty string (0x80), not a zero byte.
pub fn create_address(deployer: &Address, nonce: u64) -> Address {
    let mut payload = [0u8; 30];
    payload[0] = 0x80 + 20;
    payload[1..21].copy_from_slice(deployer.as_bytes());
    let nonce_len = encode_nonce(nonce, &mut payload[21..]);
    let len = 21 + nonce_len;

    let mut preimage = [0u8; 31];
    preimage[0] = 0xc0 + len as u8;
    preimage[1..1 + len].copy_from_slice(&payload[..len]);

    let hash = keccak256(&preimage[..1 + len]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::from_bytes(addr)
}

/// RLP-encodes an integer into `out`; returns the number of bytes written.
/// Values below 0x80 are their own encoding; larger values get a length
/// prefix over the minimal big-endian form.
fn encode_nonce(nonce: u64, out: &mut [u8]) -> usize {
    if nonce == 0 {
        out[0] = 0x80;
        1
    } else if nonce < 0x80 {
        out[0] = nonce as u8;
        1
    } else {
        let be = nonce.to_be_bytes();
        let len = ((64 - nonce.leading_zeros() + 7) / 8) as usize;
        out[0] = 0x80 + len as u8;
        out[1..1 + len].copy_from_slice(&be[8 - len..]);
        1 + len
    }
}

/// Computes the CREATE2 deployment address.
/// Preimage: 0xff (1) || factory (20) || salt (32) || init_code_hash (32) = 85 bytes.
pub fn create2_address(factory: &Address, salt: &[u8; 32], init_code_hash: &[u8; 32]) -> Address {
    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(factory.as_bytes());
    preimage[21..53].copy_from_slice(salt);
    preimage[53..85].copy_from_slice(init_code_hash);

    let hash = keccak256(&preimage);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::from_bytes(addr)
}
