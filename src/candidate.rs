//! Candidate generation: derivation inputs and per-worker candidate streams.
//!
//! A [`SearchJob`] names the free axis of the search; each worker turns it
//! into its own [`Partition`], a lazily-advancing cursor over a disjoint
//! slice of the candidate space. Partitions are exclusively owned; nothing
//! here is shared between workers.

use rand::rngs::ThreadRng;
use rand::RngCore;
use secp256k1::{All, Secp256k1};

use crate::crypto::{create2_address, create_address, Address, Keypair};

/// Input to the address derivation function. One value per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationInput {
    /// CREATE: the deployer's transaction at `nonce`.
    Create { deployer: Address, nonce: u64 },
    /// CREATE2: factory deployment parameterized by `salt`.
    Create2 {
        factory: Address,
        salt: [u8; 32],
        init_code_hash: [u8; 32],
    },
}

impl DerivationInput {
    /// Derives the deployment address. Pure; the same input always yields the
    /// same address.
    #[inline]
    pub fn derive(&self) -> Address {
        match self {
            Self::Create { deployer, nonce } => create_address(deployer, *nonce),
            Self::Create2 {
                factory,
                salt,
                init_code_hash,
            } => create2_address(factory, salt, init_code_hash),
        }
    }
}

/// A candidate produced by a partition: the derivation input, plus the secret
/// key behind it when the search mints deployer keys.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub input: DerivationInput,
    pub secret_key: Option<[u8; 32]>,
}

/// How CREATE2 salts are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltSampling {
    /// Independent uniform salts per worker. Preferred for the full 256-bit
    /// space; collision odds are negligible and workers need no coordination.
    Random,
    /// Deterministic enumeration: worker w visits base+w, base+w+W, ... as a
    /// 256-bit big-endian counter.
    Strided { base: [u8; 32] },
}

/// The free axis a search varies.
#[derive(Debug, Clone, Copy)]
pub enum SearchJob {
    /// Fixed deployer, nonce swept over [start, end). Finite.
    NonceRange {
        deployer: Address,
        start: u64,
        end: u64,
    },
    /// Fresh random deployer keypair per attempt at a fixed nonce. Unbounded.
    DeployerKey { nonce: u64 },
    /// CREATE2 salt search. Unbounded.
    Salt {
        factory: Address,
        init_code_hash: [u8; 32],
        sampling: SaltSampling,
    },
}

/// One worker's exclusively-owned slice of the candidate space.
pub enum Partition {
    Nonces {
        deployer: Address,
        next: u64,
        end: u64,
        stride: u64,
    },
    Keypairs {
        nonce: u64,
        secp: Secp256k1<All>,
    },
    Salts {
        factory: Address,
        init_code_hash: [u8; 32],
        cursor: SaltCursor,
    },
}

pub enum SaltCursor {
    Random(ThreadRng),
    Strided { next: [u8; 32], stride: u64 },
}

impl Partition {
    /// Builds the slice for worker `index` of `count`.
    pub fn new(job: &SearchJob, index: usize, count: usize) -> Self {
        match job {
            SearchJob::NonceRange {
                deployer,
                start,
                end,
            } => Partition::Nonces {
                deployer: *deployer,
                next: start.saturating_add(index as u64).min(*end),
                end: *end,
                stride: count as u64,
            },
            SearchJob::DeployerKey { nonce } => Partition::Keypairs {
                nonce: *nonce,
                secp: Secp256k1::new(),
            },
            SearchJob::Salt {
                factory,
                init_code_hash,
                sampling,
            } => {
                let cursor = match sampling {
                    SaltSampling::Random => SaltCursor::Random(rand::thread_rng()),
                    SaltSampling::Strided { base } => {
                        let mut next = *base;
                        advance(&mut next, index as u64);
                        SaltCursor::Strided {
                            next,
                            stride: count as u64,
                        }
                    }
                };
                Partition::Salts {
                    factory: *factory,
                    init_code_hash: *init_code_hash,
                    cursor,
                }
            }
        }
    }

    /// Produces the next candidate, or `None` when the slice is exhausted.
    #[inline]
    pub fn next(&mut self) -> Option<Candidate> {
        match self {
            Partition::Nonces {
                deployer,
                next,
                end,
                stride,
            } => {
                if *next >= *end {
                    return None;
                }
                let input = DerivationInput::Create {
                    deployer: *deployer,
                    nonce: *next,
                };
                *next = next.saturating_add(*stride);
                Some(Candidate {
                    input,
                    secret_key: None,
                })
            }
            Partition::Keypairs { nonce, secp } => {
                let keypair = Keypair::generate_with(secp);
                Some(Candidate {
                    input: DerivationInput::Create {
                        deployer: *keypair.address(),
                        nonce: *nonce,
                    },
                    secret_key: Some(*keypair.private_key_bytes()),
                })
            }
            Partition::Salts {
                factory,
                init_code_hash,
                cursor,
            } => {
                let salt = match cursor {
                    SaltCursor::Random(rng) => {
                        let mut salt = [0u8; 32];
                        rng.fill_bytes(&mut salt);
                        salt
                    }
                    SaltCursor::Strided { next, stride } => {
                        let salt = *next;
                        advance(next, *stride);
                        salt
                    }
                };
                Some(Candidate {
                    input: DerivationInput::Create2 {
                        factory: *factory,
                        salt,
                        init_code_hash: *init_code_hash,
                    },
                    secret_key: None,
                })
            }
        }
    }
}

/// Adds `step` to a 32-byte big-endian counter (with wrapping).
#[inline]
fn advance(salt: &mut [u8; 32], step: u64) {
    let mut carry = step;
    for byte in salt.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = *byte as u64 + (carry & 0xff);
        *byte = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
}
