//! Minimal Solidity ABI encoding for the token and vault calls.
//!
//! Only static `address` and `uint256` arguments are needed, so every
//! argument is one 32-byte word.

use anyhow::{Context, Result, bail};
use dg_api_types::Address;
use primitive_types::U256;
use sha3::{Digest, Keccak256};

pub const APPROVE: &str = "approve(address,uint256)";
pub const BALANCE_OF: &str = "balanceOf(address)";
pub const DECIMALS: &str = "decimals()";
pub const STAKE: &str = "stake(uint256)";
pub const UNSTAKE: &str = "unstake(uint256)";
pub const CLAIM: &str = "claim()";
pub const STAKED_OF: &str = "stakedOf(address)";
pub const PENDING_REWARDS: &str = "pendingRewards(address)";

#[derive(Debug, Clone, Copy)]
pub enum Token {
    Address(Address),
    Uint(U256),
}

impl Token {
    fn word(&self) -> [u8; 32] {
        let mut word = [0_u8; 32];
        match self {
            Token::Address(addr) => word[12..].copy_from_slice(addr.as_bytes()),
            Token::Uint(value) => value.to_big_endian(&mut word),
        }
        word
    }
}

pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0_u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// `0x`-prefixed calldata for `signature(args...)`.
pub fn encode_call(signature: &str, args: &[Token]) -> String {
    let mut data = Vec::with_capacity(4 + 32 * args.len());
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(&arg.word());
    }
    format!("0x{}", hex::encode(data))
}

/// First return word of an `eth_call` result as uint256.
pub fn decode_uint(data: &str) -> Result<U256> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    let Some(word) = digits.get(..64) else {
        bail!("call returned {} bytes of data, expected a 32-byte hex word", digits.len());
    };
    let bytes = hex::decode(word).context("call result is not hex")?;
    Ok(U256::from_big_endian(&bytes))
}

pub fn decode_u8(data: &str) -> Result<u8> {
    let value = decode_uint(data)?;
    if value > U256::from(u8::MAX) {
        bail!("value {value} does not fit in uint8");
    }
    Ok(value.low_u32() as u8)
}

/// Parse a JSON-RPC quantity such as `0x1b4`.
pub fn parse_quantity(value: &str) -> Result<u64> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(digits, 16).with_context(|| format!("bad quantity {value}"))
}
