use primitive_types::U256;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

mod units;

pub use units::{AmountError, DecimalAmount, format_units, parse_units};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,
    #[error("address must be 40 hex digits, got {0}")]
    BadLength(usize),
    #[error("address contains non-hex characters")]
    NotHex,
}

/// 20-byte EVM account or contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;
        if digits.len() != 40 {
            return Err(AddressError::BadLength(digits.len()));
        }
        let mut bytes = [0_u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::NotHex)?;
        Ok(Self(bytes))
    }

    /// Const constructor for hard-coded addresses; malformed literals fail at compile time.
    pub const fn from_literal(literal: &str) -> Self {
        let b = literal.as_bytes();
        assert!(
            b.len() == 42 && b[0] == b'0' && (b[1] == b'x' || b[1] == b'X'),
            "address literal must be 0x followed by 40 hex digits"
        );
        let mut out = [0_u8; 20];
        let mut i = 0;
        while i < 20 {
            out[i] = (hex_nibble(b[2 + 2 * i]) << 4) | hex_nibble(b[3 + 2 * i]);
            i += 1;
        }
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case rendering, as wallets display it.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// `0x5aAe...eAed` form used in the address label.
    pub fn short(&self) -> String {
        let full = self.to_checksum();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("non-hex digit in address literal"),
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

/// Raw token quantity in base units (uint256 on chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    pub const ZERO: Self = Self(U256([0; 4]));

    pub fn from_u128(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// The three user-triggered vault actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Stake,
    Unstake,
    Claim,
}

impl ActionKind {
    pub fn takes_amount(self) -> bool {
        matches!(self, Self::Stake | Self::Unstake)
    }

    pub fn needs_approval(self) -> bool {
        matches!(self, Self::Stake)
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Stake => "Staking...",
            Self::Unstake => "Unstaking...",
            Self::Claim => "Claiming...",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::Stake => "Successfully staked!",
            Self::Unstake => "Successfully unstaked!",
            Self::Claim => "Successfully claimed rewards!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Stake => "Failed to stake. Please try again.",
            Self::Unstake => "Failed to unstake. Please try again.",
            Self::Claim => "Failed to claim rewards. Please try again.",
        }
    }

    pub fn invalid_amount_message(self) -> &'static str {
        match self {
            Self::Stake => "Please enter a valid amount to stake.",
            Self::Unstake => "Please enter a valid amount to unstake.",
            Self::Claim => "Please enter a valid amount.",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stake => "stake",
            Self::Unstake => "unstake",
            Self::Claim => "claim",
        };
        f.write_str(name)
    }
}

/// Four values read fresh from the contracts on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub wallet_balance: TokenAmount,
    pub staked_amount: TokenAmount,
    pub pending_rewards: TokenAmount,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSnapshot {
    pub wallet_balance: String,
    pub staked_amount: String,
    pub pending_rewards: String,
}

impl DisplaySnapshot {
    pub fn format(&self, symbol: &str) -> FormattedSnapshot {
        let render = |amount: &TokenAmount| format!("{} {symbol}", format_units(amount, self.decimals));
        FormattedSnapshot {
            wallet_balance: render(&self.wallet_balance),
            staked_amount: render(&self.staked_amount),
            pending_rewards: render(&self.pending_rewards),
        }
    }
}
