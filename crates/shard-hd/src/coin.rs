//! Closed registry of supported coins and their derivation profiles.

use std::fmt;
use std::str::FromStr;

use crate::path::{ChildNumber, DerivationPath, HARDENED_OFFSET};
use crate::HdError;

/// How a coin renders a public key as a spendable address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// Native SegWit pay-to-witness-public-key-hash, Bech32 encoded.
    P2wpkh {
        /// Human-readable part of the Bech32 string.
        hrp: &'static str,
    },
    /// Legacy pay-to-public-key-hash, Base58Check encoded.
    P2pkh {
        /// Version byte prepended to the public key hash.
        version: u8,
    },
    /// EVM hex address with the mixed-case checksum.
    Eip55,
}

/// Everything that differs between supported coins.
#[derive(Debug, Clone, Copy)]
pub struct CoinProfile {
    /// Canonical lowercase identifier.
    pub name: &'static str,
    /// Short ticker accepted as an alternate identifier.
    pub ticker: &'static str,
    /// Scheme for payment URIs.
    pub uri_scheme: &'static str,
    /// Default account-level path as raw child numbers.
    pub account_path: [u32; 3],
    /// Address rendering for this coin.
    pub address: AddressKind,
    /// WIF prefix byte, absent for coins without a WIF convention.
    pub wif_prefix: Option<u8>,
    /// Version bytes for serialized extended private keys.
    pub xprv_version: [u8; 4],
    /// Version bytes for serialized extended public keys.
    pub xpub_version: [u8; 4],
}

const BITCOIN: CoinProfile = CoinProfile {
    name: "bitcoin",
    ticker: "btc",
    uri_scheme: "bitcoin",
    account_path: [HARDENED_OFFSET | 84, HARDENED_OFFSET, HARDENED_OFFSET],
    address: AddressKind::P2wpkh { hrp: "bc" },
    wif_prefix: Some(0x80),
    xprv_version: [0x04, 0xB2, 0x43, 0x0C],
    xpub_version: [0x04, 0xB2, 0x47, 0x46],
};

const LITECOIN: CoinProfile = CoinProfile {
    name: "litecoin",
    ticker: "ltc",
    uri_scheme: "litecoin",
    account_path: [HARDENED_OFFSET | 84, HARDENED_OFFSET | 2, HARDENED_OFFSET],
    address: AddressKind::P2wpkh { hrp: "ltc" },
    wif_prefix: Some(0xB0),
    xprv_version: [0x01, 0x9D, 0x9C, 0xFE],
    xpub_version: [0x01, 0x9D, 0xA4, 0x62],
};

const DOGECOIN: CoinProfile = CoinProfile {
    name: "dogecoin",
    ticker: "doge",
    uri_scheme: "dogecoin",
    account_path: [HARDENED_OFFSET | 44, HARDENED_OFFSET | 3, HARDENED_OFFSET],
    address: AddressKind::P2pkh { version: 0x1E },
    wif_prefix: Some(0x9E),
    xprv_version: [0x02, 0xFA, 0xC3, 0x98],
    xpub_version: [0x02, 0xFA, 0xCA, 0xFD],
};

const ETHEREUM: CoinProfile = CoinProfile {
    name: "ethereum",
    ticker: "eth",
    uri_scheme: "ethereum",
    account_path: [HARDENED_OFFSET | 44, HARDENED_OFFSET | 60, HARDENED_OFFSET],
    address: AddressKind::Eip55,
    wif_prefix: None,
    xprv_version: [0x04, 0x88, 0xAD, 0xE4],
    xpub_version: [0x04, 0x88, 0xB2, 0x1E],
};

/// A supported coin.
///
/// The set is closed: every variant carries a static [`CoinProfile`]
/// describing its paths, encodings, and version bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coin {
    /// Bitcoin, native SegWit addresses.
    Bitcoin,
    /// Litecoin, native SegWit addresses.
    Litecoin,
    /// Dogecoin, legacy Base58Check addresses.
    Dogecoin,
    /// Ethereum, EIP-55 checksummed hex addresses.
    Ethereum,
}

impl Coin {
    /// Every supported coin, in registry order.
    pub fn all() -> &'static [Coin] {
        &[Coin::Bitcoin, Coin::Litecoin, Coin::Dogecoin, Coin::Ethereum]
    }

    /// Look a coin up by name or ticker, case-insensitively.
    ///
    /// # Arguments
    /// * `identifier` - "bitcoin", "btc", "ethereum", "eth", and so on.
    ///
    /// # Returns
    /// The coin, or `UnsupportedCoin` for anything unregistered.
    pub fn from_identifier(identifier: &str) -> Result<Coin, HdError> {
        let lowered = identifier.to_ascii_lowercase();
        for &coin in Coin::all() {
            let profile = coin.profile();
            if lowered == profile.name || lowered == profile.ticker {
                return Ok(coin);
            }
        }
        Err(HdError::UnsupportedCoin(identifier.to_string()))
    }

    /// The canonical lowercase identifier.
    pub fn identifier(&self) -> &'static str {
        self.profile().name
    }

    /// The profile backing this coin.
    pub fn profile(&self) -> &'static CoinProfile {
        match self {
            Coin::Bitcoin => &BITCOIN,
            Coin::Litecoin => &LITECOIN,
            Coin::Dogecoin => &DOGECOIN,
            Coin::Ethereum => &ETHEREUM,
        }
    }

    /// The coin's default account-level path, for example `m/84'/0'/0'`.
    pub fn default_account_path(&self) -> DerivationPath {
        let steps: Vec<ChildNumber> = self
            .profile()
            .account_path
            .iter()
            .map(|&raw| ChildNumber::from_raw(raw))
            .collect();
        DerivationPath::from(steps)
    }

    /// The default path of the `index`-th external address, for example
    /// `m/84'/0'/0'/0/7`.
    pub fn default_address_path(&self, index: u32) -> Result<DerivationPath, HdError> {
        Ok(self
            .default_account_path()
            .child(ChildNumber::normal(0)?)
            .child(ChildNumber::normal(index)?))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Coin {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coin::from_identifier(s)
    }
}
