//! Full account derivation: one seed, coin, and path in, one spendable
//! address with its keys out.

use std::fmt;

use zeroize::Zeroize;

use crate::address;
use crate::coin::Coin;
use crate::path::DerivationPath;
use crate::xkey::ExtendedPrivateKey;
use crate::HdError;

/// Everything derived for one address slot of a coin.
///
/// Secret fields are zeroized when the account is dropped and are kept
/// out of `Debug` output.
pub struct Account {
    coin: Coin,
    path: DerivationPath,
    private_key: [u8; 32],
    wif: Option<String>,
    public_key: [u8; 33],
    address: String,
    xpub: String,
    uri: String,
}

/// Derive the account for a coin at a path.
///
/// The derivation is a pure function of its inputs: the same seed, coin,
/// and path always produce the same account, and independent calls may
/// run concurrently.
///
/// # Arguments
/// * `seed` - 16 to 64 seed bytes, typically a 64-byte stretched seed.
/// * `coin` - The coin profile to render addresses and prefixes with.
/// * `path` - The derivation path of the address slot.
///
/// # Returns
/// The derived account, or the first derivation or encoding error.
pub fn derive(seed: &[u8], coin: Coin, path: &DerivationPath) -> Result<Account, HdError> {
    let profile = coin.profile();
    let master = ExtendedPrivateKey::master(seed)?;

    // The watch-only boundary sits after the last hardened step; the
    // account xpub is taken there so it can derive the remaining normal
    // steps on its own.
    let account_path = path.hardened_prefix();
    let account_node = master.derive_path(&account_path)?;
    let xpub = account_node.to_public().to_base58(profile.xpub_version);

    let mut node = account_node;
    for &step in &path.components()[account_path.len()..] {
        node = node.derive_child(step)?;
    }

    let public = node.to_public();
    let address = address::render(profile.address, &public)?;
    let wif = profile.wif_prefix.map(|prefix| node.to_wif(prefix));
    let uri = format!("{}:{}", profile.uri_scheme, address);

    Ok(Account {
        coin,
        path: path.clone(),
        private_key: node.to_bytes(),
        wif,
        public_key: public.compressed(),
        address,
        xpub,
        uri,
    })
}

/// Derive the `index`-th external address on the coin's default path.
pub fn derive_default(seed: &[u8], coin: Coin, index: u32) -> Result<Account, HdError> {
    derive(seed, coin, &coin.default_address_path(index)?)
}

impl Account {
    /// The coin this account belongs to.
    pub fn coin(&self) -> Coin {
        self.coin
    }

    /// The path the keys were derived at.
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// The raw private key, big-endian.
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    /// The private key in wallet import format, absent for coins
    /// without a WIF convention.
    pub fn wif(&self) -> Option<&str> {
        self.wif.as_deref()
    }

    /// The compressed SEC1 public key.
    pub fn public_key(&self) -> &[u8; 33] {
        &self.public_key
    }

    /// The rendered address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The account-level extended public key, serialized with the
    /// coin's version bytes.
    pub fn xpub(&self) -> &str {
        &self.xpub
    }

    /// A QR-encodable payment URI for the address.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for Account {
    fn drop(&mut self) {
        self.private_key.zeroize();
        self.wif.zeroize();
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("coin", &self.coin)
            .field("path", &self.path.to_string())
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn parse(path: &str) -> DerivationPath {
        DerivationPath::from_str(path).unwrap()
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let seed = [0x5Au8; 64];
        let path = parse("m/84'/0'/0'/0/0");
        let a = derive(&seed, Coin::Bitcoin, &path).unwrap();
        let b = derive(&seed, Coin::Bitcoin, &path).unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(a.private_key(), b.private_key());
        assert_eq!(a.xpub(), b.xpub());
    }

    #[test]
    fn test_coins_do_not_collide() {
        let seed = [0x5Au8; 64];
        let mut addresses = Vec::new();
        for &coin in Coin::all() {
            let account = derive_default(&seed, coin, 0).unwrap();
            assert!(
                !addresses.contains(&account.address().to_string()),
                "{} collides",
                coin
            );
            addresses.push(account.address().to_string());
        }
    }

    #[test]
    fn test_default_index_slots_differ() {
        let seed = [0x11u8; 32];
        let a = derive_default(&seed, Coin::Bitcoin, 0).unwrap();
        let b = derive_default(&seed, Coin::Bitcoin, 1).unwrap();
        assert_ne!(a.address(), b.address());
        // Same account, different slot: the xpub is shared.
        assert_eq!(a.xpub(), b.xpub());
    }

    #[test]
    fn test_wif_presence_follows_profile() {
        let seed = [0x22u8; 64];
        assert!(derive_default(&seed, Coin::Bitcoin, 0).unwrap().wif().is_some());
        assert!(derive_default(&seed, Coin::Ethereum, 0).unwrap().wif().is_none());
    }

    #[test]
    fn test_uri_prefixes_address() {
        let seed = [0x33u8; 64];
        let account = derive_default(&seed, Coin::Dogecoin, 0).unwrap();
        assert_eq!(
            account.uri(),
            format!("dogecoin:{}", account.address())
        );
    }

    #[test]
    fn test_debug_omits_key_material() {
        let seed = [0x44u8; 64];
        let account = derive_default(&seed, Coin::Bitcoin, 0).unwrap();
        let rendered = format!("{:?}", account);
        assert!(rendered.contains(account.address()));
        assert!(!rendered.contains(&hex::encode(account.private_key())));
    }

    // ---- published vectors ----

    #[test]
    fn test_account_vectors() {
        let vectors_json = include_str!("testdata/address_vectors.json");
        let vectors: serde_json::Value = serde_json::from_str(vectors_json).unwrap();

        // The seed is the stretch of the recorded phrase.
        let mnemonic =
            shard_bip39::Mnemonic::from_phrase(vectors["mnemonic"].as_str().unwrap()).unwrap();
        let seed = mnemonic.to_seed(vectors["passphrase"].as_str().unwrap());
        assert_eq!(
            hex::encode(seed.as_bytes()),
            vectors["seed"].as_str().unwrap()
        );

        for entry in vectors["accounts"].as_array().unwrap() {
            let coin = Coin::from_identifier(entry["coin"].as_str().unwrap()).unwrap();
            let profile = coin.profile();
            let account_path = parse(entry["account_path"].as_str().unwrap());
            assert_eq!(account_path, coin.default_account_path());

            let account_node = ExtendedPrivateKey::master(seed.as_bytes())
                .unwrap()
                .derive_path(&account_path)
                .unwrap();
            assert_eq!(
                account_node.to_base58(profile.xprv_version),
                entry["xprv"].as_str().unwrap(),
                "{}: account xprv",
                coin
            );
            assert_eq!(
                account_node.to_public().to_base58(profile.xpub_version),
                entry["xpub"].as_str().unwrap(),
                "{}: account xpub",
                coin
            );

            for external in entry["external"].as_array().unwrap() {
                let path = parse(external["path"].as_str().unwrap());
                let account = derive(seed.as_bytes(), coin, &path)
                    .unwrap_or_else(|e| panic!("{}: derive {}: {}", coin, path, e));

                assert_eq!(
                    hex::encode(account.private_key()),
                    external["private_key"].as_str().unwrap(),
                    "{} {}: private key",
                    coin,
                    path
                );
                assert_eq!(
                    hex::encode(account.public_key()),
                    external["public_key"].as_str().unwrap(),
                    "{} {}: public key",
                    coin,
                    path
                );
                assert_eq!(
                    account.address(),
                    external["address"].as_str().unwrap(),
                    "{} {}: address",
                    coin,
                    path
                );
                assert_eq!(
                    account.wif(),
                    external["wif"].as_str(),
                    "{} {}: wif",
                    coin,
                    path
                );
                assert_eq!(
                    account.uri(),
                    external["uri"].as_str().unwrap(),
                    "{} {}: uri",
                    coin,
                    path
                );
                assert_eq!(account.xpub(), entry["xpub"].as_str().unwrap());
            }
        }
    }
}
