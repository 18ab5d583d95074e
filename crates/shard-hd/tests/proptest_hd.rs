use std::str::FromStr;

use proptest::prelude::*;

use shard_hd::{derive, derive_default, ChildNumber, Coin, DerivationPath, ExtendedPrivateKey};

fn seed_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 16..=64)
}

fn any_coin() -> impl Strategy<Value = Coin> {
    prop::sample::select(Coin::all())
}

fn any_path() -> impl Strategy<Value = DerivationPath> {
    prop::collection::vec(any::<u32>(), 0..8).prop_map(|raws| {
        let steps: Vec<ChildNumber> = raws.into_iter().map(ChildNumber::from_raw).collect();
        DerivationPath::from(steps)
    })
}

fn normal_path() -> impl Strategy<Value = DerivationPath> {
    prop::collection::vec(0u32..0x8000_0000, 0..5).prop_map(|indexes| {
        let steps: Vec<ChildNumber> = indexes
            .into_iter()
            .map(|i| ChildNumber::normal(i).unwrap())
            .collect();
        DerivationPath::from(steps)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn derivation_is_deterministic(
        seed in seed_bytes(),
        coin in any_coin(),
        index in 0u32..1_000
    ) {
        let first = derive_default(&seed, coin, index).unwrap();
        let second = derive_default(&seed, coin, index).unwrap();
        prop_assert_eq!(first.address(), second.address());
        prop_assert_eq!(first.private_key(), second.private_key());
        prop_assert_eq!(first.xpub(), second.xpub());
        prop_assert_eq!(first.uri(), second.uri());
    }

    #[test]
    fn address_slots_do_not_collide(
        seed in seed_bytes(),
        coin in any_coin(),
        first_index in 0u32..1_000,
        second_index in 0u32..1_000
    ) {
        prop_assume!(first_index != second_index);
        let first = derive_default(&seed, coin, first_index).unwrap();
        let second = derive_default(&seed, coin, second_index).unwrap();
        prop_assert_ne!(first.address(), second.address());
        prop_assert_ne!(first.private_key(), second.private_key());
    }

    #[test]
    fn coins_do_not_collide(seed in seed_bytes(), index in 0u32..1_000) {
        let mut addresses: Vec<String> = Vec::new();
        for &coin in Coin::all() {
            let account = derive_default(&seed, coin, index).unwrap();
            prop_assert!(!addresses.contains(&account.address().to_string()));
            addresses.push(account.address().to_string());
        }
    }

    #[test]
    fn path_text_roundtrips(path in any_path()) {
        let rendered = path.to_string();
        let parsed = DerivationPath::from_str(&rendered).unwrap();
        prop_assert_eq!(parsed, path);
    }

    #[test]
    fn watch_only_derivation_matches_private(
        seed in seed_bytes(),
        path in normal_path()
    ) {
        let master = ExtendedPrivateKey::master(&seed).unwrap();
        let via_private = master.derive_path(&path).unwrap().to_public();
        let via_public = master.to_public().derive_path(&path).unwrap();
        prop_assert_eq!(via_private, via_public);
    }

    #[test]
    fn account_xpub_covers_default_slots(
        seed in seed_bytes(),
        coin in any_coin(),
        index in 0u32..1_000
    ) {
        // The slot path extends the account path, so the account xpub
        // can reach the slot's public key with normal steps only.
        let path = coin.default_address_path(index).unwrap();
        let account = derive(&seed, coin, &path).unwrap();

        let master = ExtendedPrivateKey::master(&seed).unwrap();
        let account_node = master.derive_path(&coin.default_account_path()).unwrap();
        let remainder = DerivationPath::from(path.components()[3..].to_vec());
        let slot = account_node.to_public().derive_path(&remainder).unwrap();
        prop_assert_eq!(&slot.compressed(), account.public_key());
    }
}
