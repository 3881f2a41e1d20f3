use crate::{Error, Pubkey, SecretKey};

/// An account identity. Read-only accounts carry no secret key and can't
/// sign or decrypt anything.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Keypair {
    pub pubkey: Pubkey,
    pub secret_key: Option<SecretKey>,
}

impl Keypair {
    pub fn from_secret(secret_key: SecretKey) -> Self {
        FullKeypair::from_secret(secret_key).into()
    }

    pub fn only_pubkey(pubkey: Pubkey) -> Self {
        Keypair {
            pubkey,
            secret_key: None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.secret_key.is_none()
    }

    pub fn to_filled(&self) -> Option<FilledKeypair<'_>> {
        self.secret_key
            .as_ref()
            .map(|secret_key| FilledKeypair::new(&self.pubkey, secret_key))
    }

    /// Upgrade to a [`FullKeypair`], failing for read-only accounts.
    pub fn into_full(self) -> Result<FullKeypair, Error> {
        match self.secret_key {
            Some(secret_key) => Ok(FullKeypair::new(self.pubkey, secret_key)),
            None => Err(Error::MissingSecretKey),
        }
    }
}

impl From<FullKeypair> for Keypair {
    fn from(full: FullKeypair) -> Self {
        Keypair {
            pubkey: full.pubkey,
            secret_key: Some(full.secret_key),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct FullKeypair {
    pub pubkey: Pubkey,
    pub secret_key: SecretKey,
}

/// Borrowed view of a [`FullKeypair`], what the crypto helpers take.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct FilledKeypair<'a> {
    pub pubkey: &'a Pubkey,
    pub secret_key: &'a SecretKey,
}

impl<'a> FilledKeypair<'a> {
    pub fn new(pubkey: &'a Pubkey, secret_key: &'a SecretKey) -> Self {
        FilledKeypair { pubkey, secret_key }
    }
}

impl FullKeypair {
    pub fn new(pubkey: Pubkey, secret_key: SecretKey) -> Self {
        FullKeypair { pubkey, secret_key }
    }

    pub fn from_secret(secret_key: SecretKey) -> Self {
        let pubkey = nostr::Keys::new(secret_key.clone()).public_key();
        FullKeypair::new(Pubkey::new(pubkey.to_bytes()), secret_key)
    }

    pub fn to_filled(&self) -> FilledKeypair<'_> {
        FilledKeypair::new(&self.pubkey, &self.secret_key)
    }

    pub fn generate() -> Self {
        let mut rng = nostr::secp256k1::rand::rngs::OsRng;
        let (secret_key, _) = &nostr::SECP256K1.generate_keypair(&mut rng);
        let (xopk, _) = secret_key.x_only_public_key(&nostr::SECP256K1);
        FullKeypair::new(
            Pubkey::new(xopk.serialize()),
            nostr::SecretKey::from(*secret_key),
        )
    }
}

impl std::fmt::Display for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let access = if self.is_read_only() {
            "read-only"
        } else {
            "signer"
        };
        write!(f, "{} ({access})", self.pubkey)
    }
}
