//! Self-encryption collaborator.

use enostr::{nip44, FullKeypair, Keypair, Pubkey};

use crate::{Error, Result};

/// Encrypts content to, and decrypts it from, the owner's own key.
pub trait SelfCipher: Send + Sync {
    fn encrypt(&self, owner: &Pubkey, plaintext: &str) -> Result<String>;

    /// Fails on malformed ciphertext or ciphertext for another key.
    fn decrypt(&self, owner: &Pubkey, ciphertext: &str) -> Result<String>;
}

/// NIP-44 v2 self-encryption with a locally held secret key.
pub struct KeypairCipher {
    keypair: FullKeypair,
}

impl KeypairCipher {
    pub fn new(keypair: FullKeypair) -> Self {
        Self { keypair }
    }

    /// Read-only accounts can't hold private mutes.
    pub fn from_keypair(keypair: Keypair) -> Result<Self> {
        Ok(Self::new(keypair.into_full()?))
    }

    pub fn pubkey(&self) -> &Pubkey {
        &self.keypair.pubkey
    }

    fn check_owner(&self, owner: &Pubkey) -> Result<()> {
        if *owner != self.keypair.pubkey {
            return Err(Error::NotOwner {
                held: self.keypair.pubkey,
                requested: *owner,
            });
        }
        Ok(())
    }
}

impl SelfCipher for KeypairCipher {
    fn encrypt(&self, owner: &Pubkey, plaintext: &str) -> Result<String> {
        self.check_owner(owner)?;
        Ok(nip44::encrypt_to_self(self.keypair.to_filled(), plaintext)?)
    }

    fn decrypt(&self, owner: &Pubkey, ciphertext: &str) -> Result<String> {
        self.check_owner(owner)?;
        Ok(nip44::decrypt_from_self(self.keypair.to_filled(), ciphertext)?)
    }
}
