//! NIP-44 v2 self-encryption
//!
//! Private entries of replaceable lists (NIP-51) are encrypted by the owner to
//! their own public key: the conversation key is derived from the owner's
//! secret key and the owner's own x-only public key, so nobody else observing
//! the event can read the content.

use nostr::nips::nip44;
use nostr::secp256k1::rand::rngs::OsRng;

use crate::{Error, FilledKeypair};

/// Encrypt `plaintext` so that only `keypair` can read it back.
///
/// Returns the base64 NIP-44 v2 payload suitable for an event `content`.
pub fn encrypt_to_self(keypair: FilledKeypair<'_>, plaintext: &str) -> Result<String, Error> {
    let own_pk = keypair.pubkey.to_nostr()?;
    let mut rng = OsRng;
    let payload = nip44::encrypt_with_rng(
        &mut rng,
        keypair.secret_key,
        &own_pk,
        plaintext,
        nip44::Version::V2,
    )?;
    Ok(payload)
}

/// Decrypt a payload produced by [`encrypt_to_self`].
pub fn decrypt_from_self(keypair: FilledKeypair<'_>, payload: &str) -> Result<String, Error> {
    let own_pk = keypair.pubkey.to_nostr()?;
    Ok(nip44::decrypt(keypair.secret_key, &own_pk, payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FullKeypair;

    #[test]
    fn roundtrip() {
        let kp = FullKeypair::generate();
        let plain = r#"[["word","spoilers"],["p","abcd"]]"#;
        let enc = encrypt_to_self(kp.to_filled(), plain).unwrap();
        assert_ne!(enc, plain);
        assert_eq!(decrypt_from_self(kp.to_filled(), &enc).unwrap(), plain);
    }

    #[test]
    fn random_nonce_changes_ciphertext() {
        let kp = FullKeypair::generate();
        let a = encrypt_to_self(kp.to_filled(), "same").unwrap();
        let b = encrypt_to_self(kp.to_filled(), "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn other_key_cannot_decrypt() {
        let kp = FullKeypair::generate();
        let other = FullKeypair::generate();
        let enc = encrypt_to_self(kp.to_filled(), "secret").unwrap();
        assert!(decrypt_from_self(other.to_filled(), &enc).is_err());
    }

    #[test]
    fn garbage_payload_is_an_error() {
        let kp = FullKeypair::generate();
        assert!(matches!(
            decrypt_from_self(kp.to_filled(), "not a payload"),
            Err(Error::Nip44(_))
        ));
    }
}
