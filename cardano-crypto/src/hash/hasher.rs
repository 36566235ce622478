use crate::hash::Hash;
use cryptoxide::blake2b::Blake2b;

/// Streaming Blake2b hasher parameterized by output size in bits.
///
/// Cardano uses 256-bit digests for transaction/block/script-data hashes
/// and 224-bit digests for key and script hashes.
///
/// ```
/// # use cardano_crypto::Hasher;
/// let digest = Hasher::<224>::hash(b"a public key");
/// assert_eq!(digest.as_ref().len(), 28);
/// ```
pub struct Hasher<const BITS: usize>(Blake2b);

impl<const BITS: usize> Hasher<BITS> {
    #[inline]
    pub fn input(&mut self, bytes: &[u8]) {
        use cryptoxide::digest::Digest as _;
        self.0.input(bytes);
    }
}

macro_rules! common_hasher {
    ($size:literal) => {
        impl Hasher<$size> {
            #[inline]
            pub fn new() -> Self {
                Self(Blake2b::new($size / 8))
            }

            #[inline]
            pub fn hash(bytes: &[u8]) -> Hash<{ $size / 8 }> {
                let mut hasher = Self::new();
                hasher.input(bytes);
                hasher.finalize()
            }

            /// Hashes a one-byte discriminant followed by `bytes`, the
            /// convention used for script hashes (native/Plutus v1/v2/v3
            /// each prepend a distinct tag byte before hashing).
            #[inline]
            pub fn hash_tagged(bytes: &[u8], tag: u8) -> Hash<{ $size / 8 }> {
                let mut hasher = Self::new();
                hasher.input(&[tag]);
                hasher.input(bytes);
                hasher.finalize()
            }

            /// Hashes the canonical CBOR encoding of `data` directly,
            /// streaming it through the hasher instead of allocating an
            /// intermediate buffer.
            #[inline]
            pub fn hash_cbor(data: &impl minicbor::Encode<()>) -> Hash<{ $size / 8 }> {
                let mut hasher = Self::new();
                minicbor::encode(data, &mut hasher).expect("hashing a writer is infallible");
                hasher.finalize()
            }

            #[inline]
            pub fn hash_tagged_cbor(
                data: &impl minicbor::Encode<()>,
                tag: u8,
            ) -> Hash<{ $size / 8 }> {
                let mut hasher = Self::new();
                hasher.input(&[tag]);
                minicbor::encode(data, &mut hasher).expect("hashing a writer is infallible");
                hasher.finalize()
            }

            pub fn finalize(mut self) -> Hash<{ $size / 8 }> {
                use cryptoxide::digest::Digest as _;
                let mut hash = [0; $size / 8];
                self.0.result(&mut hash);
                Hash::new(hash)
            }
        }

        impl Default for Hasher<$size> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

common_hasher!(160);
common_hasher!(224);
common_hasher!(256);

impl<'a, const BITS: usize> minicbor::encode::Write for &'a mut Hasher<BITS> {
    type Error = std::convert::Infallible;

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.input(buf);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_256_matches_known_vector() {
        let digest = Hasher::<256>::hash(b"My transaction");
        assert_eq!(
            digest.to_string(),
            "0d8d00cdd4657ac84d82f0a56067634a7adfdf43da41cb534bcaa45060973d21"
        );
    }

    #[test]
    fn hash_224_matches_known_vector() {
        let digest = Hasher::<224>::hash(b"My Public Key");
        assert_eq!(
            digest.to_string(),
            "c123c9bc0e9e31a20a4aa23518836ec5fb54bdc85735c56b38eb79a5"
        );
    }

    #[test]
    fn incremental_input_matches_one_shot() {
        let mut hasher = Hasher::<256>::new();
        hasher.input(b"My ");
        hasher.input(b"transaction");
        assert_eq!(hasher.finalize(), Hasher::<256>::hash(b"My transaction"));
    }
}
