//! Transaction metadata and the scripts attached for reference-availability
//! (spec §3.2 supplemented feature). Grounded on
//! `pallas_primitives::conway::PostAlonzoAuxiliaryData` and the tag-259
//! `AuxiliaryData` dispatch in `pallas_primitives::alonzo`; decode accepts
//! every legacy shape, encode always emits the Conway (tag 259) form.

use crate::metadatum::{Metadatum, MetadatumLabel};
use crate::native_script::NativeScript;
use crate::script::PlutusScript;
use minicbor::data::Tag;
use minicbor::{decode::Error as DecodeError, Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Metadata = BTreeMap<MetadatumLabel, Metadatum>;

const POST_ALONZO_AUXILIARY_DATA_TAG: u64 = 259;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAlonzoAuxiliaryData {
    pub metadata: Option<Metadata>,
    pub native_scripts: Option<Vec<NativeScript>>,
    pub plutus_v1_scripts: Option<Vec<PlutusScript<1>>>,
    pub plutus_v2_scripts: Option<Vec<PlutusScript<2>>>,
    pub plutus_v3_scripts: Option<Vec<PlutusScript<3>>>,
}

impl<'b, C> Decode<'b, C> for PostAlonzoAuxiliaryData {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        let mut out = PostAlonzoAuxiliaryData::default();
        let len = d.map()?;
        let mut remaining = len;
        loop {
            match remaining {
                Some(0) => break,
                Some(n) => remaining = Some(n - 1),
                None => {
                    if d.datatype()? == minicbor::data::Type::Break {
                        d.skip()?;
                        break;
                    }
                }
            }
            let idx = d.u8()?;
            match idx {
                0 => out.metadata = Some(d.decode_with(ctx)?),
                1 => out.native_scripts = Some(d.decode_with(ctx)?),
                2 => out.plutus_v1_scripts = Some(d.decode_with(ctx)?),
                3 => out.plutus_v2_scripts = Some(d.decode_with(ctx)?),
                4 => out.plutus_v3_scripts = Some(d.decode_with(ctx)?),
                other => {
                    return Err(DecodeError::message(format!(
                        "unknown post-alonzo auxiliary data field {other}"
                    )))
                }
            }
        }
        Ok(out)
    }
}

impl<C> Encode<C> for PostAlonzoAuxiliaryData {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let len = self.metadata.is_some() as u64
            + self.native_scripts.is_some() as u64
            + self.plutus_v1_scripts.is_some() as u64
            + self.plutus_v2_scripts.is_some() as u64
            + self.plutus_v3_scripts.is_some() as u64;
        e.map(len)?;
        if let Some(metadata) = &self.metadata {
            e.u8(0)?;
            metadata.encode(e, ctx)?;
        }
        if let Some(scripts) = &self.native_scripts {
            e.u8(1)?;
            e.encode_with(scripts, ctx)?;
        }
        if let Some(scripts) = &self.plutus_v1_scripts {
            e.u8(2)?;
            e.encode_with(scripts, ctx)?;
        }
        if let Some(scripts) = &self.plutus_v2_scripts {
            e.u8(3)?;
            e.encode_with(scripts, ctx)?;
        }
        if let Some(scripts) = &self.plutus_v3_scripts {
            e.u8(4)?;
            e.encode_with(scripts, ctx)?;
        }
        Ok(())
    }
}

/// Auxiliary (metadata/scripts) data attached to a transaction, tagged 259
/// on the wire. Older Shelley/ShelleyMa/Alonzo shapes decode transparently
/// into the equivalent Conway fields; this core never constructs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryData(pub PostAlonzoAuxiliaryData);

impl AuxiliaryData {
    pub fn is_empty(&self) -> bool {
        self.0.metadata.is_none()
            && self.0.native_scripts.is_none()
            && self.0.plutus_v1_scripts.is_none()
            && self.0.plutus_v2_scripts.is_none()
            && self.0.plutus_v3_scripts.is_none()
    }
}

impl<'b, C> Decode<'b, C> for AuxiliaryData {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, DecodeError> {
        match d.datatype()? {
            minicbor::data::Type::Map | minicbor::data::Type::MapIndef => {
                // Bare Shelley-era metadata map: label -> metadatum.
                let metadata: Metadata = d.decode_with(ctx)?;
                Ok(AuxiliaryData(PostAlonzoAuxiliaryData {
                    metadata: Some(metadata),
                    ..Default::default()
                }))
            }
            minicbor::data::Type::Array | minicbor::data::Type::ArrayIndef => {
                // ShelleyMa: [metadata, native_scripts].
                d.array()?;
                let metadata: Metadata = d.decode_with(ctx)?;
                let native_scripts: Vec<NativeScript> = d.decode_with(ctx)?;
                Ok(AuxiliaryData(PostAlonzoAuxiliaryData {
                    metadata: Some(metadata),
                    native_scripts: Some(native_scripts),
                    ..Default::default()
                }))
            }
            minicbor::data::Type::Tag => {
                let tag = d.tag()?;
                if tag.as_u64() != POST_ALONZO_AUXILIARY_DATA_TAG {
                    return Err(DecodeError::message(format!(
                        "unexpected auxiliary data tag {}, expected 259",
                        tag.as_u64()
                    )));
                }
                Ok(AuxiliaryData(d.decode_with(ctx)?))
            }
            other => Err(DecodeError::message(format!(
                "unexpected auxiliary data shape {other:?}"
            ))),
        }
    }
}

impl<C> Encode<C> for AuxiliaryData {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.tag(Tag::new(POST_ALONZO_AUXILIARY_DATA_TAG))?;
        self.0.encode(e, ctx)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_metadata_roundtrips() {
        let aux = AuxiliaryData(PostAlonzoAuxiliaryData::default());
        assert!(aux.is_empty());
        let cbor = minicbor::to_vec(&aux).unwrap();
        let back: AuxiliaryData = minicbor::decode(&cbor).unwrap();
        assert_eq!(aux, back);
    }

    #[test]
    fn metadata_with_entry_roundtrips() {
        let mut metadata = Metadata::new();
        metadata.insert(1, Metadatum::text("hello".into()).unwrap());
        let aux = AuxiliaryData(PostAlonzoAuxiliaryData {
            metadata: Some(metadata),
            ..Default::default()
        });
        assert!(!aux.is_empty());
        let cbor = minicbor::to_vec(&aux).unwrap();
        let back: AuxiliaryData = minicbor::decode(&cbor).unwrap();
        assert_eq!(aux, back);
    }

    #[test]
    fn decodes_legacy_bare_metadata_map() {
        let mut metadata = Metadata::new();
        metadata.insert(5, Metadatum::text("legacy".into()).unwrap());
        let cbor = minicbor::to_vec(&metadata).unwrap();
        let aux: AuxiliaryData = minicbor::decode(&cbor).unwrap();
        assert_eq!(aux.0.metadata, Some(metadata));
    }
}
