//! Binary decoder.

use crate::VERSION;
use crate::chunk::{InfoField, InfoIndex, InfoType, InfoVariant, TypeInfoChunk};
use crate::kind::InfoKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("unexpected end of data at byte {0}")]
    UnexpectedEnd(usize),
    #[error("unsupported version {0}.{1}.{2}")]
    UnsupportedVersion(u8, u8, u8),
    #[error("unknown kind tag {tag} at byte {offset}")]
    UnknownKind { tag: u8, offset: usize },
    #[error("invalid UTF-8 in name at byte {0}")]
    InvalidUtf8(usize),
    #[error("type index {index} out of range (table has {count} entries)")]
    IndexOutOfRange { index: usize, count: usize },
}

impl TypeInfoChunk {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReadError> {
        let mut r = Reader {
            bytes,
            pos: 0,
            seen: Vec::new(),
        };
        let (major, minor, patch) = (r.u8()?, r.u8()?, r.u8()?);
        if (major, minor) != (VERSION.0, VERSION.1) {
            return Err(ReadError::UnsupportedVersion(major, minor, patch));
        }

        let count = r.u8()? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(r.entry()?);
        }

        for index in r.seen {
            if index >= count {
                return Err(ReadError::IndexOutOfRange { index, count });
            }
        }
        Ok(TypeInfoChunk::from_entries(entries))
    }
}

struct Reader<'b> {
    bytes: &'b [u8],
    pos: usize,
    seen: Vec<usize>,
}

impl Reader<'_> {
    fn u8(&mut self) -> Result<u8, ReadError> {
        let v = *self
            .bytes
            .get(self.pos)
            .ok_or(ReadError::UnexpectedEnd(self.pos))?;
        self.pos += 1;
        Ok(v)
    }

    fn index(&mut self) -> Result<InfoIndex, ReadError> {
        let index = self.u8()? as usize;
        self.seen.push(index);
        Ok(InfoIndex::new(index))
    }

    fn indices(&mut self) -> Result<Vec<InfoIndex>, ReadError> {
        let count = self.u8()?;
        (0..count).map(|_| self.index()).collect()
    }

    fn string(&mut self) -> Result<String, ReadError> {
        let len = self.u8()? as usize;
        let start = self.pos;
        let raw = self
            .bytes
            .get(start..start + len)
            .ok_or(ReadError::UnexpectedEnd(self.bytes.len()))?;
        self.pos += len;
        String::from_utf8(raw.to_vec()).map_err(|_| ReadError::InvalidUtf8(start))
    }

    fn entry(&mut self) -> Result<InfoType, ReadError> {
        let offset = self.pos;
        let tag = self.u8()?;
        let kind = InfoKind::from_u8(tag)
            .filter(|k| *k != InfoKind::LocalType)
            .ok_or(ReadError::UnknownKind { tag, offset })?;

        let entry = match kind {
            InfoKind::Custom => {
                let name = self.string()?;
                let count = self.u8()?;
                let mut variants = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let name = self.string()?;
                    let parameters = self.indices()?;
                    variants.push(InfoVariant { name, parameters });
                }
                InfoType::Custom { name, variants }
            }
            InfoKind::Function => InfoType::Function {
                parameters: self.indices()?,
            },
            InfoKind::Tuple => InfoType::Tuple {
                elements: self.indices()?,
            },
            InfoKind::Alias => {
                let name = self.string()?;
                let target = self.index()?;
                InfoType::Alias { name, target }
            }
            InfoKind::Record => {
                let count = self.u8()?;
                let mut fields = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let name = self.string()?;
                    let ty = self.index()?;
                    fields.push(InfoField { name, ty });
                }
                InfoType::Record { fields }
            }
            InfoKind::List => InfoType::List(self.index()?),
            InfoKind::Array => InfoType::Array(self.index()?),
            InfoKind::String => InfoType::String,
            InfoKind::Int => InfoType::Int,
            InfoKind::Fixed => InfoType::Fixed,
            InfoKind::Bool => InfoType::Bool,
            InfoKind::Blob => InfoType::Blob,
            InfoKind::ResourceName => InfoType::ResourceName,
            InfoKind::Char => InfoType::Char,
            InfoKind::TypeRef => InfoType::TypeRef,
            InfoKind::Any => InfoType::Any,
            InfoKind::Unmanaged => InfoType::Unmanaged,
            InfoKind::AnyMatching => InfoType::AnyMatching,
            InfoKind::LocalType => return Err(ReadError::UnknownKind { tag, offset }),
        };
        Ok(entry)
    }
}
