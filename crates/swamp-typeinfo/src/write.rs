//! Binary encoder.

use crate::chunk::{InfoIndex, InfoType, TypeInfoChunk};
use crate::{MAX_TYPES, VERSION};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("type table has {0} entries, at most {max} fit one-byte indices", max = MAX_TYPES)]
    TooManyTypes(usize),
    #[error("name `{0}` is longer than 255 bytes")]
    StringTooLong(String),
    #[error("entry #{index} has {count} members, at most 255 are supported")]
    TooManyMembers { index: usize, count: usize },
    #[error("not supporting local types: `{0}` must be concretized before serialization")]
    LocalTypeNotSupported(String),
}

impl TypeInfoChunk {
    pub fn to_bytes(&self) -> Result<Vec<u8>, WriteError> {
        let entries = self.entries();
        if entries.len() > MAX_TYPES {
            return Err(WriteError::TooManyTypes(entries.len()));
        }

        let mut out = Writer {
            bytes: Vec::with_capacity(4 + entries.len() * 4),
        };
        out.u8(VERSION.0);
        out.u8(VERSION.1);
        out.u8(VERSION.2);
        out.u8(entries.len() as u8);

        for (index, entry) in entries.iter().enumerate() {
            out.entry(index, entry)?;
        }
        Ok(out.bytes)
    }
}

struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    fn u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    fn index(&mut self, index: InfoIndex) {
        // Every index is below the entry count, which was checked against MAX_TYPES.
        self.bytes.push(index.get() as u8);
    }

    fn string(&mut self, s: &str) -> Result<(), WriteError> {
        let len = u8::try_from(s.len()).map_err(|_| WriteError::StringTooLong(s.to_owned()))?;
        self.bytes.push(len);
        self.bytes.extend_from_slice(s.as_bytes());
        Ok(())
    }

    fn count(&mut self, index: usize, count: usize) -> Result<(), WriteError> {
        let v = u8::try_from(count).map_err(|_| WriteError::TooManyMembers { index, count })?;
        self.bytes.push(v);
        Ok(())
    }

    fn indices(&mut self, index: usize, items: &[InfoIndex]) -> Result<(), WriteError> {
        self.count(index, items.len())?;
        for &item in items {
            self.index(item);
        }
        Ok(())
    }

    fn entry(&mut self, index: usize, entry: &InfoType) -> Result<(), WriteError> {
        if let InfoType::LocalType { name } = entry {
            return Err(WriteError::LocalTypeNotSupported(name.clone()));
        }
        self.u8(entry.kind() as u8);

        match entry {
            InfoType::Custom { name, variants } => {
                self.string(name)?;
                self.count(index, variants.len())?;
                for variant in variants {
                    self.string(&variant.name)?;
                    self.indices(index, &variant.parameters)?;
                }
            }
            InfoType::Function { parameters } => self.indices(index, parameters)?,
            InfoType::Tuple { elements } => self.indices(index, elements)?,
            InfoType::Alias { name, target } => {
                self.string(name)?;
                self.index(*target);
            }
            InfoType::Record { fields } => {
                self.count(index, fields.len())?;
                for field in fields {
                    self.string(&field.name)?;
                    self.index(field.ty);
                }
            }
            InfoType::List(inner) | InfoType::Array(inner) => self.index(*inner),
            InfoType::Int
            | InfoType::Fixed
            | InfoType::Bool
            | InfoType::String
            | InfoType::Char
            | InfoType::Blob
            | InfoType::ResourceName
            | InfoType::TypeRef
            | InfoType::Any
            | InfoType::Unmanaged
            | InfoType::AnyMatching
            | InfoType::LocalType { .. } => {}
        }
        Ok(())
    }
}
