//! State shared by every package of one build.

use swamp_core::SourceMap;

use crate::diagnostics::Diagnostics;
use crate::prelude::Prelude;
use crate::resources::ResourceNames;
use crate::types::TypeArena;

#[derive(Debug)]
pub struct Session {
    pub types: TypeArena,
    pub sources: SourceMap,
    pub prelude: Prelude,
    pub resources: ResourceNames,
}

impl Session {
    /// Fresh session with the prelude compiled.
    pub fn new() -> Result<Self, Diagnostics> {
        let mut types = TypeArena::new();
        let mut sources = SourceMap::new();
        let prelude = Prelude::bootstrap(&mut types, &mut sources)?;
        Ok(Self {
            types,
            sources,
            prelude,
            resources: ResourceNames::new(),
        })
    }
}
