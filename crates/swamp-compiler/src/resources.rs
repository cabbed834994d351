use indexmap::IndexMap;

/// Numbers resource-name literals (`@sprites/player`) for the backend.
pub trait ResourceLookup {
    fn lookup_resource_id(&mut self, name: &str) -> u32;
}

/// Session-wide resource table. Ids are assigned on first use, from zero.
#[derive(Debug, Clone, Default)]
pub struct ResourceNames {
    ids: IndexMap<String, u32>,
}

impl ResourceNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Names in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ids.iter().map(|(name, &id)| (name.as_str(), id))
    }
}

impl ResourceLookup for ResourceNames {
    fn lookup_resource_id(&mut self, name: &str) -> u32 {
        let next = self.ids.len() as u32;
        *self.ids.entry(name.to_string()).or_insert(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_stable() {
        let mut names = ResourceNames::new();
        assert_eq!(names.lookup_resource_id("sprites/player"), 0);
        assert_eq!(names.lookup_resource_id("sounds/jump"), 1);
        assert_eq!(names.lookup_resource_id("sprites/player"), 0);
        assert_eq!(names.len(), 2);

        let listed: Vec<_> = names.iter().collect();
        assert_eq!(listed, vec![("sprites/player", 0), ("sounds/jump", 1)]);
    }
}
