//! Terminal styling for type listings.
//!
//! Each field is the escape sequence for one role in a TypeInfo dump line
//! such as `#3 custom Direction { Up, Down (#0) }`.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    /// `#3`
    pub index: &'static str,
    /// `custom`, `record`, `list`
    pub keyword: &'static str,
    /// Custom and alias names.
    pub name: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        index: "\x1b[2m",
        keyword: "\x1b[34m",
        name: "\x1b[32m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        index: "",
        keyword: "",
        name: "",
        reset: "",
    };

    /// `--disable-style` and non-terminal stderr map to `false`.
    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
