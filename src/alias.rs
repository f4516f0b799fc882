use std::fmt;

/// A single `name -> value` alias definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub value: String,
}

impl fmt::Display for Alias {
    /// Formats the alias the way `alias` lists it: `name='value'`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}'", self.name, self.value)
    }
}

/// Ordered table of aliases. Names are unique; redefining a name replaces its value
/// in place.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<Alias>,
}

impl AliasTable {
    pub fn get(&self, name: &str) -> Option<&Alias> {
        self.entries.iter().find(|a| a.name == name)
    }

    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|a| a.name == name) {
            Some(alias) => alias.value = value,
            None => self.entries.push(Alias { name, value }),
        }
    }

    /// Remove an alias, returning it if it was defined.
    pub fn remove(&mut self, name: &str) -> Option<Alias> {
        let pos = self.entries.iter().position(|a| a.name == name)?;
        Some(self.entries.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alias> {
        self.entries.iter()
    }
}
