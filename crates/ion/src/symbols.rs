//! Ion symbol table management.

use std::collections::HashMap;

use crate::constants::SYSTEM_SYMBOLS;

/// Ion symbol table: the system symbols followed by one local layer.
///
/// Symbol IDs are 1-based. System symbols occupy IDs 1..=9 and local
/// symbols start at ID 10. A local slot may have unknown text (`None`) when a
/// symbol table declared a non-string entry; such a slot still takes an ID.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Text per ID; index 0 is `$0`.
    slots: Vec<Option<String>>,
    /// Reverse lookup: text → lowest ID carrying it.
    lookup: HashMap<String, u32>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a table holding only the system symbols.
    pub fn new() -> Self {
        let mut table = Self {
            slots: vec![None],
            lookup: HashMap::new(),
        };
        for sym in SYSTEM_SYMBOLS.iter().skip(1) {
            table.push(Some((*sym).to_owned()));
        }
        table
    }

    /// Number of symbol IDs carried by the system table.
    pub fn system_len() -> u32 {
        (SYSTEM_SYMBOLS.len() - 1) as u32
    }

    /// Highest assigned symbol ID.
    pub fn max_id(&self) -> u32 {
        (self.slots.len() - 1) as u32
    }

    /// Looks up a symbol text and returns its ID.
    pub fn get_id(&self, text: &str) -> Option<u32> {
        self.lookup.get(text).copied()
    }

    /// Returns the text for a symbol ID. `None` for out-of-range IDs and
    /// for slots whose text is unknown.
    pub fn get_text(&self, id: u32) -> Option<&str> {
        self.slots.get(id as usize).and_then(|slot| slot.as_deref())
    }

    /// Interns `text`, returning its existing ID or assigning the next one.
    pub fn intern(&mut self, text: &str) -> u32 {
        if let Some(id) = self.lookup.get(text) {
            return *id;
        }
        self.push(Some(text.to_owned()))
    }

    /// Appends declared local symbols; every entry takes an ID, duplicates included.
    pub fn append<I>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = Option<String>>,
    {
        for symbol in symbols {
            self.push(symbol);
        }
    }

    /// Drops all local symbols, keeping the system table.
    pub fn reset(&mut self) {
        let system_len = Self::system_len();
        self.slots.truncate(system_len as usize + 1);
        self.lookup.retain(|_, id| *id <= system_len);
    }

    /// Returns `true` if any local symbols have been assigned.
    pub fn has_local_symbols(&self) -> bool {
        self.max_id() > Self::system_len()
    }

    /// Local symbol texts in ID order.
    pub fn local_symbols(&self) -> impl Iterator<Item = Option<&str>> {
        self.slots
            .iter()
            .skip(Self::system_len() as usize + 1)
            .map(|slot| slot.as_deref())
    }

    fn push(&mut self, symbol: Option<String>) -> u32 {
        let id = self.slots.len() as u32;
        if let Some(text) = &symbol {
            self.lookup.entry(text.clone()).or_insert(id);
        }
        self.slots.push(symbol);
        id
    }
}
