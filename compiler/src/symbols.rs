//! Global symbol table: registers, memory slots and constants.
//!
//! Each section is a growable array of [`Variable`] slots. A slot holding
//! [`Identifier::Free`] is unused. `add` fills slots in order from a cursor
//! and reuses holes before it grows the array; `free` pulls the cursor back
//! so the next `add` lands in the hole.

use memory::REGISTER_COUNT;
use tracing::trace;
use vv_parser::Symbol;

/// Initial number of slots per section.
pub const STORAGE_DEFAULT: usize = 16;
/// Slots added when a section is full.
pub const SYM_TABLE_STEP: usize = 2;

/// What occupies a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Identifier {
    #[default]
    Free,
    /// Occupied but unnamed, e.g. a hardware register or a temporary.
    Nameless,
    True,
    False,
    Nil,
    Symbol(Symbol),
}

impl Identifier {
    pub fn is_free(self) -> bool {
        self == Identifier::Free
    }
}

impl From<Symbol> for Identifier {
    fn from(symbol: Symbol) -> Self {
        Identifier::Symbol(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Register,
    Memory,
    Constant,
    /// Function-local slot owned by a [`crate::Field`].
    Local,
}

/// The three sections of the global table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Register,
    Memory,
    Constant,
}

impl From<SectionKind> for StorageClass {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Register => StorageClass::Register,
            SectionKind::Memory => StorageClass::Memory,
            SectionKind::Constant => StorageClass::Constant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub identifier: Identifier,
    pub class: StorageClass,
    /// Slot position within its section.
    pub index: usize,
}

impl Variable {
    pub fn free(class: StorageClass, index: usize) -> Self {
        Self {
            identifier: Identifier::Free,
            class,
            index,
        }
    }

    pub fn is_free(&self) -> bool {
        self.identifier.is_free()
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    class: StorageClass,
    cursor: usize,
    slots: Vec<Variable>,
}

impl Section {
    pub fn new(class: StorageClass, len: usize) -> Self {
        Self {
            class,
            cursor: 0,
            slots: (0..len).map(|i| Variable::free(class, i)).collect(),
        }
    }

    fn grow(&mut self) {
        let start = self.slots.len();
        let class = self.class;
        self.slots
            .extend((start..start + SYM_TABLE_STEP).map(|i| Variable::free(class, i)));
    }

    /// Place `identifier` in the first free slot at or after the cursor,
    /// wrapping around before growing. Returns the slot index.
    pub fn add(&mut self, identifier: Identifier) -> usize {
        let len = self.slots.len();
        let cursor = self.cursor.min(len);
        let hole = (cursor..len)
            .chain(0..cursor)
            .find(|&i| self.slots[i].is_free());

        let index = match hole {
            Some(i) => i,
            None => {
                self.grow();
                len
            }
        };

        self.slots[index] = Variable {
            identifier,
            class: self.class,
            index,
        };
        self.cursor = index + 1;
        trace!(class = ?self.class, index, ?identifier, "slot taken");
        index
    }

    /// Release a slot. Returns `false` if it was out of range or already free.
    pub fn free(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if !slot.is_free() => {
                *slot = Variable::free(self.class, index);
                self.cursor = self.cursor.min(index);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Variable> {
        self.slots.get(index)
    }

    pub fn find(&self, identifier: Identifier) -> Option<&Variable> {
        if identifier.is_free() {
            return None;
        }
        self.slots.iter().find(|v| v.identifier == identifier)
    }

    pub fn class(&self) -> StorageClass {
        self.class
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Allocated slots, free or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|v| !v.is_free()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.slots.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    registers: Section,
    memory: Section,
    constants: Section,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Constants `true`, `false`, `nil` take slots 0..3; every hardware
    /// register is marked occupied.
    pub fn new() -> Self {
        let mut table = Self {
            registers: Section::new(StorageClass::Register, STORAGE_DEFAULT),
            memory: Section::new(StorageClass::Memory, STORAGE_DEFAULT),
            constants: Section::new(StorageClass::Constant, STORAGE_DEFAULT),
        };

        for identifier in [Identifier::True, Identifier::False, Identifier::Nil] {
            table.add(SectionKind::Constant, identifier);
        }
        for _ in 0..REGISTER_COUNT {
            table.add(SectionKind::Register, Identifier::Nameless);
        }
        table
    }

    pub fn section(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::Register => &self.registers,
            SectionKind::Memory => &self.memory,
            SectionKind::Constant => &self.constants,
        }
    }

    fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Register => &mut self.registers,
            SectionKind::Memory => &mut self.memory,
            SectionKind::Constant => &mut self.constants,
        }
    }

    pub fn add(&mut self, kind: SectionKind, identifier: Identifier) -> usize {
        self.section_mut(kind).add(identifier)
    }

    pub fn free(&mut self, kind: SectionKind, index: usize) -> bool {
        self.section_mut(kind).free(index)
    }

    /// First slot holding `identifier`, searching registers, then memory,
    /// then constants. Function locals are not consulted.
    pub fn lookup(&self, identifier: Identifier) -> Option<&Variable> {
        self.registers
            .find(identifier)
            .or_else(|| self.memory.find(identifier))
            .or_else(|| self.constants.find(identifier))
    }

    /// Constant slot by index. An unused slot within capacity is marked
    /// `Nameless` on first access.
    pub fn get_const(&mut self, index: usize) -> Option<&Variable> {
        let slot = self.constants.slots.get_mut(index)?;
        if slot.is_free() {
            slot.identifier = Identifier::Nameless;
        }
        Some(slot)
    }
}
