// This module provides the name-keyed symbol registries the code generator uses to track the
// entities it materializes in the backend: functions, basic blocks and global variables.
// Registry<H> stores backend handles of one SymbolKind and implements the three-operation
// contract: create (fails on a duplicate name, otherwise runs the supplied constructor and
// records its handle), get (fails on a missing name) and get_or_create (idempotent). The
// constructor only runs when the name is free, so a failed create never touches the backend.
// BlockRegistry scopes basic block names by owning function so that every function can own
// an `entry` block. SymbolTables groups the three registries for one compilation and is
// generic over the backend's handle types. Storage uses hashbrown maps.

//! Symbol registries.
//!
//! All three registries share one contract:
//!
//! - [`Registry::create`] materializes a new entity and fails with
//!   [`CompileError::DuplicateDefinition`] if the name is taken.
//! - [`Registry::get`] fails with [`CompileError::Lookup`] on a miss.
//! - [`Registry::get_or_create`] returns the existing handle or creates one.
//!
//! `create` is reserved for one-time entities such as procedure definitions;
//! re-enterable call sites (globals, the entry function) use `get_or_create`.

use hashbrown::HashMap;

use super::backend::Backend;
use super::error::{CompileError, CompileResult, SymbolKind};

/// Name-keyed store of backend handles of a single [`SymbolKind`].
#[derive(Debug, Clone)]
pub struct Registry<H> {
    kind: SymbolKind,
    entries: HashMap<String, H>,
}

impl<H: Copy> Registry<H> {
    pub fn new(kind: SymbolKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Create the entity `name` by running `make`.
    pub fn create<F>(&mut self, name: &str, make: F) -> CompileResult<H>
    where
        F: FnOnce() -> CompileResult<H>,
    {
        if self.entries.contains_key(name) {
            log::error!("{} {} already exists and can not be created", self.kind, name);
            return Err(CompileError::duplicate(self.kind, name));
        }

        let handle = make()?;
        self.entries.insert(name.to_string(), handle);
        log::trace!("registered {} {}", self.kind, name);
        Ok(handle)
    }

    pub fn get(&self, name: &str) -> CompileResult<H> {
        match self.entries.get(name) {
            Some(handle) => Ok(*handle),
            None => {
                log::error!("{} {} not found.", self.kind, name);
                Err(CompileError::lookup(self.kind, name))
            }
        }
    }

    pub fn get_or_create<F>(&mut self, name: &str, make: F) -> CompileResult<H>
    where
        F: FnOnce() -> CompileResult<H>,
    {
        match self.entries.get(name) {
            Some(handle) => Ok(*handle),
            None => self.create(name, make),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Basic block registry scoped per owning function.
#[derive(Debug, Clone)]
pub struct BlockRegistry<H> {
    scopes: HashMap<String, Registry<H>>,
}

impl<H: Copy> BlockRegistry<H> {
    pub fn new() -> Self {
        Self {
            scopes: HashMap::new(),
        }
    }

    /// Create block `name` inside `function`. Names only clash within one function.
    pub fn create<F>(&mut self, function: &str, name: &str, make: F) -> CompileResult<H>
    where
        F: FnOnce() -> CompileResult<H>,
    {
        self.scopes
            .entry(function.to_string())
            .or_insert_with(|| Registry::new(SymbolKind::BasicBlock))
            .create(name, make)
    }

    pub fn get(&self, function: &str, name: &str) -> CompileResult<H> {
        match self.scopes.get(function) {
            Some(scope) => scope.get(name),
            None => {
                log::error!("Basic block {}::{} not found.", function, name);
                Err(CompileError::lookup(SymbolKind::BasicBlock, format!("{function}::{name}")))
            }
        }
    }

    pub fn get_or_create<F>(&mut self, function: &str, name: &str, make: F) -> CompileResult<H>
    where
        F: FnOnce() -> CompileResult<H>,
    {
        self.scopes
            .entry(function.to_string())
            .or_insert_with(|| Registry::new(SymbolKind::BasicBlock))
            .get_or_create(name, make)
    }

    pub fn contains(&self, function: &str, name: &str) -> bool {
        self.scopes.get(function).is_some_and(|scope| scope.contains(name))
    }

    /// Total number of blocks across all functions.
    pub fn len(&self) -> usize {
        self.scopes.values().map(Registry::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: Copy> Default for BlockRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// The three registries owned by one compilation.
pub struct SymbolTables<B: Backend> {
    pub functions: Registry<B::Function>,
    pub blocks: BlockRegistry<B::Block>,
    pub globals: Registry<B::Global>,
}

impl<B: Backend> SymbolTables<B> {
    pub fn new() -> Self {
        Self {
            functions: Registry::new(SymbolKind::Function),
            blocks: BlockRegistry::new(),
            globals: Registry::new(SymbolKind::GlobalVariable),
        }
    }
}

impl<B: Backend> Default for SymbolTables<B> {
    fn default() -> Self {
        Self::new()
    }
}
