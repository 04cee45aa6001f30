//! Symbol tables.
//!
//! A [`Symbols`] table maps keys to attributes and parses the longest key
//! at the cursor, producing its value. The table a grammar holds is the
//! *shared* set of initial entries. Every top-level parse works on its own
//! copy, made the first time the parse touches the table, so actions can
//! insert and erase entries without affecting other parses.
//!
//! Changes meant to outlive the current parse go through the
//! `*_for_next_parse` operations. Inside a parse they are queued and
//! applied to the shared entries exactly once, when the parse exits (on
//! success, failure, hard error or panic), each table's changes under one
//! lock. Called on the table itself rather than through an action's
//! [`SymbolsView`], they apply immediately.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use weft_attr::{Attribute, Shape};
use weft_text::Cursor;

use crate::context::Scope;
use crate::parser::{Kind, Parser};

mod trie;

use trie::Trie;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SymbolsId(u32);

impl SymbolsId {
    fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        SymbolsId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type Entries = Vec<(String, Attribute)>;

struct Table {
    id: SymbolsId,
    shape: Shape,
    initial: RwLock<Entries>,
}

/// A symbol table: keys mapped to attribute values.
///
/// Cloning shares the table.
#[derive(Clone)]
pub struct Symbols {
    table: Arc<Table>,
}

impl Symbols {
    /// An empty table whose values have shape `shape`.
    pub fn new(shape: Shape) -> Self {
        Symbols {
            table: Arc::new(Table {
                id: SymbolsId::fresh(),
                shape,
                initial: RwLock::new(Vec::new()),
            }),
        }
    }

    /// A table holding `pairs`. The value shape is that of the first value.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Attribute>,
    {
        let pairs: Vec<(String, Attribute)> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let shape = pairs
            .first()
            .map_or(Shape::Any, |(_, value)| value.shape_of());
        let symbols = Symbols::new(shape);
        for (key, value) in pairs {
            symbols.insert_for_next_parse(key, value);
        }
        symbols
    }

    pub(crate) fn id(&self) -> SymbolsId {
        self.table.id
    }

    /// Shape of the values.
    pub fn shape(&self) -> &Shape {
        &self.table.shape
    }

    /// A parser matching the longest key at the cursor and producing its
    /// value.
    pub fn parser(&self) -> Parser {
        Parser::from_kind(Kind::Symbols(self.clone()), self.shape().clone())
    }

    /// Look `key` up in the shared entries.
    pub fn find(&self, key: &str) -> Option<Attribute> {
        self.table
            .initial
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.clone())
    }

    pub fn len(&self) -> usize {
        self.table.initial.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add `key` to the shared entries, replacing an existing value.
    ///
    /// The change applies immediately, also when called from inside a
    /// parse. Semantic actions queue changes for the next parse through
    /// [`ActionContext::symbols`](crate::ActionContext::symbols) instead.
    pub fn insert_for_next_parse(&self, key: impl Into<String>, value: impl Into<Attribute>) {
        self.apply(SymbolOp::Insert(key.into(), value.into()));
    }

    /// Remove `key` from the shared entries.
    ///
    /// Applies immediately, like
    /// [`insert_for_next_parse`](Self::insert_for_next_parse).
    pub fn erase_for_next_parse(&self, key: &str) {
        self.apply(SymbolOp::Erase(key.to_owned()));
    }

    /// Remove every shared entry.
    ///
    /// Applies immediately, like
    /// [`insert_for_next_parse`](Self::insert_for_next_parse).
    pub fn clear_for_next_parse(&self) {
        self.apply(SymbolOp::Clear);
    }

    fn apply(&self, op: SymbolOp) {
        op.apply_to(&mut self.table.initial.write(), self.shape());
    }
}

impl fmt::Debug for Symbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbols")
            .field("shape", self.shape())
            .field("len", &self.len())
            .finish()
    }
}

fn insert_entry(entries: &mut Entries, key: String, value: Attribute) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

/// A change to the shared entries, queued during a parse.
#[derive(Debug)]
enum SymbolOp {
    Insert(String, Attribute),
    Erase(String),
    Clear,
}

impl SymbolOp {
    fn apply_to(self, entries: &mut Entries, shape: &Shape) {
        match self {
            SymbolOp::Insert(key, value) => insert_entry(entries, key, value.coerce_to(shape)),
            SymbolOp::Erase(key) => entries.retain(|(k, _)| *k != key),
            SymbolOp::Clear => entries.clear(),
        }
    }
}

/// One table's entries as seen by the current parse.
#[derive(Debug)]
struct ParseTable {
    entries: Entries,
    exact: Option<Trie>,
    folded: Option<Trie>,
}

impl ParseTable {
    fn new(entries: Entries) -> Self {
        ParseTable {
            entries,
            exact: None,
            folded: None,
        }
    }

    fn invalidate(&mut self) {
        self.exact = None;
        self.folded = None;
    }

    fn longest_match(&mut self, input: &str, no_case: bool) -> Option<(usize, &Attribute)> {
        let entries = &self.entries;
        let slot = if no_case {
            &mut self.folded
        } else {
            &mut self.exact
        };
        let trie = slot.get_or_insert_with(|| {
            Trie::build(entries.iter().map(|(key, _)| key.as_str()), no_case)
        });
        let (len, index) = trie.longest_match(input)?;
        Some((len, &entries.get(index)?.1))
    }
}

/// Per-parse symbol table state.
///
/// Dropping the state commits the queued `*_for_next_parse` operations.
#[derive(Default)]
pub(crate) struct SymbolState {
    tables: FxHashMap<SymbolsId, ParseTable>,
    pending: Vec<(Symbols, SymbolOp)>,
}

impl SymbolState {
    fn table(&mut self, symbols: &Symbols) -> &mut ParseTable {
        self.tables
            .entry(symbols.id())
            .or_insert_with(|| ParseTable::new(symbols.table.initial.read().clone()))
    }

    /// Commit the queued operations to their tables.
    ///
    /// Each table takes all of its operations, in queue order, under one
    /// write lock, so no other parse sees a partial commit.
    pub(crate) fn commit(&mut self) {
        let mut pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            tracing::trace!(target: "weft", ops = pending.len(), "committing symbol table changes");
        }
        while let Some((symbols, _)) = pending.first() {
            let symbols = symbols.clone();
            let (ops, rest): (Vec<_>, Vec<_>) = pending
                .into_iter()
                .partition(|(table, _)| table.id() == symbols.id());
            pending = rest;

            let mut entries = symbols.table.initial.write();
            for (_, op) in ops {
                op.apply_to(&mut entries, symbols.shape());
            }
        }
    }
}

impl Drop for SymbolState {
    fn drop(&mut self) {
        self.commit();
    }
}

pub(crate) fn parse_symbols(
    symbols: &Symbols,
    state: &mut SymbolState,
    scope: Scope<'_>,
    cur: &mut Cursor<'_>,
) -> Option<Attribute> {
    let (len, value) = state
        .table(symbols)
        .longest_match(cur.rest(), scope.no_case())?;
    let value = scope.attr(|| value.clone());
    cur.advance_bytes(len);
    Some(value)
}

/// A symbol table as seen from a semantic action.
///
/// `find`, `insert`, `erase` and `clear` work on the current parse's copy.
/// The `*_for_next_parse` operations are queued until the parse exits.
pub struct SymbolsView<'a> {
    symbols: &'a Symbols,
    state: &'a mut SymbolState,
}

impl<'a> SymbolsView<'a> {
    pub(crate) fn new(symbols: &'a Symbols, state: &'a mut SymbolState) -> Self {
        SymbolsView { symbols, state }
    }

    pub fn find(&mut self, key: &str) -> Option<Attribute> {
        self.state
            .table(self.symbols)
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.clone())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Attribute>) {
        let value = value.into().coerce_to(self.symbols.shape());
        let table = self.state.table(self.symbols);
        insert_entry(&mut table.entries, key.into(), value);
        table.invalidate();
    }

    pub fn erase(&mut self, key: &str) {
        let table = self.state.table(self.symbols);
        table.entries.retain(|(k, _)| k != key);
        table.invalidate();
    }

    pub fn clear(&mut self) {
        let table = self.state.table(self.symbols);
        table.entries.clear();
        table.invalidate();
    }

    pub fn insert_for_next_parse(&mut self, key: impl Into<String>, value: impl Into<Attribute>) {
        let op = SymbolOp::Insert(key.into(), value.into());
        self.state.pending.push((self.symbols.clone(), op));
    }

    pub fn erase_for_next_parse(&mut self, key: &str) {
        let op = SymbolOp::Erase(key.to_owned());
        self.state.pending.push((self.symbols.clone(), op));
    }

    pub fn clear_for_next_parse(&mut self) {
        self.state.pending.push((self.symbols.clone(), SymbolOp::Clear));
    }
}

#[cfg(test)]
mod tests;
