use std::ops::{Index, IndexMut};

use crate::clause::Clause;
use crate::cref::ClauseRef;
use crate::lit::Lit;

/// Vec-backed clause arena. Freed clauses are only marked deleted, so handles
/// are never reused and stay valid for the lifetime of the instance.
#[derive(Debug, Default)]
pub struct ClauseAllocator {
    db: Vec<Clause>,
}

impl ClauseAllocator {
    pub const fn new() -> Self {
        Self { db: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            db: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, lits: Vec<Lit>, learnt: bool) -> ClauseRef {
        let cref = ClauseRef(self.db.len());
        self.db.push(Clause::new(lits, learnt));
        cref
    }

    pub fn free(&mut self, cref: ClauseRef) {
        self.db[cref.0].mark_deleted();
    }

    pub fn clause(&self, cref: ClauseRef) -> &Clause {
        self.index(cref)
    }
    pub fn clause_mut(&mut self, cref: ClauseRef) -> &mut Clause {
        self.index_mut(cref)
    }
}

// ca[cref]
impl Index<ClauseRef> for ClauseAllocator {
    type Output = Clause;

    fn index(&self, cref: ClauseRef) -> &Self::Output {
        self.db.index(cref.0)
    }
}

// &mut ca[cref]
impl IndexMut<ClauseRef> for ClauseAllocator {
    fn index_mut(&mut self, cref: ClauseRef) -> &mut Self::Output {
        self.db.index_mut(cref.0)
    }
}
