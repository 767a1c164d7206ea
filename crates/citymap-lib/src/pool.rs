//! Link-cell pool shared by [`List`](crate::list::List) instances.
//!
//! Cells removed from a list are handed back to the pool instead of being
//! dropped, and the pool serves its free cells before growing its backing
//! store. Lists address cells through [`CellId`] handles, so a pool can be
//! shared between any number of lists without them holding references into
//! each other.

use std::cell::{Cell, RefCell};
use std::mem;
use std::rc::Rc;

use slab::Slab;

use crate::error::ListError;

/// Handle to a link cell inside a [`CellPool`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellId(usize);

/// One link of a singly-linked chain.
#[derive(Debug)]
pub(crate) struct Link<T> {
    pub(crate) value: T,
    pub(crate) next: Option<CellId>,
}

/// A pool injected into every list that should draw cells from it.
pub type SharedPool<T> = Rc<RefCell<CellPool<T>>>;

/// Allocation counters for a [`CellPool`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Cells created from the backing store.
    pub allocated: usize,
    /// Acquisitions served by a previously released cell.
    pub recycled: usize,
    /// Cells handed back by lists.
    pub released: usize,
    /// Cells currently linked into some list.
    pub live: usize,
    /// Cells of dropped lists waiting to be released on the next acquisition.
    pub deferred: usize,
}

impl PoolStats {
    /// Cells available for reuse, deferred ones included.
    pub fn free(&self) -> usize {
        self.allocated - self.live
    }
}

/// Free-list backed storage for link cells.
#[derive(Debug)]
pub struct CellPool<T> {
    cells: Slab<Link<T>>,
    limit: Option<usize>,
    allocated: usize,
    recycled: usize,
    released: usize,
    pending: RefCell<Vec<CellId>>,
    pending_cells: Cell<usize>,
}

impl<T> CellPool<T> {
    /// Create an unbounded pool.
    pub fn new() -> Self {
        Self {
            cells: Slab::new(),
            limit: None,
            allocated: 0,
            recycled: 0,
            released: 0,
            pending: RefCell::new(Vec::new()),
            pending_cells: Cell::new(0),
        }
    }

    /// Create a pool whose backing store never grows beyond `max_cells`.
    ///
    /// Once every cell is linked, further acquisitions fail with
    /// [`ListError::AllocationFailure`].
    pub fn with_limit(max_cells: usize) -> Self {
        Self {
            cells: Slab::with_capacity(max_cells),
            limit: Some(max_cells),
            ..Self::new()
        }
    }

    /// Wrap the pool so lists can share it.
    pub fn into_shared(self) -> SharedPool<T> {
        Rc::new(RefCell::new(self))
    }

    /// Shorthand for `CellPool::new().into_shared()`.
    pub fn shared() -> SharedPool<T> {
        Self::new().into_shared()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.allocated,
            recycled: self.recycled,
            released: self.released,
            live: self.cells.len() - self.pending_cells.get(),
            deferred: self.pending_cells.get(),
        }
    }

    /// Take a cell for `value`, preferring a released one.
    pub(crate) fn acquire(&mut self, value: T, next: Option<CellId>) -> Result<CellId, ListError> {
        self.reclaim_deferred();
        // The slab fills vacant slots before pushing new ones.
        if self.cells.len() < self.allocated {
            self.recycled += 1;
        } else {
            if self.limit.is_some_and(|limit| self.allocated >= limit) {
                return Err(ListError::AllocationFailure);
            }
            self.allocated += 1;
        }
        Ok(CellId(self.cells.insert(Link { value, next })))
    }

    /// Return a cell to the free list, yielding its contents.
    pub(crate) fn release(&mut self, id: CellId) -> Option<Link<T>> {
        let link = self.cells.try_remove(id.0)?;
        self.released += 1;
        Some(link)
    }

    /// Release every cell of the chain starting at `head`.
    pub(crate) fn release_chain(&mut self, head: CellId) {
        let mut cursor = Some(head);
        while let Some(id) = cursor {
            cursor = self.release(id).and_then(|link| link.next);
        }
    }

    /// Queue a whole chain for release while the pool is only shared-borrowed.
    ///
    /// The chain must no longer be reachable from any list.
    pub(crate) fn defer_release(&self, head: CellId, cells: usize) {
        self.pending.borrow_mut().push(head);
        self.pending_cells.set(self.pending_cells.get() + cells);
    }

    fn reclaim_deferred(&mut self) {
        let heads = mem::take(self.pending.get_mut());
        if heads.is_empty() {
            return;
        }
        for head in heads {
            self.release_chain(head);
        }
        self.pending_cells.set(0);
    }

    pub(crate) fn next(&self, id: CellId) -> Option<CellId> {
        self.cells.get(id.0).and_then(|link| link.next)
    }

    pub(crate) fn value(&self, id: CellId) -> Option<&T> {
        self.cells.get(id.0).map(|link| &link.value)
    }

    pub(crate) fn set_next(&mut self, id: CellId, next: Option<CellId>) {
        if let Some(link) = self.cells.get_mut(id.0) {
            link.next = next;
        }
    }

    /// Walk a chain starting at `head`.
    pub(crate) fn chain(&self, head: Option<CellId>) -> Chain<'_, T> {
        Chain {
            pool: self,
            cursor: head,
        }
    }
}

impl<T> Default for CellPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(handle, value)` pairs of one chain.
pub(crate) struct Chain<'p, T> {
    pool: &'p CellPool<T>,
    cursor: Option<CellId>,
}

impl<'p, T> Iterator for Chain<'p, T> {
    type Item = (CellId, &'p T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let pool = self.pool;
        let link = pool.cells.get(id.0)?;
        self.cursor = link.next;
        Some((id, &link.value))
    }
}
