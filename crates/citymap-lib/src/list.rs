//! Generic singly-linked list drawing its cells from a shared [`CellPool`].
//!
//! Positions are 1-based throughout: position 1 is the head, and insertion
//! accepts `len + 1` to append. A list may be bound to a comparator, which
//! turns on the ordered operations ([`List::insert_sorted`],
//! [`List::contains`], [`List::remove_value`]), and to a display function
//! used by [`List::display`].

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::{debug, warn};

use crate::error::ListError;
use crate::pool::{CellId, CellPool, SharedPool};

/// Total order over list values, `strcmp` style.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Renders one list value.
pub type DisplayFn<T> = fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies the list and the mutation a [`Membership`] marker was taken at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stamp {
    list: u64,
    generation: u64,
}

/// Where a value was found by [`List::contains`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Membership {
    /// No element compares equal.
    Absent,
    /// The first element compares equal.
    AtHead(Stamp),
    /// A later element compares equal; the handle is its predecessor.
    AfterPredecessor(CellId, Stamp),
}

impl Membership {
    pub fn is_present(self) -> bool {
        !matches!(self, Membership::Absent)
    }

    fn stamp(self) -> Option<Stamp> {
        match self {
            Membership::Absent => None,
            Membership::AtHead(stamp) | Membership::AfterPredecessor(_, stamp) => Some(stamp),
        }
    }
}

pub struct List<T> {
    pool: SharedPool<T>,
    head: Option<CellId>,
    len: usize,
    id: u64,
    generation: u64,
    comparator: Option<Comparator<T>>,
    display: Option<DisplayFn<T>>,
}

impl<T> List<T> {
    /// Create an empty list without comparator or display function.
    pub fn new(pool: &SharedPool<T>) -> Self {
        Self {
            pool: Rc::clone(pool),
            head: None,
            len: 0,
            id: NEXT_LIST_ID.fetch_add(1, AtomicOrdering::Relaxed),
            generation: 0,
            comparator: None,
            display: None,
        }
    }

    /// Create an empty list kept in ascending `comparator` order by
    /// [`List::insert_sorted`].
    pub fn sorted(pool: &SharedPool<T>, comparator: Comparator<T>) -> Self {
        Self::new(pool).with_comparator(comparator)
    }

    pub fn with_comparator(mut self, comparator: Comparator<T>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn with_display(mut self, display: DisplayFn<T>) -> Self {
        self.display = Some(display);
        self
    }

    /// Number of elements, O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The pool this list draws its cells from.
    pub fn pool(&self) -> &SharedPool<T> {
        &self.pool
    }

    /// Insert `value` so that it ends up at `position`.
    pub fn insert_at(&mut self, position: usize, value: T) -> Result<(), ListError> {
        if position == 0 || position > self.len + 1 {
            return Err(self.out_of_range(position));
        }

        let mut pool = self.pool.borrow_mut();
        if position == 1 {
            let id = pool.acquire(value, self.head)?;
            self.head = Some(id);
        } else {
            let Some(pred) = cell_at(&pool, self.head, position - 1) else {
                return Err(self.out_of_range(position));
            };
            let next = pool.next(pred);
            let id = pool.acquire(value, next)?;
            pool.set_next(pred, Some(id));
        }
        self.len += 1;
        self.generation += 1;
        Ok(())
    }

    /// Unlink the element at `position` and return it.
    pub fn remove_at(&mut self, position: usize) -> Result<T, ListError> {
        if position == 0 || position > self.len {
            return Err(self.out_of_range(position));
        }

        let pred = if position == 1 {
            None
        } else {
            let pool = self.pool.borrow();
            match cell_at(&pool, self.head, position - 1) {
                Some(pred) => Some(pred),
                None => return Err(self.out_of_range(position)),
            }
        };
        self.unlink(pred)
            .ok_or_else(|| self.out_of_range(position))
    }

    /// Remove the first element comparing equal to `value`.
    pub fn remove_value(&mut self, value: &T) -> Result<T, ListError> {
        let membership = self.contains(value)?;
        self.remove_found(membership)
    }

    /// Locate `value` under the bound comparator.
    ///
    /// The returned marker stays valid until this list is next mutated and
    /// can be handed to [`List::remove_found`] to unlink the element without
    /// scanning again.
    pub fn contains(&self, value: &T) -> Result<Membership, ListError> {
        let compare = self.require_comparator("contains")?;
        let pool = self.pool.borrow();
        let stamp = self.stamp();

        let mut pred: Option<CellId> = None;
        for (id, existing) in pool.chain(self.head) {
            if compare(value, existing) == Ordering::Equal {
                return Ok(match pred {
                    None => Membership::AtHead(stamp),
                    Some(pred) => Membership::AfterPredecessor(pred, stamp),
                });
            }
            pred = Some(id);
        }
        Ok(Membership::Absent)
    }

    /// Unlink the element described by a marker from [`List::contains`].
    ///
    /// Markers taken from another list, or from this list before its last
    /// mutation, are rejected with [`ListError::NotFound`].
    pub fn remove_found(&mut self, membership: Membership) -> Result<T, ListError> {
        if membership.stamp() != Some(self.stamp()) {
            return Err(ListError::NotFound);
        }
        let pred = match membership {
            Membership::AfterPredecessor(pred, _) => Some(pred),
            Membership::AtHead(_) | Membership::Absent => None,
        };
        self.unlink(pred).ok_or(ListError::NotFound)
    }

    /// Insert `value` before the first element strictly greater than it, so
    /// equal elements keep their insertion order.
    pub fn insert_sorted(&mut self, value: T) -> Result<(), ListError> {
        let compare = self.require_comparator("insert_sorted")?;
        let mut pool = self.pool.borrow_mut();

        let mut pred: Option<CellId> = None;
        let mut successor = self.head;
        for (id, existing) in pool.chain(self.head) {
            if compare(existing, &value) == Ordering::Greater {
                break;
            }
            pred = Some(id);
            successor = pool.next(id);
        }

        let id = pool.acquire(value, successor)?;
        match pred {
            None => self.head = Some(id),
            Some(pred) => pool.set_next(pred, Some(id)),
        }
        self.len += 1;
        self.generation += 1;
        Ok(())
    }

    /// Call `action` on every element, head to tail.
    ///
    /// The pool stays borrowed while `action` runs; lists sharing it that are
    /// dropped meanwhile hand their cells back on the pool's next acquisition.
    pub fn for_each(&self, mut action: impl FnMut(&T)) {
        let pool = self.pool.borrow();
        for (_, value) in pool.chain(self.head) {
            action(value);
        }
    }

    /// 1-based position of the first element matching `predicate`.
    pub fn position(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        let pool = self.pool.borrow();
        pool.chain(self.head)
            .position(|(_, value)| predicate(value))
            .map(|index| index + 1)
    }

    /// Render as `[ v1 v2 ... vn ]` through the bound display function.
    pub fn display(&self) -> Result<ListDisplay<'_, T>, ListError> {
        let render = self.display.ok_or(ListError::UnsupportedOperation {
            operation: "display",
            requirement: "display",
        })?;
        Ok(ListDisplay { list: self, render })
    }

    /// Return every cell to the pool.
    pub fn clear(&mut self) {
        let Some(head) = self.head.take() else {
            return;
        };
        let cells = std::mem::take(&mut self.len);
        self.generation += 1;

        if let Ok(mut pool) = self.pool.try_borrow_mut() {
            pool.release_chain(head);
        } else if let Ok(pool) = self.pool.try_borrow() {
            debug!(cells, "pool busy; deferring release");
            pool.defer_release(head, cells);
        } else {
            warn!(cells, "pool mutably borrowed during clear; cells not returned");
        }
    }

    fn unlink(&mut self, pred: Option<CellId>) -> Option<T> {
        let mut pool = self.pool.borrow_mut();
        let link = match pred {
            None => {
                let link = pool.release(self.head?)?;
                self.head = link.next;
                link
            }
            Some(pred) => {
                let target = pool.next(pred)?;
                let link = pool.release(target)?;
                pool.set_next(pred, link.next);
                link
            }
        };
        self.len -= 1;
        self.generation += 1;
        Some(link.value)
    }

    fn stamp(&self) -> Stamp {
        Stamp {
            list: self.id,
            generation: self.generation,
        }
    }

    fn require_comparator(&self, operation: &'static str) -> Result<Comparator<T>, ListError> {
        self.comparator.ok_or(ListError::UnsupportedOperation {
            operation,
            requirement: "comparator",
        })
    }

    fn out_of_range(&self, position: usize) -> ListError {
        ListError::IndexOutOfRange {
            position,
            len: self.len,
        }
    }
}

impl<T: Clone> List<T> {
    /// Copy of the element at `position`.
    pub fn nth(&self, position: usize) -> Result<T, ListError> {
        if position == 0 || position > self.len {
            return Err(self.out_of_range(position));
        }
        let pool = self.pool.borrow();
        cell_at(&pool, self.head, position)
            .and_then(|id| pool.value(id))
            .cloned()
            .ok_or_else(|| self.out_of_range(position))
    }

    /// Iterate over copies of the elements, head to tail.
    ///
    /// The pool is borrowed only inside each call to `next`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = self.pool.borrow();
        f.debug_list()
            .entries(pool.chain(self.head).map(|(_, value)| value))
            .finish()
    }
}

fn cell_at<T>(pool: &CellPool<T>, head: Option<CellId>, position: usize) -> Option<CellId> {
    pool.chain(head)
        .nth(position.checked_sub(1)?)
        .map(|(id, _)| id)
}

/// Iterator returned by [`List::iter`].
pub struct Iter<'a, T> {
    list: &'a List<T>,
    cursor: Option<CellId>,
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let id = self.cursor?;
        let pool = self.list.pool.borrow();
        self.cursor = pool.next(id);
        pool.value(id).cloned()
    }
}

/// Bracketed rendering returned by [`List::display`].
pub struct ListDisplay<'a, T> {
    list: &'a List<T>,
    render: DisplayFn<T>,
}

impl<T> fmt::Display for ListDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = self.list.pool.borrow();
        f.write_str("[ ")?;
        for (_, value) in pool.chain(self.list.head) {
            (self.render)(value, f)?;
            f.write_str(" ")?;
        }
        f.write_str("]")
    }
}
