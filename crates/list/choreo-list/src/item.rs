//! Element handles.
//!
//! A list stores its elements as [`Item`]s: shared handles around the value
//! plus the bookkeeping the list maintains on them (owner back-reference and
//! prev/next links). All of those pointers are weak, so an item never keeps
//! its list or its neighbours alive.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::events::{Bubbled, Emitter, ListEvent};
use crate::list::List;
use crate::model::Model;

pub(crate) struct Node<T: Model> {
    pub(crate) value: RefCell<T>,
    pub(crate) owner: RefCell<Weak<Emitter<T>>>,
    pub(crate) prev: RefCell<Weak<Node<T>>>,
    pub(crate) next: RefCell<Weak<Node<T>>>,
    pub(crate) linked: Cell<bool>,
}

/// Shared handle to a list element. Cloning the handle does not clone the
/// value.
pub struct Item<T: Model>(pub(crate) Rc<Node<T>>);

impl<T: Model> Item<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Node {
            value: RefCell::new(value),
            owner: RefCell::new(Weak::new()),
            prev: RefCell::new(Weak::new()),
            next: RefCell::new(Weak::new()),
            linked: Cell::new(false),
        }))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.value.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.value.borrow_mut()
    }

    /// Previous element when the owning list is linked.
    pub fn prev(&self) -> Option<Item<T>> {
        self.0.prev.borrow().upgrade().map(Item)
    }

    /// Next element when the owning list is linked.
    pub fn next(&self) -> Option<Item<T>> {
        self.0.next.borrow().upgrade().map(Item)
    }

    /// Whether prev/next links are currently maintained on this item.
    pub fn is_linked(&self) -> bool {
        self.0.linked.get()
    }

    /// Whether the item currently has an owning list.
    pub fn is_attached(&self) -> bool {
        self.0.owner.borrow().upgrade().is_some()
    }

    /// Whether `list` is the item's current owner.
    pub fn belongs_to(&self, list: &List<T>) -> bool {
        self.owned_by(&list.emitter)
    }

    pub fn ptr_eq(&self, other: &Item<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the handle, used as the whole-value key of entities.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Handle passed to [`Model::attach`].
    pub fn bubble(&self) -> Bubble<T> {
        Bubble(Rc::downgrade(&self.0))
    }

    pub(crate) fn owned_by(&self, emitter: &Rc<Emitter<T>>) -> bool {
        self.0
            .owner
            .borrow()
            .upgrade()
            .map(|owner| Rc::ptr_eq(&owner, emitter))
            .unwrap_or(false)
    }

    pub(crate) fn set_owner(&self, emitter: Weak<Emitter<T>>) {
        *self.0.owner.borrow_mut() = emitter;
    }

    pub(crate) fn set_links(&self, prev: Option<&Item<T>>, next: Option<&Item<T>>) {
        *self.0.prev.borrow_mut() = prev.map(|p| Rc::downgrade(&p.0)).unwrap_or_default();
        *self.0.next.borrow_mut() = next.map(|n| Rc::downgrade(&n.0)).unwrap_or_default();
        self.0.linked.set(true);
    }

    pub(crate) fn clear_links(&self) {
        *self.0.prev.borrow_mut() = Weak::new();
        *self.0.next.borrow_mut() = Weak::new();
        self.0.linked.set(false);
    }
}

impl<T: Model> Clone for Item<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Model> From<T> for Item<T> {
    fn from(value: T) -> Self {
        Item::new(value)
    }
}

impl<T: Model + fmt::Debug> fmt::Debug for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.value.try_borrow() {
            Ok(value) => f.debug_tuple("Item").field(&*value).finish(),
            Err(_) => f.debug_tuple("Item").field(&"<borrowed>").finish(),
        }
    }
}

/// Upward event channel for an element. Resolves the element's current owner
/// on every emit, so forwarding stops as soon as the element is removed.
pub struct Bubble<T: Model>(Weak<Node<T>>);

impl<T: Model> Bubble<T> {
    /// Deliver `event` to the owning list's listeners. Returns false when the
    /// element is no longer attached.
    pub fn emit(&self, event: Bubbled) -> bool {
        let Some(node) = self.0.upgrade() else {
            return false;
        };
        let owner = node.owner.borrow().upgrade();
        match owner {
            Some(emitter) => {
                emitter.emit(&ListEvent::Bubbled(event));
                true
            }
            None => false,
        }
    }
}

impl<T: Model> Clone for Bubble<T> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}
