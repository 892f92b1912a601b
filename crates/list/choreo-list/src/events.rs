//! List events and the listener registry shared between a list and the
//! back-references held by its items.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::item::Item;
use crate::model::Model;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(pub u64);

/// Kind of mutation that produced an event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Add,
    Remove,
    Reset,
}

/// Event forwarded from a nested list up through its owning entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Bubbled {
    /// Model name of the list where the mutation happened.
    pub origin: &'static str,
    pub action: Action,
    /// Number of entity boundaries crossed so far.
    pub depth: usize,
}

pub enum ListEvent<T: Model> {
    Add(Item<T>),
    Remove(Item<T>),
    /// Contents were replaced wholesale.
    Reset,
    Bubbled(Bubbled),
}

impl<T: Model> ListEvent<T> {
    pub fn action(&self) -> Option<Action> {
        match self {
            ListEvent::Add(_) => Some(Action::Add),
            ListEvent::Remove(_) => Some(Action::Remove),
            ListEvent::Reset => Some(Action::Reset),
            ListEvent::Bubbled(_) => None,
        }
    }

    /// Project this event into the form forwarded to the owning list.
    pub fn to_bubbled(&self) -> Bubbled {
        match self {
            ListEvent::Bubbled(inner) => Bubbled {
                depth: inner.depth + 1,
                ..inner.clone()
            },
            other => Bubbled {
                origin: T::NAME,
                // Non-bubbled events always carry an action.
                action: other.action().unwrap_or(Action::Reset),
                depth: 1,
            },
        }
    }
}

impl<T: Model> Clone for ListEvent<T> {
    fn clone(&self) -> Self {
        match self {
            ListEvent::Add(item) => ListEvent::Add(item.clone()),
            ListEvent::Remove(item) => ListEvent::Remove(item.clone()),
            ListEvent::Reset => ListEvent::Reset,
            ListEvent::Bubbled(b) => ListEvent::Bubbled(b.clone()),
        }
    }
}

impl<T: Model> std::fmt::Debug for ListEvent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListEvent::Add(_) => write!(f, "Add({})", T::NAME),
            ListEvent::Remove(_) => write!(f, "Remove({})", T::NAME),
            ListEvent::Reset => f.write_str("Reset"),
            ListEvent::Bubbled(b) => write!(f, "Bubbled({b:?})"),
        }
    }
}

type Listener<T> = Box<dyn FnMut(&ListEvent<T>)>;

/// Listener registry. Lives behind an `Rc` owned by the list; items hold a
/// `Weak` to it as their back-reference.
///
/// Events emitted while a dispatch is running are queued and delivered, in
/// order, once the current event has reached every listener.
pub(crate) struct Emitter<T: Model> {
    listeners: RefCell<Vec<(ListenerId, Listener<T>)>>,
    detached: RefCell<Vec<ListenerId>>,
    pending: RefCell<VecDeque<ListEvent<T>>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
}

impl<T: Model> Emitter<T> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            detached: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            next_id: Cell::new(0),
        }
    }

    pub(crate) fn subscribe(&self, listener: Listener<T>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&self, id: ListenerId) -> bool {
        {
            let mut listeners = self.listeners.borrow_mut();
            let before = listeners.len();
            listeners.retain(|(lid, _)| *lid != id);
            if listeners.len() != before {
                return true;
            }
        }
        // Currently dispatching; drop it when the listeners are restored.
        if self.dispatching.get() && id.0 < self.next_id.get() {
            let mut detached = self.detached.borrow_mut();
            if !detached.contains(&id) {
                detached.push(id);
            }
            return true;
        }
        false
    }

    /// Dispatch to every listener. Listeners may subscribe, unsubscribe or
    /// emit further events while the event is being delivered.
    pub(crate) fn emit(&self, event: &ListEvent<T>) {
        if self.dispatching.get() {
            self.pending.borrow_mut().push_back(event.clone());
            return;
        }
        self.dispatching.set(true);
        self.dispatch(event);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(queued) => self.dispatch(&queued),
                None => break,
            }
        }
        self.dispatching.set(false);
    }

    fn dispatch(&self, event: &ListEvent<T>) {
        let mut active = std::mem::take(&mut *self.listeners.borrow_mut());
        for (id, listener) in active.iter_mut() {
            if self.detached.borrow().contains(id) {
                continue;
            }
            listener(event);
        }
        let mut slot = self.listeners.borrow_mut();
        active.append(&mut *slot);
        let detached = std::mem::take(&mut *self.detached.borrow_mut());
        active.retain(|(id, _)| !detached.contains(id));
        *slot = active;
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}
