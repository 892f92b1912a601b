//! The observable collection.
//!
//! Mutations run in a fixed order: items are attached and appended (one `Add`
//! event each), then the duplicate policy is checked, then the sort policy and
//! the link policy are re-applied. A duplicate violation is reported after the
//! items were appended; the list is not rolled back.

use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{ListError, ListResult};
use crate::events::{Emitter, ListEvent, ListenerId};
use crate::item::{Bubble, Item};
use crate::model::{Key, Model};
use crate::policy::{Duplicates, Policies, SortOn};

pub struct List<T: Model> {
    items: Vec<Item<T>>,
    pub(crate) emitter: Rc<Emitter<T>>,
    duplicates: Duplicates,
    sort_on: SortOn<T>,
    linked: bool,
}

impl<T: Model> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Model> List<T> {
    pub fn new() -> Self {
        Self::with_policies(Policies::default())
    }

    pub fn with_policies(policies: Policies<T>) -> Self {
        Self {
            items: Vec::new(),
            emitter: Rc::new(Emitter::new()),
            duplicates: policies.duplicates,
            sort_on: policies.sort_on,
            linked: policies.linked,
        }
    }

    /// Build a list from initial items under the given policies.
    pub fn from_items<I, V>(policies: Policies<T>, items: I) -> ListResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Item<T>>,
    {
        let mut list = Self::with_policies(policies);
        list.add_all(items)?;
        Ok(list)
    }

    // ----- inspection -----

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item<T>> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Element at `index`, failing with [`ListError::Index`] when out of range.
    pub fn at(&self, index: usize) -> ListResult<Item<T>> {
        self.items.get(index).cloned().ok_or(ListError::Index {
            index,
            len: self.items.len(),
        })
    }

    pub fn get(&self, index: usize) -> Option<Item<T>> {
        self.items.get(index).cloned()
    }

    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Item<T>> {
        self.items.iter().find(|item| pred(&item.borrow())).cloned()
    }

    pub fn position(&self, item: &Item<T>) -> Option<usize> {
        self.items.iter().position(|i| i.ptr_eq(item))
    }

    pub fn contains(&self, item: &Item<T>) -> bool {
        self.position(item).is_some()
    }

    // ----- policies -----

    pub fn duplicates(&self) -> &Duplicates {
        &self.duplicates
    }

    pub fn sort_on(&self) -> &SortOn<T> {
        &self.sort_on
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Replace the duplicate policy and re-validate the current contents.
    pub fn set_duplicates(&mut self, duplicates: Duplicates) -> ListResult<()> {
        self.duplicates = duplicates;
        self.check_duplicates()
    }

    /// Replace the sort policy, re-sort and re-link.
    pub fn set_sort_on(&mut self, sort_on: SortOn<T>) -> ListResult<()> {
        self.sort_on = sort_on;
        self.sort();
        self.link()
    }

    /// Enable or disable prev/next linking. Disabling clears existing links.
    pub fn set_linked(&mut self, linked: bool) -> ListResult<()> {
        self.linked = linked;
        if !linked {
            self.items.iter().for_each(Item::clear_links);
            return Ok(());
        }
        self.link()
    }

    // ----- mutation -----

    pub fn add(&mut self, item: impl Into<Item<T>>) -> ListResult<Item<T>> {
        let item = self.insert(item.into())?;
        self.revalidate()?;
        Ok(item)
    }

    /// Add every item, then re-validate once. When an item is refused the
    /// ones already inserted stay, sorted and linked, and the error is returned.
    pub fn add_all<I, V>(&mut self, items: I) -> ListResult<Vec<Item<T>>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Item<T>>,
    {
        let mut added = Vec::new();
        for item in items {
            match self.insert(item.into()) {
                Ok(item) => added.push(item),
                Err(err) => {
                    self.sort();
                    self.link()?;
                    return Err(err);
                }
            }
        }
        self.revalidate()?;
        Ok(added)
    }

    /// Hydrate an element from its plain object and add it.
    pub fn add_object(&mut self, object: T::Object) -> ListResult<Item<T>> {
        let value = T::from_object(object)?;
        self.add(value)
    }

    /// Hydrate every object before inserting any, so a failing object leaves
    /// the list untouched.
    pub fn add_objects<I>(&mut self, objects: I) -> ListResult<Vec<Item<T>>>
    where
        I: IntoIterator<Item = T::Object>,
    {
        let values = objects
            .into_iter()
            .map(T::from_object)
            .collect::<ListResult<Vec<_>>>()?;
        self.add_all(values)
    }

    /// Add from untyped JSON: a single object or an array of objects. Anything
    /// that does not deserialize into the model's object is a
    /// [`ListError::Construction`].
    pub fn add_json(&mut self, json: &JsonValue) -> ListResult<Vec<Item<T>>>
    where
        T::Object: DeserializeOwned,
    {
        let entries = match json {
            JsonValue::Array(entries) => entries.iter().collect::<Vec<_>>(),
            single => vec![single],
        };
        let objects = entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value::<T::Object>(entry.clone()).map_err(|e| {
                    ListError::Construction {
                        model: T::NAME,
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<ListResult<Vec<_>>>()?;
        self.add_objects(objects)
    }

    /// Remove `item` if present. Missing items are skipped.
    pub fn remove(&mut self, item: &Item<T>) -> ListResult<Option<Item<T>>> {
        let removed = self.detach(item);
        self.sort();
        self.link()?;
        Ok(removed)
    }

    pub fn remove_all<'a, I>(&mut self, items: I) -> ListResult<Vec<Item<T>>>
    where
        I: IntoIterator<Item = &'a Item<T>>,
    {
        let removed = items
            .into_iter()
            .filter_map(|item| self.detach(item))
            .collect::<Vec<_>>();
        self.sort();
        self.link()?;
        Ok(removed)
    }

    /// Remove every element matching `pred`.
    pub fn remove_by(&mut self, mut pred: impl FnMut(&T) -> bool) -> ListResult<Vec<Item<T>>> {
        let matching = self
            .items
            .iter()
            .filter(|item| pred(&item.borrow()))
            .cloned()
            .collect::<Vec<_>>();
        self.remove_all(&matching)
    }

    /// Remove every element, emitting one `Remove` event each.
    pub fn clear(&mut self) {
        let snapshot = self.items.clone();
        for item in &snapshot {
            self.detach(item);
        }
    }

    /// Replace the contents with `items` and emit `Reset`.
    pub fn reset<I, V>(&mut self, items: I) -> ListResult<Vec<Item<T>>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Item<T>>,
    {
        self.clear();
        let added = self.add_all(items)?;
        self.emitter.emit(&ListEvent::Reset);
        Ok(added)
    }

    /// Apply `f` to a snapshot of the elements. The first error stops the
    /// iteration and is returned; results mapped so far are discarded.
    pub fn each<R, E>(
        &self,
        mut f: impl FnMut(&Item<T>, usize) -> Result<R, E>,
    ) -> Result<Vec<R>, E> {
        let snapshot = self.items.clone();
        let mut mapped = Vec::with_capacity(snapshot.len());
        for (index, item) in snapshot.iter().enumerate() {
            mapped.push(f(item, index)?);
        }
        Ok(mapped)
    }

    /// Plain-object projection of every element, in order.
    pub fn to_array(&self) -> Vec<T::Object> {
        self.items.iter().map(|item| item.borrow().to_object()).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<JsonValue>
    where
        T::Object: Serialize,
    {
        serde_json::to_value(self.to_array())
    }

    // ----- events -----

    pub fn subscribe(&self, listener: impl FnMut(&ListEvent<T>) + 'static) -> ListenerId {
        self.emitter.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.emitter.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.emitter.listener_count()
    }

    /// Forward every event of this list to the list owning the element behind
    /// `bubble`. Entities call this from [`Model::attach`] for each list they
    /// own.
    pub fn forward_to<P: Model>(&self, bubble: Bubble<P>) -> ListenerId {
        self.subscribe(move |event| {
            bubble.emit(event.to_bubbled());
        })
    }

    // ----- internals -----

    fn insert(&mut self, item: Item<T>) -> ListResult<Item<T>> {
        if !T::PRIMITIVE {
            if item.is_attached() && !item.owned_by(&self.emitter) {
                return Err(ListError::Construction {
                    model: T::NAME,
                    reason: "item already belongs to another list".into(),
                });
            }
            item.set_owner(Rc::downgrade(&self.emitter));
            let bubble = item.bubble();
            item.borrow_mut().attach(bubble);
        }
        self.items.push(item.clone());
        self.emitter.emit(&ListEvent::Add(item.clone()));
        Ok(item)
    }

    fn detach(&mut self, item: &Item<T>) -> Option<Item<T>> {
        let index = self.position(item)?;
        let removed = self.items.remove(index);
        removed.clear_links();
        self.emitter.emit(&ListEvent::Remove(removed.clone()));
        removed.set_owner(Weak::new());
        Some(removed)
    }

    fn revalidate(&mut self) -> ListResult<()> {
        self.check_duplicates()?;
        self.sort();
        self.link()
    }

    fn key_of(item: &Item<T>, property: Option<&str>) -> Key {
        match property {
            Some(name) => item.borrow().property(name),
            None => item
                .borrow()
                .value_key()
                .unwrap_or_else(|| Key::Ref(item.addr())),
        }
    }

    fn check_duplicates(&self) -> ListResult<()> {
        let property = match &self.duplicates {
            Duplicates::Allow => return Ok(()),
            Duplicates::Unique => None,
            Duplicates::UniqueBy(name) => Some(name.as_str()),
        };

        let keys = self
            .items
            .iter()
            .map(|item| Self::key_of(item, property).to_string())
            .collect::<Vec<_>>();
        let mut counts: HashMap<&str, usize> = HashMap::with_capacity(keys.len());
        for key in &keys {
            *counts.entry(key.as_str()).or_insert(0) += 1;
        }

        match keys
            .iter()
            .find(|key| counts.get(key.as_str()).copied().unwrap_or(0) > 1)
        {
            Some(key) => Err(ListError::Duplicate {
                model: (!T::PRIMITIVE).then_some(T::NAME),
                property: property.map(str::to_owned),
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }

    fn sort(&mut self) {
        match &self.sort_on {
            SortOn::None => {}
            SortOn::Natural => self.items.sort_by(|a, b| {
                match (a.borrow().value_key(), b.borrow().value_key()) {
                    (Some(ka), Some(kb)) => ka.natural_cmp(&kb),
                    _ => Ordering::Equal,
                }
            }),
            SortOn::Property(name) => self.items.sort_by(|a, b| {
                let ka = a.borrow().property(name).as_number();
                let kb = b.borrow().property(name).as_number();
                match (ka, kb) {
                    (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }),
            SortOn::Comparator(cmp) => self
                .items
                .sort_by(|a, b| cmp(&a.borrow(), &b.borrow())),
        }
    }

    fn link(&mut self) -> ListResult<()> {
        if !self.linked {
            return Ok(());
        }
        if T::PRIMITIVE && !self.items.is_empty() {
            return Err(ListError::Link { model: T::NAME });
        }
        for (i, item) in self.items.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| &self.items[p]);
            item.set_links(prev, self.items.get(i + 1));
        }
        Ok(())
    }
}

impl<'a, T: Model> IntoIterator for &'a List<T> {
    type Item = &'a Item<T>;
    type IntoIter = std::slice::Iter<'a, Item<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Model> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("model", &T::NAME)
            .field("len", &self.items.len())
            .field("duplicates", &self.duplicates)
            .field("sort_on", &self.sort_on)
            .field("linked", &self.linked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_fails_past_the_end() {
        let list = List::<f64>::from_items(Policies::default(), [1.0, 2.0]).unwrap();
        assert_eq!(*list.at(1).unwrap().borrow(), 2.0);
        assert_eq!(list.at(2).unwrap_err(), ListError::Index { index: 2, len: 2 });
    }

    #[test]
    fn natural_sort_on_primitives() {
        let mut list = List::<f64>::new();
        list.add_all([3.0, 1.0, 2.0]).unwrap();
        list.set_sort_on(SortOn::Natural).unwrap();
        assert_eq!(list.to_array(), vec![1.0, 2.0, 3.0]);
        list.add(0.5).unwrap();
        assert_eq!(list.to_array(), vec![0.5, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn unique_primitives_report_value() {
        let mut list = List::<String>::new();
        list.add_all(["a".to_string(), "b".to_string(), "a".to_string()])
            .unwrap();
        let err = list.set_duplicates(Duplicates::Unique).unwrap_err();
        assert_eq!(
            err,
            ListError::Duplicate {
                model: None,
                property: None,
                key: "a".into()
            }
        );
    }

    #[test]
    fn primitives_cannot_be_linked() {
        let mut list = List::<i64>::new();
        // Empty lists accept the policy; the violation shows up on insert.
        list.set_linked(true).unwrap();
        assert_eq!(list.add(1).unwrap_err(), ListError::Link { model: "i64" });
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn add_json_rejects_wrong_shape() {
        let mut list = List::<f64>::new();
        let err = list.add_json(&serde_json::json!("nope")).unwrap_err();
        assert!(matches!(err, ListError::Construction { model: "f64", .. }));
        assert!(list.is_empty());

        let added = list.add_json(&serde_json::json!([1, 2.5])).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(list.to_array(), vec![1.0, 2.5]);
    }
}
