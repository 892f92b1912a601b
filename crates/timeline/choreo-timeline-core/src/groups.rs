use std::ops::{Deref, DerefMut};

use choreo_list::{Item, List};

use crate::group::Group;
use crate::parser::Unresolved;

/// All groups of an animation, in declaration order.
#[derive(Debug, Default)]
pub struct Groups(List<Group>);

impl Groups {
    pub fn new() -> Self {
        Self(List::new())
    }

    /// First group called `name`.
    pub fn get(&self, name: &str) -> Option<Item<Group>> {
        self.find(|group| group.name() == name)
    }

    /// Unresolved timeline declarations across every group.
    pub fn unresolved(&self) -> Vec<Unresolved> {
        self.iter()
            .flat_map(|group| group.borrow().unresolved().to_vec())
            .collect()
    }
}

impl Deref for Groups {
    type Target = List<Group>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Groups {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
