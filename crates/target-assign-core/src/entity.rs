// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::common::Identifier;
use std::{collections::HashSet, fmt::Debug, hash::Hash};

/// Something that can take part in an assignment.
///
/// Two values with the same [`Entity::id`] are the same participant, no matter
/// what else about them changed between ticks. Caches key on this identity, so
/// it must never depend on mutable attributes such as position.
pub trait Entity: Clone {
    type Id: Clone + Eq + Hash + Ord + Debug;

    fn id(&self) -> Self::Id;
}

impl<'a> Entity for &'a str {
    type Id = &'a str;

    #[inline]
    fn id(&self) -> Self::Id {
        self
    }
}

impl Entity for String {
    type Id = String;

    #[inline]
    fn id(&self) -> Self::Id {
        self.clone()
    }
}

impl<I, U> Entity for Identifier<I, U>
where
    I: Clone + Eq + Hash + Ord + Debug,
    U: Clone + Eq + Hash + Ord + Debug,
{
    type Id = Self;

    #[inline]
    fn id(&self) -> Self::Id {
        self.clone()
    }
}

/// Drops every item whose id was already seen, keeping first occurrences in order.
pub fn dedup_by_id<T: Entity>(items: &[T]) -> Vec<&T> {
    let mut seen: HashSet<T::Id> = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(item.id()))
        .collect()
}
