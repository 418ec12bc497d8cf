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

use crate::{
    common::{CameraMarker, Identifier, TargetMarker},
    entity::Entity,
};
use num_traits::Float;
use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position<F> {
    x: F,
    y: F,
}

impl<F: Float> Position<F> {
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> F {
        self.x
    }

    #[inline]
    pub fn y(&self) -> F {
        self.y
    }

    #[inline]
    pub fn distance_to(&self, other: &Self) -> F {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn translated(&self, dx: F, dy: F) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl<F: std::fmt::Display> std::fmt::Display for Position<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A simulation node with a stable identifier and a position that changes every tick.
///
/// Equality and hashing only look at the identifier: a camera that moved is
/// still the same camera.
#[derive(Debug, Clone, Copy)]
pub struct Placed<U, F> {
    id: Identifier<usize, U>,
    position: Position<F>,
}

pub type Camera<F = f64> = Placed<CameraMarker, F>;
pub type Target<F = f64> = Placed<TargetMarker, F>;

impl<U, F: Float> Placed<U, F> {
    #[inline]
    pub fn new(id: usize, position: Position<F>) -> Self {
        Self {
            id: Identifier::new(id),
            position,
        }
    }

    #[inline]
    pub fn identifier(&self) -> Identifier<usize, U>
    where
        U: Copy,
    {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Position<F> {
        self.position
    }

    #[inline]
    pub fn set_position(&mut self, position: Position<F>) {
        self.position = position;
    }

    #[inline]
    pub fn moved_to(mut self, position: Position<F>) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn distance_to<V>(&self, other: &Placed<V, F>) -> F {
        self.position.distance_to(&other.position)
    }
}

impl<U: PartialEq, F> PartialEq for Placed<U, F> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<U: Eq, F> Eq for Placed<U, F> {}

impl<U: Hash, F> Hash for Placed<U, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<U, F> Entity for Placed<U, F>
where
    U: Copy + Eq + Hash + Ord + Debug,
    F: Clone,
{
    type Id = Identifier<usize, U>;

    #[inline]
    fn id(&self) -> Self::Id {
        self.id
    }
}
