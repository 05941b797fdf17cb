//! # Column
//!
//! `Column<T>` owns an ordered, resizable sequence of nullable elements and
//! lifts the nullable operator algebra element-wise. Reads are safe
//! (out-of-range yields an absent element), writes report success through a
//! boolean flag, and binary operators between two columns broadcast
//! permissively: the result has the size of the larger operand and the
//! shorter one is implicitly right-padded with absent elements through the
//! safe read path. A size mismatch is never an error.

use crate::nullable::{Null, Nullable};
use crate::slot::{SlotMut, SlotRef};
use num_traits::Zero;
use std::fmt;
use std::mem;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Sub};
use tracing::trace;

/// An ordered sequence of nullable elements of one element type.
///
/// `Clone` deep-copies the backing storage: mutating a clone never affects
/// the original.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Column<T> {
    elements: Vec<Nullable<T>>,
}

impl<T> Column<T> {
    /// An empty column.
    pub fn new() -> Self {
        Column {
            elements: Vec::new(),
        }
    }

    /// Build a column from a sequence of plain values; every element is
    /// present and the backing capacity is pre-sized to the sequence length.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Column {
            elements: values.into_iter().map(Nullable::new).collect(),
        }
    }

    /// Build a column from an already-nullable sequence.
    pub fn from_nullables(elements: Vec<Nullable<T>>) -> Self {
        Column { elements }
    }

    /// Number of logical slots, absent ones included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the column has no logical slots.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Reserved backing capacity, never smaller than [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    /// Upper bound on the number of elements the backing storage can hold
    /// (the `Vec` allocation limit for this element size).
    pub fn max_size(&self) -> usize {
        isize::MAX as usize / mem::size_of::<Nullable<T>>().max(1)
    }

    /// Grow the backing capacity to at least `new_cap` elements. No-op if
    /// the capacity is already sufficient; never shrinks.
    pub fn reserve(&mut self, new_cap: usize) {
        if let Some(additional) = new_cap.checked_sub(self.elements.len()) {
            self.elements.reserve(additional);
        }
    }

    /// Release unused backing capacity; the capacity stays >= the size.
    pub fn shrink_to_fit(&mut self) {
        self.elements.shrink_to_fit();
    }

    /// Remove every logical element. The capacity policy is the backing
    /// `Vec`'s (the allocation is kept).
    pub fn clear(&mut self) {
        trace!("clearing {} elements", self.elements.len());
        self.elements.clear();
    }

    /// Whether the slot at `index` is absent. Follows the safe-read
    /// contract: out-of-range indices read as absent.
    pub fn is_null(&self, index: usize) -> bool {
        self.elements
            .get(index)
            .map_or(true, |element| !element.has_value())
    }

    /// Borrow the elements as a slice.
    pub fn as_slice(&self) -> &[Nullable<T>] {
        &self.elements
    }

    /// Iterate over the elements in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Nullable<T>> {
        self.elements.iter()
    }

    /// Element reference bound to `(self, index)`. The index is not
    /// validated here; reads through the reference resolve via the safe
    /// [`at`](Self::at) semantics at each use.
    pub fn slot(&self, index: usize) -> SlotRef<'_, T> {
        SlotRef::new(self, index)
    }

    /// Mutable element reference bound to `(self, index)`. Writes through it
    /// are silent no-ops (reported `false`) if the index is out of range.
    pub fn slot_mut(&mut self, index: usize) -> SlotMut<'_, T> {
        SlotMut::new(self, index)
    }

    /// Overwrite the slot at `index` and report whether the index was in
    /// range; out of range performs no mutation. `set(index, Null)` is
    /// equivalent to [`reset`](Self::reset).
    pub fn set<V: Into<Nullable<T>>>(&mut self, index: usize, value: V) -> bool {
        match self.elements.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => {
                trace!(index, len = self.elements.len(), "rejected out-of-range write");
                false
            }
        }
    }

    /// Mark the slot at `index` absent and report whether the index was in
    /// range; out of range performs no mutation.
    pub fn reset(&mut self, index: usize) -> bool {
        match self.elements.get_mut(index) {
            Some(slot) => {
                *slot = Nullable::null();
                true
            }
            None => {
                trace!(index, len = self.elements.len(), "rejected out-of-range reset");
                false
            }
        }
    }
}

impl<T: Clone> Column<T> {
    /// Safe read: the element at `index`, or an absent element when `index`
    /// is out of range. Never fails; `usize` makes negative indices
    /// unrepresentable.
    pub fn at(&self, index: usize) -> Nullable<T> {
        self.elements.get(index).cloned().unwrap_or(Nullable::null())
    }

    /// First logical element.
    ///
    /// # Panics
    ///
    /// Panics if the column is empty; guard with
    /// [`is_empty`](Self::is_empty). The original leaves this unchecked,
    /// here it is a hard contract failure.
    pub fn front(&self) -> Nullable<T> {
        match self.elements.first() {
            Some(element) => element.clone(),
            None => panic!("front() called on an empty column"),
        }
    }

    /// Last logical element.
    ///
    /// # Panics
    ///
    /// Panics if the column is empty; guard with
    /// [`is_empty`](Self::is_empty).
    pub fn back(&self) -> Nullable<T> {
        match self.elements.last() {
            Some(element) => element.clone(),
            None => panic!("back() called on an empty column"),
        }
    }

    /// Broadcast assignment: set every slot to `value`. A plain value makes
    /// every slot present, `Null` makes every slot absent. The size is
    /// unchanged.
    pub fn fill<V: Into<Nullable<T>>>(&mut self, value: V) {
        self.elements.fill(value.into());
    }

    /// Lift a unary element operation over the whole column.
    fn map_elements<U>(&self, f: impl Fn(Nullable<T>) -> Nullable<U>) -> Column<U> {
        Column {
            elements: self.elements.iter().cloned().map(f).collect(),
        }
    }

    /// Lift a binary element operation over two columns. The result has the
    /// size of the larger column; the shorter side reads absent past its own
    /// end via [`at`](Self::at).
    fn zip_elements<U>(
        &self,
        rhs: &Column<T>,
        f: impl Fn(Nullable<T>, Nullable<T>) -> Nullable<U>,
    ) -> Column<U> {
        let len = self.len().max(rhs.len());
        let mut elements = Vec::with_capacity(len);
        for index in 0..len {
            elements.push(f(self.at(index), rhs.at(index)));
        }
        Column { elements }
    }

    /// Element-wise logical negation with the truthiness rule of
    /// [`Nullable::logical_not`].
    pub fn logical_not(&self) -> Column<bool>
    where
        T: Zero,
    {
        self.map_elements(Nullable::logical_not)
    }

    /// Element-wise null-propagating equality, with the same permissive
    /// max-size broadcast as the arithmetic operators.
    pub fn null_eq(&self, rhs: &Column<T>) -> Column<bool>
    where
        T: PartialEq,
    {
        self.zip_elements(rhs, |lhs, rhs| lhs.null_eq(rhs))
    }

    /// Element-wise null-propagating inequality.
    pub fn null_ne(&self, rhs: &Column<T>) -> Column<bool>
    where
        T: PartialEq,
    {
        self.zip_elements(rhs, |lhs, rhs| lhs.null_ne(rhs))
    }

    /// Null-propagating equality against a single value or absent element.
    pub fn null_eq_value<V: Into<Nullable<T>>>(&self, rhs: V) -> Column<bool>
    where
        T: PartialEq,
    {
        let rhs = rhs.into();
        self.map_elements(|lhs| lhs.null_eq(rhs.clone()))
    }

    /// Null-propagating inequality against a single value or absent element.
    pub fn null_ne_value<V: Into<Nullable<T>>>(&self, rhs: V) -> Column<bool>
    where
        T: PartialEq,
    {
        let rhs = rhs.into();
        self.map_elements(|lhs| lhs.null_ne(rhs.clone()))
    }
}

impl<T> From<Vec<T>> for Column<T> {
    fn from(values: Vec<T>) -> Self {
        Column::from_values(values)
    }
}

impl<T> FromIterator<T> for Column<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Column::from_values(iter)
    }
}

impl<T> FromIterator<Nullable<T>> for Column<T> {
    fn from_iter<I: IntoIterator<Item = Nullable<T>>>(iter: I) -> Self {
        Column {
            elements: iter.into_iter().collect(),
        }
    }
}

/// One element per line in index order, each rendered as its `Nullable` form.
impl<T: fmt::Display> fmt::Display for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            writeln!(f, "{element}")?;
        }
        Ok(())
    }
}

impl<'a, T: Neg<Output = T> + Clone> Neg for &'a Column<T> {
    type Output = Column<T>;

    fn neg(self) -> Column<T> {
        self.map_elements(|element| -element)
    }
}

impl<'a, T: Not<Output = T> + Clone> Not for &'a Column<T> {
    type Output = Column<T>;

    fn not(self) -> Column<T> {
        self.map_elements(|element| !element)
    }
}

// Binary operators, generic shapes: column against column, nullable element
// or the absent literal on either side.
macro_rules! impl_column_binop {
    ($op:ident, $method:ident) => {
        impl<'a, 'b, T: $op<Output = T> + Clone> $op<&'b Column<T>> for &'a Column<T> {
            type Output = Column<T>;

            fn $method(self, rhs: &'b Column<T>) -> Column<T> {
                self.zip_elements(rhs, |lhs, rhs| lhs.$method(rhs))
            }
        }

        impl<'a, T: $op<Output = T> + Clone> $op<Nullable<T>> for &'a Column<T> {
            type Output = Column<T>;

            fn $method(self, rhs: Nullable<T>) -> Column<T> {
                self.map_elements(|lhs| lhs.$method(rhs.clone()))
            }
        }

        impl<'a, T: $op<Output = T> + Clone> $op<&'a Column<T>> for Nullable<T> {
            type Output = Column<T>;

            fn $method(self, rhs: &'a Column<T>) -> Column<T> {
                rhs.map_elements(|rhs| self.clone().$method(rhs))
            }
        }

        impl<'a, T: Clone> $op<Null> for &'a Column<T> {
            type Output = Column<T>;

            fn $method(self, _: Null) -> Column<T> {
                self.map_elements(|_| Nullable::null())
            }
        }

        impl<'a, T: Clone> $op<&'a Column<T>> for Null {
            type Output = Column<T>;

            fn $method(self, rhs: &'a Column<T>) -> Column<T> {
                rhs.map_elements(|_| Nullable::null())
            }
        }
    };
}

impl_column_binop!(Add, add);
impl_column_binop!(Sub, sub);
impl_column_binop!(Mul, mul);
impl_column_binop!(Div, div);
impl_column_binop!(Rem, rem);
impl_column_binop!(BitAnd, bitand);
impl_column_binop!(BitOr, bitor);
impl_column_binop!(BitXor, bitxor);

// Binary operators, scalar shapes, enumerated per primitive type.
macro_rules! impl_column_scalar_binop {
    ($t:ty, $op:ident, $method:ident) => {
        impl<'a> $op<$t> for &'a Column<$t> {
            type Output = Column<$t>;

            fn $method(self, rhs: $t) -> Column<$t> {
                self.map_elements(|lhs| lhs.$method(rhs))
            }
        }

        impl<'a> $op<&'a Column<$t>> for $t {
            type Output = Column<$t>;

            fn $method(self, rhs: &'a Column<$t>) -> Column<$t> {
                rhs.map_elements(|rhs| self.$method(rhs))
            }
        }
    };
}

macro_rules! impl_column_scalar_arith {
    ($($t:ty),* $(,)?) => {$(
        impl_column_scalar_binop!($t, Add, add);
        impl_column_scalar_binop!($t, Sub, sub);
        impl_column_scalar_binop!($t, Mul, mul);
        impl_column_scalar_binop!($t, Div, div);
        impl_column_scalar_binop!($t, Rem, rem);
    )*};
}

macro_rules! impl_column_scalar_bits {
    ($($t:ty),* $(,)?) => {$(
        impl_column_scalar_binop!($t, BitAnd, bitand);
        impl_column_scalar_binop!($t, BitOr, bitor);
        impl_column_scalar_binop!($t, BitXor, bitxor);
    )*};
}

impl_column_scalar_arith!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64);
impl_column_scalar_bits!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, bool);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Column<i32> {
        Column::from_values(vec![1, 2, 3, 4, 5])
    }

    #[test]
    fn test_from_values_all_present() {
        let col = sample();
        assert_eq!(col.len(), 5);
        assert!(!col.is_empty());
        assert!(col.capacity() >= col.len());
        for i in 0..5 {
            assert_eq!(col.at(i), Nullable::new(i as i32 + 1));
        }
    }

    #[test]
    fn test_at_out_of_range_is_absent() {
        let col = sample();
        assert_eq!(col.at(5), Nullable::null());
        assert_eq!(col.at(usize::MAX), Nullable::null());
    }

    #[test]
    fn test_set_and_reset_in_range() {
        let mut col = sample();
        assert!(col.set(0, 100));
        assert_eq!(col.at(0), Nullable::new(100));
        assert!(col.reset(1));
        assert_eq!(col.at(1), Nullable::null());
        // set with the absent literal is reset
        assert!(col.set(2, Null));
        assert_eq!(col.at(2), Nullable::null());
        assert_eq!(col.len(), 5);
    }

    #[test]
    fn test_set_out_of_range_leaves_column_unchanged() {
        let mut col = sample();
        let before = col.clone();
        assert!(!col.set(5, 100));
        assert!(!col.reset(5));
        assert_eq!(col, before);
    }

    #[test]
    fn test_fill_broadcasts() {
        let mut col = sample();
        col.fill(7);
        assert_eq!(col.len(), 5);
        assert!(col.iter().all(|e| *e == Nullable::new(7)));

        col.fill(Null);
        assert_eq!(col.len(), 5);
        assert!(col.iter().all(|e| !e.has_value()));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        copy.set(0, 99);
        copy.reset(1);
        assert_eq!(original.at(0), Nullable::new(1));
        assert_eq!(original.at(1), Nullable::new(2));
    }

    #[test]
    fn test_capacity_operations() {
        let mut col = sample();
        col.reserve(32);
        assert!(col.capacity() >= 32);
        assert_eq!(col.len(), 5);

        col.shrink_to_fit();
        assert!(col.capacity() >= col.len());

        col.clear();
        assert_eq!(col.len(), 0);
        assert!(col.is_empty());
        assert!(col.max_size() > 0);
    }

    #[test]
    fn test_front_and_back() {
        let col = sample();
        assert_eq!(col.front(), Nullable::new(1));
        assert_eq!(col.back(), Nullable::new(5));
    }

    #[test]
    #[should_panic(expected = "empty column")]
    fn test_front_on_empty_panics() {
        let _ = Column::<i32>::new().front();
    }

    #[test]
    fn test_unary_operators() {
        let col = sample();
        let negated = -&col;
        assert_eq!(negated.at(0), Nullable::new(-1));
        assert_eq!(negated.len(), 5);

        let complemented = !&col;
        assert_eq!(complemented.at(0), Nullable::new(!1));

        let logical = col.logical_not();
        assert_eq!(logical.at(0), Nullable::new(false));
    }

    #[test]
    fn test_unary_skips_absent_elements() {
        let mut col = sample();
        col.reset(2);
        let negated = -&col;
        assert_eq!(negated.at(2), Nullable::null());
        assert_eq!(negated.at(3), Nullable::new(-4));
    }

    #[test]
    fn test_column_column_operators() {
        let lhs = Column::from_values(vec![1, 2, 3]);
        let rhs = Column::from_values(vec![10, 20, 30]);
        let sum = &lhs + &rhs;
        assert_eq!(sum.as_slice(), Column::from_values(vec![11, 22, 33]).as_slice());
        let product = &lhs * &rhs;
        assert_eq!(product.at(2), Nullable::new(90));
    }

    #[test]
    fn test_size_mismatch_pads_with_absent() {
        let short = Column::from_values(vec![1, 2]);
        let long = Column::from_values(vec![10, 20, 30, 40]);
        let sum = &short + &long;
        assert_eq!(sum.len(), 4);
        assert_eq!(sum.at(0), Nullable::new(11));
        assert_eq!(sum.at(1), Nullable::new(22));
        // Beyond the shorter column every element is absent.
        assert_eq!(sum.at(2), Nullable::null());
        assert_eq!(sum.at(3), Nullable::null());

        // Order does not matter for the result size.
        let sum = &long + &short;
        assert_eq!(sum.len(), 4);
        assert_eq!(sum.at(3), Nullable::null());
    }

    #[test]
    fn test_column_scalar_operators() {
        let col = sample();
        let doubled = 2 * &col;
        assert_eq!(doubled.at(4), Nullable::new(10));
        let shifted = &col + 10;
        assert_eq!(shifted.at(0), Nullable::new(11));
        let inverted = 10 - &col;
        assert_eq!(inverted.at(0), Nullable::new(9));
    }

    #[test]
    fn test_column_nullable_operators() {
        let col = sample();
        let shifted = &col + Nullable::new(1);
        assert_eq!(shifted.at(0), Nullable::new(2));
        let absent_shift = &col + Nullable::<i32>::null();
        assert!(absent_shift.iter().all(|e| !e.has_value()));
        let mirrored = Nullable::new(10) - &col;
        assert_eq!(mirrored.at(0), Nullable::new(9));
    }

    #[test]
    fn test_column_null_literal_operators() {
        let col = sample();
        let lhs = &col * Null;
        assert_eq!(lhs.len(), 5);
        assert!(lhs.iter().all(|e| !e.has_value()));
        let rhs = Null * &col;
        assert!(rhs.iter().all(|e| !e.has_value()));
    }

    #[test]
    fn test_null_eq_elementwise() {
        let mut lhs = Column::from_values(vec![1, 2, 3]);
        let mut rhs = Column::from_values(vec![1, 5, 3]);
        lhs.reset(2);
        let eq = lhs.null_eq(&rhs);
        assert_eq!(eq.at(0), Nullable::new(true));
        assert_eq!(eq.at(1), Nullable::new(false));
        assert_eq!(eq.at(2), Nullable::null());

        // Both absent at an index compares equal.
        rhs.reset(2);
        let eq = lhs.null_eq(&rhs);
        assert_eq!(eq.at(2), Nullable::new(true));
    }

    #[test]
    fn test_null_eq_value() {
        let mut col = Column::from_values(vec![1, 2, 1]);
        col.reset(1);
        let eq = col.null_eq_value(1);
        assert_eq!(eq.at(0), Nullable::new(true));
        assert_eq!(eq.at(1), Nullable::null());
        assert_eq!(eq.at(2), Nullable::new(true));

        let ne = col.null_ne_value(1);
        assert_eq!(ne.at(0), Nullable::new(false));
        assert_eq!(ne.at(1), Nullable::null());
    }

    #[test]
    fn test_bitwise_column_operators() {
        let lhs = Column::from_values(vec![0b1100_u8, 0b1111]);
        let rhs = Column::from_values(vec![0b1010_u8, 0b0000]);
        let and = &lhs & &rhs;
        assert_eq!(and.at(0), Nullable::new(0b1000));
        let or = &lhs | 0b0001;
        assert_eq!(or.at(1), Nullable::new(0b1111));
    }

    #[test]
    fn test_from_iterators() {
        let col: Column<i32> = (1..=3).collect();
        assert_eq!(col.len(), 3);

        let col: Column<i32> =
            vec![Nullable::new(1), Nullable::null(), Nullable::new(3)]
                .into_iter()
                .collect();
        assert_eq!(col.len(), 3);
        assert_eq!(col.at(1), Nullable::null());
    }

    #[test]
    fn test_display_one_element_per_line() {
        let mut col = Column::from_values(vec![1, 2, 3]);
        col.reset(1);
        assert_eq!(col.to_string(), "1\nNull\n3\n");
        assert_eq!(Column::<i32>::new().to_string(), "");
    }
}
