//! # Element References
//!
//! Proxies for a single logical slot of a [`Column`], so indexed access can
//! participate in assignment and in the nullable operator algebra without
//! spelling out `at`/`set` at every use.
//!
//! A proxy is a `(column, index)` pair. It never caches the element: every
//! read resolves through the column's safe [`Column::at`] at the moment of
//! use, every write forwards to [`Column::set`]/[`Column::reset`] with their
//! silent-no-op out-of-range contract. The borrow a proxy holds on its
//! column is what rules out the aliasing hazard of the original design: a
//! proxy cannot outlive its column, and a live proxy blocks structural
//! mutation of the column it points into.

use crate::column::Column;
use crate::nullable::{Null, Nullable};
use num_traits::Zero;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Sub};

/// Read proxy for one logical slot, returned by [`Column::slot`].
///
/// Behaves exactly like the `Nullable` element it currently denotes;
/// participates in every operator shape the element type does.
#[derive(Debug)]
pub struct SlotRef<'a, T> {
    column: &'a Column<T>,
    index: usize,
}

impl<T> Clone for SlotRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlotRef<'_, T> {}

impl<'a, T> SlotRef<'a, T> {
    pub(crate) fn new(column: &'a Column<T>, index: usize) -> Self {
        SlotRef { column, index }
    }

    /// The index this proxy denotes.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the denoted slot currently holds a value. Out-of-range slots
    /// read as absent.
    pub fn has_value(&self) -> bool {
        !self.column.is_null(self.index)
    }
}

impl<'a, T: Clone> SlotRef<'a, T> {
    /// Resolve the denoted element, fresh, through the column's safe read.
    pub fn get(&self) -> Nullable<T> {
        self.column.at(self.index)
    }

    /// Unwrap the denoted value.
    ///
    /// # Panics
    ///
    /// Panics if the slot is absent or out of range; guard with
    /// [`has_value`](Self::has_value) first.
    pub fn value(&self) -> T {
        self.get().value()
    }

    /// Null-propagating equality of the denoted element against a value,
    /// nullable element, or another proxy's element.
    pub fn null_eq<R: Into<Nullable<T>>>(self, rhs: R) -> Nullable<bool>
    where
        T: PartialEq,
    {
        self.get().null_eq(rhs)
    }

    /// Null-propagating inequality of the denoted element.
    pub fn null_ne<R: Into<Nullable<T>>>(self, rhs: R) -> Nullable<bool>
    where
        T: PartialEq,
    {
        self.get().null_ne(rhs)
    }

    /// Logical negation of the denoted element with the truthiness rule of
    /// [`Nullable::logical_not`].
    pub fn logical_not(self) -> Nullable<bool>
    where
        T: Zero,
    {
        self.get().logical_not()
    }
}

impl<'a, T: Clone> From<SlotRef<'a, T>> for Nullable<T> {
    fn from(slot: SlotRef<'a, T>) -> Self {
        slot.get()
    }
}

/// Renders as the denoted element: its value, or the `Null` token.
impl<T: Clone + fmt::Display> fmt::Display for SlotRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get().fmt(f)
    }
}

/// `slot == Null` answers whether the denoted slot is absent (out-of-range
/// slots are absent).
impl<T> PartialEq<Null> for SlotRef<'_, T> {
    fn eq(&self, _: &Null) -> bool {
        !self.has_value()
    }
}

impl<T> PartialEq<SlotRef<'_, T>> for Null {
    fn eq(&self, other: &SlotRef<'_, T>) -> bool {
        !other.has_value()
    }
}

impl<'a, T: Neg<Output = T> + Clone> Neg for SlotRef<'a, T> {
    type Output = Nullable<T>;

    fn neg(self) -> Nullable<T> {
        -self.get()
    }
}

impl<'a, T: Not<Output = T> + Clone> Not for SlotRef<'a, T> {
    type Output = Nullable<T>;

    fn not(self) -> Nullable<T> {
        !self.get()
    }
}

// Binary operators, generic shapes: proxy against proxy, nullable element or
// the absent literal on either side. Each use resolves the slot fresh.
macro_rules! impl_slot_binop {
    ($op:ident, $method:ident) => {
        impl<'a, 'b, T: $op<Output = T> + Clone> $op<SlotRef<'b, T>> for SlotRef<'a, T> {
            type Output = Nullable<T>;

            fn $method(self, rhs: SlotRef<'b, T>) -> Nullable<T> {
                self.get().$method(rhs.get())
            }
        }

        impl<'a, T: $op<Output = T> + Clone> $op<Nullable<T>> for SlotRef<'a, T> {
            type Output = Nullable<T>;

            fn $method(self, rhs: Nullable<T>) -> Nullable<T> {
                self.get().$method(rhs)
            }
        }

        impl<'a, T: $op<Output = T> + Clone> $op<SlotRef<'a, T>> for Nullable<T> {
            type Output = Nullable<T>;

            fn $method(self, rhs: SlotRef<'a, T>) -> Nullable<T> {
                self.$method(rhs.get())
            }
        }

        impl<'a, T: Clone> $op<Null> for SlotRef<'a, T> {
            type Output = Nullable<T>;

            fn $method(self, _: Null) -> Nullable<T> {
                Nullable::null()
            }
        }

        impl<'a, T: Clone> $op<SlotRef<'a, T>> for Null {
            type Output = Nullable<T>;

            fn $method(self, _: SlotRef<'a, T>) -> Nullable<T> {
                Nullable::null()
            }
        }
    };
}

impl_slot_binop!(Add, add);
impl_slot_binop!(Sub, sub);
impl_slot_binop!(Mul, mul);
impl_slot_binop!(Div, div);
impl_slot_binop!(Rem, rem);
impl_slot_binop!(BitAnd, bitand);
impl_slot_binop!(BitOr, bitor);
impl_slot_binop!(BitXor, bitxor);

// Binary operators, scalar shapes, enumerated per primitive type.
macro_rules! impl_slot_scalar_binop {
    ($t:ty, $op:ident, $method:ident) => {
        impl<'a> $op<$t> for SlotRef<'a, $t> {
            type Output = Nullable<$t>;

            fn $method(self, rhs: $t) -> Nullable<$t> {
                self.get().$method(rhs)
            }
        }

        impl<'a> $op<SlotRef<'a, $t>> for $t {
            type Output = Nullable<$t>;

            fn $method(self, rhs: SlotRef<'a, $t>) -> Nullable<$t> {
                self.$method(rhs.get())
            }
        }
    };
}

macro_rules! impl_slot_scalar_arith {
    ($($t:ty),* $(,)?) => {$(
        impl_slot_scalar_binop!($t, Add, add);
        impl_slot_scalar_binop!($t, Sub, sub);
        impl_slot_scalar_binop!($t, Mul, mul);
        impl_slot_scalar_binop!($t, Div, div);
        impl_slot_scalar_binop!($t, Rem, rem);
    )*};
}

macro_rules! impl_slot_scalar_bits {
    ($($t:ty),* $(,)?) => {$(
        impl_slot_scalar_binop!($t, BitAnd, bitand);
        impl_slot_scalar_binop!($t, BitOr, bitor);
        impl_slot_scalar_binop!($t, BitXor, bitxor);
    )*};
}

impl_slot_scalar_arith!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64);
impl_slot_scalar_bits!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, bool);

/// Write proxy for one logical slot, returned by [`Column::slot_mut`].
#[derive(Debug)]
pub struct SlotMut<'a, T> {
    column: &'a mut Column<T>,
    index: usize,
}

impl<'a, T> SlotMut<'a, T> {
    pub(crate) fn new(column: &'a mut Column<T>, index: usize) -> Self {
        SlotMut { column, index }
    }

    /// The index this proxy denotes.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the denoted slot currently holds a value.
    pub fn has_value(&self) -> bool {
        !self.column.is_null(self.index)
    }

    /// Write through to the column: a plain value makes the slot present,
    /// `Null` makes it absent. Reports whether the index was in range; a
    /// stale index (the column shrank) is a silent no-op reported `false`.
    pub fn set<V: Into<Nullable<T>>>(&mut self, value: V) -> bool {
        self.column.set(self.index, value)
    }

    /// Mark the denoted slot absent. Same out-of-range contract as
    /// [`set`](Self::set).
    pub fn set_null(&mut self) -> bool {
        self.column.reset(self.index)
    }

    /// Reborrow as a read proxy for operator use.
    pub fn as_slot(&self) -> SlotRef<'_, T> {
        SlotRef::new(&*self.column, self.index)
    }
}

impl<'a, T: Clone> SlotMut<'a, T> {
    /// Resolve the denoted element, fresh, through the column's safe read.
    pub fn get(&self) -> Nullable<T> {
        self.column.at(self.index)
    }

    /// Unwrap the denoted value.
    ///
    /// # Panics
    ///
    /// Panics if the slot is absent or out of range; guard with
    /// [`has_value`](Self::has_value) first.
    pub fn value(&self) -> T {
        self.get().value()
    }
}

/// Renders as the denoted element: its value, or the `Null` token.
impl<T: Clone + fmt::Display> fmt::Display for SlotMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.get().fmt(f)
    }
}
