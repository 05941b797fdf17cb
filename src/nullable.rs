//! # Nullable Value
//!
//! `Nullable<T>` is the element type of a column: a value of `T` or the
//! explicit absent marker. The operator impls in this module define, once,
//! how every supported operator behaves when one or both operands may be
//! absent: any absent operand forces an absent result, and the wrapped
//! operator is never invoked without a presence check on every operand.
//!
//! Operand shapes per binary operator (spec'd by the overload set of the
//! original dataframe column):
//!
//! - `Nullable<T> op Nullable<T>` (generic)
//! - `Nullable<T> op Null` / `Null op Nullable<T>` (generic, unconditionally
//!   absent)
//! - `Nullable<T> op T` / `T op Nullable<T>` (enumerated per primitive type;
//!   Rust coherence does not allow the scalar side to stay generic)

use num_traits::Zero;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Sub};

/// Textual form of an absent element.
pub const NULL_TOKEN: &str = "Null";

/// The absent literal, usable on either side of any nullable operator.
///
/// `Null` plays the role the source language's bare null literal plays:
/// combining it with anything through an arithmetic or bitwise operator is
/// unconditionally absent, and comparing against it with `==`/`!=` answers
/// plain `true`/`false` (is the other side absent or not).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Null;

impl fmt::Display for Null {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NULL_TOKEN)
    }
}

/// A value of `T` or the explicit absent marker.
///
/// Structural `PartialEq`/`Eq` are derived for container comparison; the
/// null-propagating three-valued comparison of the operator algebra is
/// [`Nullable::null_eq`] / [`Nullable::null_ne`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Nullable<T>(Option<T>);

impl<T> Nullable<T> {
    /// Wrap a present value.
    pub fn new(value: T) -> Self {
        Nullable(Some(value))
    }

    /// The absent element.
    pub const fn null() -> Self {
        Nullable(None)
    }

    /// Whether the element holds a value.
    pub fn has_value(&self) -> bool {
        self.0.is_some()
    }

    /// Unwrap the contained value.
    ///
    /// # Panics
    ///
    /// Panics if the element is absent. Callers must guard with
    /// [`has_value`](Self::has_value) first; the original leaves this
    /// unchecked, here it is a hard contract failure.
    pub fn value(self) -> T {
        match self.0 {
            Some(value) => value,
            None => panic!("value() called on an absent element"),
        }
    }

    /// View the element as a standard `Option`.
    pub fn as_option(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Convert into a standard `Option`.
    pub fn into_option(self) -> Option<T> {
        self.0
    }

    /// Apply `f` to a present value, propagate absence otherwise.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Nullable<U> {
        Nullable(self.0.map(f))
    }

    /// Null-propagating equality.
    ///
    /// Two absent elements compare equal (`true`, not absent); an absent
    /// element against a present one is absent; two present elements compare
    /// by value. For the literal test (`is this element absent?`) use
    /// `x == Null`, which answers a plain `bool`.
    pub fn null_eq<R: Into<Nullable<T>>>(self, rhs: R) -> Nullable<bool>
    where
        T: PartialEq,
    {
        match (self.0, rhs.into().0) {
            (None, None) => Nullable::new(true),
            (Some(lhs), Some(rhs)) => Nullable::new(lhs == rhs),
            _ => Nullable::null(),
        }
    }

    /// Null-propagating inequality: the negation of [`null_eq`](Self::null_eq)
    /// wherever that is present, absent wherever it is absent.
    pub fn null_ne<R: Into<Nullable<T>>>(self, rhs: R) -> Nullable<bool>
    where
        T: PartialEq,
    {
        self.null_eq(rhs).map(|eq| !eq)
    }

    /// Logical negation with the source language's truthiness rule: a
    /// present value negates to whether it equals zero, absence propagates.
    ///
    /// Rust's `!` operator (the [`Not`] impl) keeps its native meaning
    /// instead: bitwise complement on integers, logical negation on `bool`.
    pub fn logical_not(self) -> Nullable<bool>
    where
        T: Zero,
    {
        Nullable(self.0.map(|value| value.is_zero()))
    }
}

impl<T> From<Null> for Nullable<T> {
    fn from(_: Null) -> Self {
        Nullable(None)
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Nullable(value)
    }
}

// Present-value conversions are enumerated per element type; a blanket
// `From<T>` would collide with the `From<Null>` impl under coherence.
macro_rules! impl_from_value {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for Nullable<$t> {
            fn from(value: $t) -> Self {
                Nullable(Some(value))
            }
        }
    )*};
}

impl_from_value!(
    i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64, bool, char, String
);

impl<'a> From<&'a str> for Nullable<String> {
    fn from(value: &'a str) -> Self {
        Nullable(Some(value.to_owned()))
    }
}

/// Present value renders as itself, absence as the `Null` token.
impl<T: fmt::Display> fmt::Display for Nullable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str(NULL_TOKEN),
        }
    }
}

/// `x == Null` answers whether `x` is absent (plain `bool`, not three-valued).
impl<T> PartialEq<Null> for Nullable<T> {
    fn eq(&self, _: &Null) -> bool {
        self.0.is_none()
    }
}

impl<T> PartialEq<Nullable<T>> for Null {
    fn eq(&self, other: &Nullable<T>) -> bool {
        other.0.is_none()
    }
}

// Unary operators. `-` and `!` keep their Rust meaning; the original's `~`
// maps onto Rust's `!` over integers.

impl<T: Neg<Output = T>> Neg for Nullable<T> {
    type Output = Nullable<T>;

    fn neg(self) -> Nullable<T> {
        Nullable(self.0.map(|value| -value))
    }
}

impl<T: Not<Output = T>> Not for Nullable<T> {
    type Output = Nullable<T>;

    fn not(self) -> Nullable<T> {
        Nullable(self.0.map(|value| !value))
    }
}

// Binary operators, generic shapes: both operands nullable, or one side the
// absent literal. The literal shapes never evaluate the operator at all.
macro_rules! impl_nullable_binop {
    ($op:ident, $method:ident) => {
        impl<T: $op<Output = T>> $op for Nullable<T> {
            type Output = Nullable<T>;

            fn $method(self, rhs: Nullable<T>) -> Nullable<T> {
                match (self.0, rhs.0) {
                    (Some(lhs), Some(rhs)) => Nullable(Some(lhs.$method(rhs))),
                    _ => Nullable(None),
                }
            }
        }

        impl<T> $op<Null> for Nullable<T> {
            type Output = Nullable<T>;

            fn $method(self, _: Null) -> Nullable<T> {
                Nullable(None)
            }
        }

        impl<T> $op<Nullable<T>> for Null {
            type Output = Nullable<T>;

            fn $method(self, _: Nullable<T>) -> Nullable<T> {
                Nullable(None)
            }
        }
    };
}

impl_nullable_binop!(Add, add);
impl_nullable_binop!(Sub, sub);
impl_nullable_binop!(Mul, mul);
impl_nullable_binop!(Div, div);
impl_nullable_binop!(Rem, rem);
impl_nullable_binop!(BitAnd, bitand);
impl_nullable_binop!(BitOr, bitor);
impl_nullable_binop!(BitXor, bitxor);

// Binary operators, scalar shapes: `Nullable<T> op T` and `T op Nullable<T>`,
// one impl pair per primitive type.
macro_rules! impl_scalar_binop {
    ($t:ty, $op:ident, $method:ident) => {
        impl $op<$t> for Nullable<$t> {
            type Output = Nullable<$t>;

            fn $method(self, rhs: $t) -> Nullable<$t> {
                Nullable(self.0.map(|lhs| lhs.$method(rhs)))
            }
        }

        impl $op<Nullable<$t>> for $t {
            type Output = Nullable<$t>;

            fn $method(self, rhs: Nullable<$t>) -> Nullable<$t> {
                Nullable(rhs.0.map(|rhs| self.$method(rhs)))
            }
        }
    };
}

macro_rules! impl_scalar_arith {
    ($($t:ty),* $(,)?) => {$(
        impl_scalar_binop!($t, Add, add);
        impl_scalar_binop!($t, Sub, sub);
        impl_scalar_binop!($t, Mul, mul);
        impl_scalar_binop!($t, Div, div);
        impl_scalar_binop!($t, Rem, rem);
    )*};
}

macro_rules! impl_scalar_bits {
    ($($t:ty),* $(,)?) => {$(
        impl_scalar_binop!($t, BitAnd, bitand);
        impl_scalar_binop!($t, BitOr, bitor);
        impl_scalar_binop!($t, BitXor, bitxor);
    )*};
}

impl_scalar_arith!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64);
impl_scalar_bits!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, bool);
