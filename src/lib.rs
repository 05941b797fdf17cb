//! # nullable-column
//!
//! A small in-memory columnar container whose elements may be absent, with
//! ordinary arithmetic, bitwise and comparison operators lifted over the
//! "maybe absent" semantics: any operation touching an absent element yields
//! an absent result, never a failure.
//!
//! Three layers, bottom up:
//!
//! - [`Nullable<T>`] and the [`Null`] literal — the element type and the
//!   null-propagating operator algebra over every operand shape
//!   (value, nullable, literal, on either side).
//! - [`Column<T>`] — the ordered, resizable sequence of nullable elements:
//!   Vec-style capacity management, safe indexed reads (out of range is
//!   absent, not an error), boolean-flag writes, broadcast fill, and the
//!   operator algebra lifted element-wise with permissive size broadcasting.
//! - [`SlotRef`]/[`SlotMut`] — element references: `(column, index)` proxies
//!   that resolve the denoted slot fresh at every use and let indexed access
//!   participate in assignment and in the operator algebra.
//!
//! ```
//! use nullable_column::{Column, Null, Nullable};
//!
//! let mut col = Column::from_values(vec![1_i32, 2, 3]);
//! col.reset(1);
//!
//! assert_eq!(col.at(0) + 10, Nullable::new(11));
//! assert_eq!(col.at(1) + 10, Nullable::null()); // absence propagates
//! assert_eq!(col.at(99), Nullable::null()); // safe read
//! assert_eq!(Null * col.at(0), Nullable::null()); // literal wins
//! assert_eq!(col.to_string(), "1\nNull\n3\n");
//! ```

pub mod column;
pub mod nullable;
pub mod slot;

pub use column::Column;
pub use nullable::{Null, Nullable, NULL_TOKEN};
pub use slot::{SlotMut, SlotRef};
