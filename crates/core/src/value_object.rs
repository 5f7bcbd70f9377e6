//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two tax rates
/// with the same percentage are the same tax rate for pricing purposes, no
/// matter where they came from. To "modify" a value object, build a new one.
///
/// The trait only asks for what that implies: `Clone` (values are copied, not
/// referenced), `PartialEq` (compared by attributes), and `Debug`.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
