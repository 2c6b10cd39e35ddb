//! # Finite-Number Guard
//!
//! `serde_json` writes NaN and infinities as `null` before any formatter sees
//! them, so `serde_jcs` alone would let two different values share one
//! encoding. This serializer walks a value first and rejects non-finite floats.

use serde::ser::{self, Serialize};
use std::fmt;

use crate::domain::EncodingError;

/// Reject values containing NaN or infinite floats.
pub(crate) fn ensure_finite<T: Serialize + ?Sized>(value: &T) -> Result<(), EncodingError> {
    value.serialize(FiniteGuard).map_err(|e| match e {
        GuardError::NonFinite(v) => EncodingError::NonFiniteNumber(v),
        GuardError::Custom(msg) => EncodingError::Unrepresentable(msg),
    })
}

#[derive(Debug)]
enum GuardError {
    NonFinite(String),
    Custom(String),
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(v) => write!(f, "non-finite number {v}"),
            Self::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for GuardError {}

impl ser::Error for GuardError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

fn check_float(v: f64) -> Result<(), GuardError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(GuardError::NonFinite(v.to_string()))
    }
}

#[derive(Clone, Copy)]
struct FiniteGuard;

/// Scalars that can never be non-finite.
macro_rules! accept_scalars {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(fn $method(self, _v: $ty) -> Result<(), GuardError> { Ok(()) })*
    };
}

/// Compound serializers: every element is walked with the same guard.
macro_rules! walk_compound {
    ($($trait:ident::$method:ident$(($key:ty))?),* $(,)?) => {$(
        impl ser::$trait for FiniteGuard {
            type Ok = ();
            type Error = GuardError;

            fn $method<T: Serialize + ?Sized>(
                &mut self,
                $(_key: $key,)?
                value: &T,
            ) -> Result<(), GuardError> {
                value.serialize(*self)
            }

            fn end(self) -> Result<(), GuardError> {
                Ok(())
            }
        }
    )*};
}

impl ser::Serializer for FiniteGuard {
    type Ok = ();
    type Error = GuardError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept_scalars!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_f32(self, v: f32) -> Result<(), GuardError> {
        check_float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), GuardError> {
        check_float(v)
    }

    fn serialize_none(self) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_unit(self) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), GuardError> {
        value.serialize(self)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), GuardError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<(), GuardError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<(), GuardError> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, GuardError> {
        Ok(self)
    }
}

walk_compound!(
    SerializeSeq::serialize_element,
    SerializeTuple::serialize_element,
    SerializeTupleStruct::serialize_field,
    SerializeTupleVariant::serialize_field,
    SerializeStruct::serialize_field(&'static str),
    SerializeStructVariant::serialize_field(&'static str),
);

// Keys are walked too, so a float key is caught here rather than by serde_json.
impl ser::SerializeMap for FiniteGuard {
    type Ok = ();
    type Error = GuardError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), GuardError> {
        key.serialize(*self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), GuardError> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), GuardError> {
        Ok(())
    }
}
