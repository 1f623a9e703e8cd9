//! The [`Bindable`] trait and its implementations for standard types.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use indexmap::IndexMap;

use crate::{Kind, Shape, TypeDesc, Value};

/// A type the binder can decode into and encode from.
///
/// Conversions are total: [`from_value`](Bindable::from_value) returns the
/// zero value when handed a [`Value`] of the wrong shape. Structs implement
/// this trait through `#[derive(Bindable)]`.
///
/// # Example
///
/// ```rust
/// use parambind::{Bindable, Value};
///
/// assert_eq!(u8::from_value(Value::Int(7)), 7);
/// assert_eq!(u8::from_value(Value::from("7")), 0);
/// ```
pub trait Bindable: Sized + 'static {
    /// Describes the type for codec dispatch.
    fn describe() -> TypeDesc;

    /// Converts a decoded value; mismatches yield [`zero`](Bindable::zero).
    fn from_value(value: Value) -> Self;

    /// Converts into the dynamic form consumed by encoders.
    fn to_value(&self) -> Value;

    /// The zero value: what a failed decode produces.
    fn zero() -> Self;
}

impl Bindable for bool {
    fn describe() -> TypeDesc {
        TypeDesc::scalar::<Self>(Kind::Bool)
    }

    fn from_value(value: Value) -> Self {
        matches!(value, Value::Bool(true))
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn zero() -> Self {
        false
    }
}

macro_rules! impl_integer {
    ($variant:ident => $($ty:ty : $kind:ident),+ $(,)?) => {
        $(
            impl Bindable for $ty {
                fn describe() -> TypeDesc {
                    TypeDesc::scalar::<Self>(Kind::$kind)
                }

                fn from_value(value: Value) -> Self {
                    match value {
                        Value::Int(v) => v as Self,
                        Value::Uint(v) => v as Self,
                        _ => 0,
                    }
                }

                fn to_value(&self) -> Value {
                    Value::$variant(*self as _)
                }

                fn zero() -> Self {
                    0
                }
            }
        )+
    };
}

impl_integer!(Int => isize: Int, i8: Int8, i16: Int16, i32: Int32, i64: Int64);
impl_integer!(Uint => usize: Uint, u8: Uint8, u16: Uint16, u32: Uint32, u64: Uint64);

macro_rules! impl_float {
    ($($ty:ty : $kind:ident),+) => {
        $(
            impl Bindable for $ty {
                fn describe() -> TypeDesc {
                    TypeDesc::scalar::<Self>(Kind::$kind)
                }

                fn from_value(value: Value) -> Self {
                    match value {
                        Value::Float(v) => v as Self,
                        _ => 0.0,
                    }
                }

                fn to_value(&self) -> Value {
                    Value::Float(f64::from(*self))
                }

                fn zero() -> Self {
                    0.0
                }
            }
        )+
    };
}

impl_float!(f32: Float32, f64: Float64);

impl Bindable for String {
    fn describe() -> TypeDesc {
        TypeDesc::scalar::<Self>(Kind::String)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => s,
            _ => Self::new(),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn zero() -> Self {
        Self::new()
    }
}

impl<T: Bindable> Bindable for Vec<T> {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Slice, Shape::Slice { elem: T::describe })
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Slice(items) => items.into_iter().map(T::from_value).collect(),
            _ => Self::new(),
        }
    }

    fn to_value(&self) -> Value {
        Value::Slice(self.iter().map(Bindable::to_value).collect())
    }

    fn zero() -> Self {
        Self::new()
    }
}

fn map_entries<'a, K, V>(iter: impl Iterator<Item = (&'a K, &'a V)>) -> Value
where
    K: Bindable,
    V: Bindable,
{
    Value::Map(iter.map(|(k, v)| (k.to_value(), v.to_value())).collect())
}

fn from_entries<K, V, M>(value: Value) -> M
where
    K: Bindable,
    V: Bindable,
    M: FromIterator<(K, V)>,
{
    match value {
        Value::Map(entries) => entries
            .into_iter()
            .map(|(k, v)| (K::from_value(k), V::from_value(v)))
            .collect(),
        _ => std::iter::empty::<(K, V)>().collect(),
    }
}

impl<K, V, S> Bindable for HashMap<K, V, S>
where
    K: Bindable + Eq + Hash,
    V: Bindable,
    S: BuildHasher + Default + 'static,
{
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(
            Kind::Map,
            Shape::Map {
                key: K::describe,
                value: V::describe,
            },
        )
    }

    fn from_value(value: Value) -> Self {
        from_entries(value)
    }

    fn to_value(&self) -> Value {
        map_entries(self.iter())
    }

    fn zero() -> Self {
        Self::default()
    }
}

impl<K, V> Bindable for BTreeMap<K, V>
where
    K: Bindable + Ord,
    V: Bindable,
{
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(
            Kind::Map,
            Shape::Map {
                key: K::describe,
                value: V::describe,
            },
        )
    }

    fn from_value(value: Value) -> Self {
        from_entries(value)
    }

    fn to_value(&self) -> Value {
        map_entries(self.iter())
    }

    fn zero() -> Self {
        Self::new()
    }
}

impl<K, V, S> Bindable for IndexMap<K, V, S>
where
    K: Bindable + Eq + Hash,
    V: Bindable,
    S: BuildHasher + Default + 'static,
{
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(
            Kind::Map,
            Shape::Map {
                key: K::describe,
                value: V::describe,
            },
        )
    }

    fn from_value(value: Value) -> Self {
        from_entries(value)
    }

    fn to_value(&self) -> Value {
        map_entries(self.iter())
    }

    fn zero() -> Self {
        Self::default()
    }
}

impl<T: Bindable> Bindable for Box<T> {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Pointer, Shape::Pointer { pointee: T::describe })
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Pointer(Some(inner)) => Self::new(T::from_value(*inner)),
            _ => Self::new(T::zero()),
        }
    }

    fn to_value(&self) -> Value {
        Value::Pointer(Some(Box::new(self.as_ref().to_value())))
    }

    fn zero() -> Self {
        Self::new(T::zero())
    }
}

impl<T: Bindable> Bindable for Option<T> {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Pointer, Shape::Pointer { pointee: T::describe })
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Pointer(Some(inner)) => Some(T::from_value(*inner)),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        Value::Pointer(self.as_ref().map(|inner| Box::new(inner.to_value())))
    }

    fn zero() -> Self {
        None
    }
}

// Time types carry no bindable fields; they are reached through the
// exact-type time codec.
impl Bindable for NaiveDateTime {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Struct, Shape::Scalar)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Time(t) => t,
            _ => Self::default(),
        }
    }

    fn to_value(&self) -> Value {
        Value::Time(*self)
    }

    fn zero() -> Self {
        Self::default()
    }
}

impl Bindable for NaiveDate {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Struct, Shape::Scalar)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Time(t) => t.date(),
            _ => Self::default(),
        }
    }

    fn to_value(&self) -> Value {
        Value::Time(self.and_time(NaiveTime::MIN))
    }

    fn zero() -> Self {
        Self::default()
    }
}

impl Bindable for DateTime<Utc> {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Struct, Shape::Scalar)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Time(t) => Utc.from_utc_datetime(&t),
            _ => Self::default(),
        }
    }

    fn to_value(&self) -> Value {
        Value::Time(self.naive_utc())
    }

    fn zero() -> Self {
        Self::default()
    }
}

impl Bindable for Bytes {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Slice, Shape::Slice { elem: u8::describe })
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Bytes(bytes) => bytes,
            _ => Self::new(),
        }
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn zero() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_truncation_happens_on_conversion() {
        assert_eq!(i8::from_value(Value::Int(1024)), 0);
        assert_eq!(u8::from_value(Value::Uint(257)), 1);
        assert_eq!(i64::from_value(Value::Int(-5)), -5);
    }

    #[test]
    fn test_mismatch_yields_zero() {
        assert_eq!(String::from_value(Value::Int(1)), "");
        assert!(!bool::from_value(Value::from("true")));
        assert!(Vec::<i32>::from_value(Value::Nil).is_empty());
        assert_eq!(Option::<u32>::from_value(Value::Bool(true)), None);
    }

    #[test]
    fn test_nested_conversion() {
        let value = Value::Map(vec![
            (Value::Int(5), Value::Slice(vec![Value::from("a")])),
            (Value::Int(6), Value::Slice(Vec::new())),
        ]);
        let map = HashMap::<i32, Vec<String>>::from_value(value);
        assert_eq!(map[&5], vec!["a".to_string()]);
        assert!(map[&6].is_empty());
    }

    #[test]
    fn test_pointer_round_trip() {
        let value = Some(3u16).to_value();
        assert_eq!(value, Value::Pointer(Some(Box::new(Value::Uint(3)))));
        assert_eq!(Option::<u16>::from_value(value), Some(3));
        assert_eq!(None::<u16>.to_value(), Value::Pointer(None));
    }

    #[test]
    fn test_time_types_share_value() {
        let date = NaiveDate::from_ymd_opt(1982, 7, 9).unwrap();
        let value = date.to_value();
        assert_eq!(NaiveDate::from_value(value), date);

        let stamp = date.and_hms_opt(21, 30, 0).unwrap();
        let utc = DateTime::<Utc>::from_value(Value::Time(stamp));
        assert_eq!(utc.naive_utc(), stamp);
    }

    #[test]
    fn test_float_widths() {
        assert!((f32::from_value(Value::Float(1.5)) - 1.5).abs() < f32::EPSILON);
        assert_eq!(f64::zero().to_value(), Value::Float(0.0));
    }
}
