//! Leaf codecs for booleans, numbers, strings and time values.
//!
//! All of them read only the first value under their key. Numbers are parsed
//! through the 64-bit representation and then truncated to the width of the
//! target kind, so `"1024"` bound to an `i8` yields `0`.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::binder::{DecodeContext, EncodeContext};
use crate::codec::ScalarCodec;
use crate::{BindError, BindResult, Kind, TypeDesc, Value};

/// `true`, `on` and `1` (trimmed, any case) are true; everything else is false.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl ScalarCodec for BoolCodec {
    fn parse(&self, _cx: &DecodeContext<'_>, raw: &str, _ty: &TypeDesc) -> BindResult<Value> {
        let normalized = raw.trim().to_lowercase();
        Ok(Value::Bool(matches!(normalized.as_str(), "true" | "on" | "1")))
    }

    fn format(&self, _cx: &EncodeContext<'_>, value: &Value, ty: &TypeDesc) -> BindResult<String> {
        match value {
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(BindError::mismatch(ty.name(), "bool", other)),
        }
    }
}

/// Signed integers of every width.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntCodec;

impl ScalarCodec for IntCodec {
    fn parse(&self, _cx: &DecodeContext<'_>, raw: &str, ty: &TypeDesc) -> BindResult<Value> {
        if raw.is_empty() {
            return Ok(ty.zero());
        }
        let parsed: i64 = raw
            .parse()
            .map_err(|e| BindError::parse(raw, ty.kind(), e))?;
        Ok(Value::Int(truncate_signed(parsed, ty.kind())))
    }

    fn format(&self, _cx: &EncodeContext<'_>, value: &Value, ty: &TypeDesc) -> BindResult<String> {
        match value {
            Value::Int(v) => Ok(v.to_string()),
            other => Err(BindError::mismatch(ty.name(), "int", other)),
        }
    }
}

/// Unsigned integers of every width.
#[derive(Debug, Clone, Copy, Default)]
pub struct UintCodec;

impl ScalarCodec for UintCodec {
    fn parse(&self, _cx: &DecodeContext<'_>, raw: &str, ty: &TypeDesc) -> BindResult<Value> {
        if raw.is_empty() {
            return Ok(ty.zero());
        }
        let parsed: u64 = raw
            .parse()
            .map_err(|e| BindError::parse(raw, ty.kind(), e))?;
        Ok(Value::Uint(truncate_unsigned(parsed, ty.kind())))
    }

    fn format(&self, _cx: &EncodeContext<'_>, value: &Value, ty: &TypeDesc) -> BindResult<String> {
        match value {
            Value::Uint(v) => Ok(v.to_string()),
            other => Err(BindError::mismatch(ty.name(), "uint", other)),
        }
    }
}

/// 32- and 64-bit floats. Encodes with six decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatCodec;

impl ScalarCodec for FloatCodec {
    fn parse(&self, _cx: &DecodeContext<'_>, raw: &str, ty: &TypeDesc) -> BindResult<Value> {
        if raw.is_empty() {
            return Ok(ty.zero());
        }
        let parsed: f64 = raw
            .parse()
            .map_err(|e| BindError::parse(raw, ty.kind(), e))?;
        let value = if ty.kind() == Kind::Float32 {
            f64::from(parsed as f32)
        } else {
            parsed
        };
        Ok(Value::Float(value))
    }

    fn format(&self, _cx: &EncodeContext<'_>, value: &Value, ty: &TypeDesc) -> BindResult<String> {
        match value {
            Value::Float(v) => Ok(format!("{v:.6}")),
            other => Err(BindError::mismatch(ty.name(), "float", other)),
        }
    }
}

/// Identity codec for text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl ScalarCodec for StringCodec {
    fn parse(&self, _cx: &DecodeContext<'_>, raw: &str, _ty: &TypeDesc) -> BindResult<Value> {
        Ok(Value::String(raw.to_string()))
    }

    fn format(&self, _cx: &EncodeContext<'_>, value: &Value, ty: &TypeDesc) -> BindResult<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(BindError::mismatch(ty.name(), "string", other)),
        }
    }
}

/// Time values, parsed against the configured layouts in order.
///
/// Encoding writes the date layout when the time of day is exactly
/// midnight and the date-time layout otherwise. A genuine midnight
/// timestamp therefore comes back as a bare date.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeCodec;

impl ScalarCodec for TimeCodec {
    fn parse(&self, cx: &DecodeContext<'_>, raw: &str, ty: &TypeDesc) -> BindResult<Value> {
        cx.options()
            .time_formats
            .iter()
            .find_map(|layout| parse_time(raw, layout))
            .map(Value::Time)
            .ok_or_else(|| BindError::parse(raw, ty.kind(), "no time layout matched"))
    }

    fn format(&self, cx: &EncodeContext<'_>, value: &Value, ty: &TypeDesc) -> BindResult<String> {
        let time = match value {
            Value::Time(t) => t,
            other => return Err(BindError::mismatch(ty.name(), "time", other)),
        };
        let options = cx.options();
        let layout = if time.hour() == 0 && time.minute() == 0 && time.second() == 0 {
            &options.date_format
        } else {
            &options.datetime_format
        };
        format_time(time, layout)
    }
}

/// Parses `raw` with one strftime layout.
///
/// Layouts with an offset are converted to UTC; layouts without time fields
/// yield midnight.
pub fn parse_time(raw: &str, layout: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_str(raw, layout)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, layout))
        .or_else(|_| NaiveDate::parse_from_str(raw, layout).map(|d| d.and_time(NaiveTime::MIN)))
        .ok()
}

/// Renders a time with a strftime layout.
pub fn format_time(time: &NaiveDateTime, layout: &str) -> BindResult<String> {
    let mut out = String::new();
    write!(out, "{}", time.format(layout)).map_err(|_| BindError::Format {
        layout: layout.to_string(),
    })?;
    Ok(out)
}

/// Checks that a strftime layout is non-empty and well formed.
pub fn validate_layout(layout: &str) -> BindResult<()> {
    if layout.trim().is_empty() || StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
        return Err(BindError::Format {
            layout: layout.to_string(),
        });
    }
    Ok(())
}

fn truncate_signed(value: i64, kind: Kind) -> i64 {
    match kind.bits() {
        Some(bits) if bits < 64 => {
            let shift = 64 - bits;
            (value << shift) >> shift
        }
        _ => value,
    }
}

fn truncate_unsigned(value: u64, kind: Kind) -> u64 {
    match kind.bits() {
        Some(bits) if bits < 64 => value & ((1u64 << bits) - 1),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bindable, Binder, BinderOptions, ParameterSet};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn bind_one<T: Bindable>(raw: &str) -> T {
        Binder::default().bind_value(raw)
    }

    #[test]
    fn test_bool_truth_table() {
        for raw in ["true", "On", "1", " TRUE ", "on\n"] {
            assert!(bind_one::<bool>(raw), "{raw:?} should be true");
        }
        for raw in ["", "false", "no", "0", "xyz", "off"] {
            assert!(!bind_one::<bool>(raw), "{raw:?} should be false");
        }
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(bind_one::<i32>("-42"), -42);
        assert_eq!(bind_one::<i8>("1024"), 0);
        assert_eq!(bind_one::<i8>("255"), -1);
        assert_eq!(bind_one::<u8>("257"), 1);
        assert_eq!(bind_one::<u16>("-1"), 0);
        assert_eq!(bind_one::<i64>(""), 0);
        assert_eq!(bind_one::<isize>("12x"), 0);
    }

    #[test]
    fn test_float() {
        assert!((bind_one::<f64>("2.5") - 2.5).abs() < f64::EPSILON);
        assert!((bind_one::<f32>("0.25") - 0.25).abs() < f32::EPSILON);
        assert!(bind_one::<f64>("abc").abs() < f64::EPSILON);

        let out = Binder::default().unbind_to_map("f", &1.5f64);
        assert_eq!(out["f"], "1.500000");
    }

    #[test]
    fn test_string_first_value_only() {
        let params: ParameterSet = [("s", "a"), ("s", "b")].into_iter().collect();
        assert_eq!(Binder::default().bind::<String>(&params, "s"), "a");
        assert_eq!(Binder::default().bind::<String>(&params, "missing"), "");
    }

    #[test]
    fn test_time_layouts_in_order() {
        let binder = Binder::new(
            crate::Registry::with_defaults(),
            BinderOptions::default().with_time_format("%m/%d/%Y"),
        );
        let date = NaiveDate::from_ymd_opt(1982, 7, 9).unwrap();

        let t: NaiveDateTime = binder.bind_value("1982-07-09");
        assert_eq!(t, date.and_hms_opt(0, 0, 0).unwrap());

        let t: NaiveDateTime = binder.bind_value("1982-07-09 21:30");
        assert_eq!(t, date.and_hms_opt(21, 30, 0).unwrap());

        let t: NaiveDate = binder.bind_value("07/09/1982");
        assert_eq!(t, date);

        let t: NaiveDateTime = binder.bind_value("not a date");
        assert_eq!(t, NaiveDateTime::default());
    }

    #[test]
    fn test_time_encode_midnight_heuristic() {
        let binder = Binder::default();
        let date = NaiveDate::from_ymd_opt(1996, 7, 19).unwrap();

        let out = binder.unbind_to_map("t", &date.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(out["t"], "1996-07-19");

        let out = binder.unbind_to_map("t", &date.and_hms_opt(12, 30, 0).unwrap());
        assert_eq!(out["t"], "1996-07-19 12:30");
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout("%Y-%m-%d").is_ok());
        assert!(validate_layout("").is_err());
        assert!(validate_layout("%Q").is_err());
    }

    #[test]
    fn test_format_time_bad_layout_does_not_panic() {
        let t = NaiveDateTime::default();
        assert!(format_time(&t, "%Q").is_err());
    }

    fn round_trip<T: Bindable>(value: &T) -> T {
        let binder = Binder::default();
        let out = binder.unbind_to_map("v", value);
        let params: ParameterSet = out.into_iter().collect();
        binder.bind(&params, "v")
    }

    proptest! {
        #[test]
        fn prop_int_round_trip(v in any::<i64>()) {
            prop_assert_eq!(round_trip(&v), v);
        }

        #[test]
        fn prop_i16_round_trip(v in any::<i16>()) {
            prop_assert_eq!(round_trip(&v), v);
        }

        #[test]
        fn prop_uint_round_trip(v in any::<u32>()) {
            prop_assert_eq!(round_trip(&v), v);
        }

        #[test]
        fn prop_bool_round_trip(v in any::<bool>()) {
            prop_assert_eq!(round_trip(&v), v);
        }

        #[test]
        fn prop_string_round_trip(v in ".*") {
            prop_assert_eq!(round_trip(&v), v);
        }

        #[test]
        fn prop_float_round_trip(cents in -1_000_000_000i64..1_000_000_000) {
            let v = cents as f64 / 100.0;
            prop_assert!((round_trip(&v) - v).abs() < 1e-9);
        }

        #[test]
        fn prop_time_round_trip(secs in 0i64..4_000_000_000, with_clock in any::<bool>()) {
            let base = DateTime::from_timestamp(secs - secs % 60, 0).unwrap().naive_utc();
            let v = if with_clock { base } else { base.date().and_time(NaiveTime::MIN) };
            let back = round_trip(&v);
            if v.hour() == 0 && v.minute() == 0 {
                prop_assert_eq!(back, v.date().and_time(NaiveTime::MIN));
            } else {
                prop_assert_eq!(back, v);
            }
        }
    }
}
