//! Best-effort coercion of stored filter and metadata values.

use serde_json::Value as JsonValue;

/// Read-only view over an optional JSON value that coerces it to a
/// primitive type, returning the given fallback when it cannot.
#[derive(Debug, Clone, Copy)]
pub struct Caster<'a> {
   value: Option<&'a JsonValue>,
}

impl<'a> Caster<'a> {
   pub fn new(value: Option<&'a JsonValue>) -> Self {
      Self { value }
   }

   /// The wrapped value, if any.
   pub fn value(&self) -> Option<&'a JsonValue> {
      self.value
   }

   /// True when the key was missing or held `null`.
   pub fn is_nil(&self) -> bool {
      matches!(self.value, None | Some(JsonValue::Null))
   }

   /// Strings as-is; numbers and booleans via their JSON text.
   pub fn string_or(&self, fallback: &str) -> String {
      match self.value {
         Some(JsonValue::String(s)) => s.clone(),
         Some(JsonValue::Number(n)) => n.to_string(),
         Some(JsonValue::Bool(b)) => b.to_string(),
         _ => fallback.to_string(),
      }
   }

   pub fn i64_or(&self, fallback: i64) -> i64 {
      match self.value {
         Some(JsonValue::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(fallback),
         Some(JsonValue::String(s)) => parse_number(s).map_or(fallback, |f| f as i64),
         Some(JsonValue::Bool(b)) => i64::from(*b),
         _ => fallback,
      }
   }

   /// Negative values fall back.
   pub fn u64_or(&self, fallback: u64) -> u64 {
      match self.value {
         Some(JsonValue::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.is_finite()).map(|f| f as u64))
            .unwrap_or(fallback),
         Some(JsonValue::String(s)) => parse_number(s)
            .filter(|f| *f >= 0.0)
            .map_or(fallback, |f| f as u64),
         Some(JsonValue::Bool(b)) => u64::from(*b),
         _ => fallback,
      }
   }

   pub fn f64_or(&self, fallback: f64) -> f64 {
      match self.value {
         Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(fallback),
         Some(JsonValue::String(s)) => parse_number(s).unwrap_or(fallback),
         Some(JsonValue::Bool(b)) => f64::from(u8::from(*b)),
         _ => fallback,
      }
   }

   /// Accepts booleans, numbers (non-zero is true) and the strings
   /// `true`/`false`/`1`/`0`/`yes`/`no` in any case.
   pub fn bool_or(&self, fallback: bool) -> bool {
      match self.value {
         Some(JsonValue::Bool(b)) => *b,
         Some(JsonValue::Number(n)) => n.as_f64().map_or(fallback, |f| f != 0.0),
         Some(JsonValue::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => fallback,
         },
         _ => fallback,
      }
   }
}

fn parse_number(s: &str) -> Option<f64> {
   s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}
