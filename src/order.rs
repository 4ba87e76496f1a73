//! Sort order for a single column.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Sort order for a sort field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Order {
   /// Ascending order (smallest first)
   #[default]
   Asc,
   /// Descending order (largest first)
   Desc,
}

impl Order {
   /// Parse an order from any displayable value.
   ///
   /// `"-1"` and `"desc"` (case-insensitive) yield [`Order::Desc`]; everything
   /// else, including empty or garbage input, yields [`Order::Asc`].
   ///
   /// ```
   /// use sql_lister::Order;
   ///
   /// assert_eq!(Order::parse(-1), Order::Desc);
   /// assert_eq!(Order::parse("DESC"), Order::Desc);
   /// assert_eq!(Order::parse("sideways"), Order::Asc);
   /// ```
   pub fn parse(value: impl fmt::Display) -> Self {
      match value.to_string().to_lowercase().as_str() {
         "-1" | "desc" => Order::Desc,
         _ => Order::Asc,
      }
   }

   /// Uppercase SQL keyword for this order.
   pub fn label(self) -> &'static str {
      match self {
         Order::Asc => "ASC",
         Order::Desc => "DESC",
      }
   }

   /// `1` for ascending, `-1` for descending.
   pub fn numeric(self) -> i32 {
      match self {
         Order::Asc => 1,
         Order::Desc => -1,
      }
   }
}

impl fmt::Display for Order {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.label())
   }
}

impl FromStr for Order {
   type Err = Infallible;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      Ok(Order::parse(s))
   }
}

impl From<&str> for Order {
   fn from(value: &str) -> Self {
      Order::parse(value)
   }
}

impl From<i64> for Order {
   fn from(value: i64) -> Self {
      Order::parse(value)
   }
}

// Client payloads send "asc", "DESC", -1, 1 or nothing at all; none of these
// may fail deserialization.
impl<'de> Deserialize<'de> for Order {
   fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
   where
      D: Deserializer<'de>,
   {
      struct OrderVisitor;

      impl Visitor<'_> for OrderVisitor {
         type Value = Order;

         fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a sort order such as \"asc\", \"desc\", 1 or -1")
         }

         fn visit_str<E: de::Error>(self, v: &str) -> Result<Order, E> {
            Ok(Order::parse(v))
         }

         fn visit_i64<E: de::Error>(self, v: i64) -> Result<Order, E> {
            Ok(Order::parse(v))
         }

         fn visit_u64<E: de::Error>(self, v: u64) -> Result<Order, E> {
            Ok(Order::parse(v))
         }

         fn visit_f64<E: de::Error>(self, v: f64) -> Result<Order, E> {
            Ok(Order::parse(v))
         }

         fn visit_bool<E: de::Error>(self, _: bool) -> Result<Order, E> {
            Ok(Order::Asc)
         }

         fn visit_unit<E: de::Error>(self) -> Result<Order, E> {
            Ok(Order::Asc)
         }

         fn visit_none<E: de::Error>(self) -> Result<Order, E> {
            Ok(Order::Asc)
         }
      }

      deserializer.deserialize_any(OrderVisitor)
   }
}
