//! Widget identifiers.
//!
//! Every node of a widget tree lives in an arena and is addressed by a
//! [`WidgetId`]. Ids are generational: once a node is freed its id never
//! resolves again, even if the arena slot is reused. Everything that refers
//! to a widget without owning it (parent links, focus, hover, the on-top
//! stack, size and offset references, command `ptr:` arguments) stores a
//! `WidgetId` and treats a failed lookup as "absent".

use std::fmt;
use std::str::FromStr;

use slotmap::new_key_type;

use crate::error::CoreError;

new_key_type! {
    /// A stable, non-owning handle to a widget node.
    pub struct WidgetId;
}

impl WidgetId {
    /// Convert the id to a raw u64 value.
    ///
    /// The raw value can be converted back using [`WidgetId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a `WidgetId` from a raw u64 value.
    ///
    /// This does not check that the id exists in any tree.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }

    /// The textual form used as the `ptr:` argument of commands.
    pub fn to_ptr_string(self) -> String {
        format!("{:#x}", self.as_raw())
    }
}

impl fmt::LowerHex for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.as_raw(), f)
    }
}

impl FromStr for WidgetId {
    type Err = CoreError;

    /// Parses the `0x`-prefixed hexadecimal form, or a plain decimal number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => s.parse::<u64>(),
        };
        parsed
            .map(Self::from_raw)
            .map_err(|_| CoreError::InvalidWidgetId(s.to_string()))
    }
}

static_assertions::assert_impl_all!(WidgetId: Send, Sync, Copy);
