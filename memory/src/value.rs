use std::fmt;

/// Runtime type of a [`Value`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    #[default]
    Nil,
    Bool,
    Number,
    /// Payload is an interned string handle.
    String,
    /// Payload is a function table id.
    Function,
}

/// A tagged 64-bit cell.
///
/// Numbers keep the bit pattern of their `f64`; booleans are 0 or 1; strings
/// and functions keep a handle. Nil carries no payload.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Value {
    pub kind: ValueKind,
    pub payload: u64,
}

impl Value {
    // --- Constructors ---

    #[inline]
    pub fn nil() -> Self {
        Value {
            kind: ValueKind::Nil,
            payload: 0,
        }
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value {
            kind: ValueKind::Bool,
            payload: b as u64,
        }
    }

    #[inline]
    pub fn number(n: f64) -> Self {
        Value {
            kind: ValueKind::Number,
            payload: n.to_bits(),
        }
    }

    #[inline]
    pub fn string(handle: u32) -> Self {
        Value {
            kind: ValueKind::String,
            payload: handle as u64,
        }
    }

    #[inline]
    pub fn function(id: u32) -> Self {
        Value {
            kind: ValueKind::Function,
            payload: id as u64,
        }
    }

    // --- Checkers ---

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.kind == ValueKind::Nil
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        self.kind == ValueKind::Bool
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        self.kind == ValueKind::Number
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        self.kind == ValueKind::String
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        self.kind == ValueKind::Function
    }

    // --- Accessors ---

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        self.is_number().then(|| f64::from_bits(self.payload))
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        self.is_bool().then_some(self.payload != 0)
    }

    /// String handle or function id.
    #[inline]
    pub fn as_handle(&self) -> Option<u32> {
        matches!(self.kind, ValueKind::String | ValueKind::Function).then_some(self.payload as u32)
    }

    /// Only `nil` and `false` are falsey.
    #[inline]
    pub fn is_falsey(&self) -> bool {
        self.is_nil() || (self.is_bool() && self.payload == 0)
    }

    #[inline]
    pub fn is_truthy(&self) -> bool {
        !self.is_falsey()
    }

    /// Equality used by `EQ`/`NEQ`.
    ///
    /// Kinds must match; then either the raw payloads or their `f64` views
    /// must compare equal. The float view is applied to every kind, so a
    /// payload of `0` equals one of `1 << 63`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.kind == other.kind
            && (self.payload == other.payload
                || f64::from_bits(self.payload) == f64::from_bits(other.payload))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::Nil => write!(f, "Nil"),
            ValueKind::Bool => write!(f, "Bool({})", self.payload),
            ValueKind::Number => write!(f, "Number({})", f64::from_bits(self.payload)),
            ValueKind::String => write!(f, "String({})", self.payload),
            ValueKind::Function => write!(f, "Function({})", self.payload),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}
