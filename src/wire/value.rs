use std::fmt;

/// Type tags, in wire ordinal order. The discriminant is the tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectType {
    Null = 0,
    Boolean = 1,
    Byte = 2,
    Char = 3,
    Short = 4,
    Int = 5,
    Long = 6,
    Float = 7,
    Double = 8,
    String = 9,
    ByteArray = 10,
}

impl ObjectType {
    /// Looks a tag byte up; `None` for anything past `ByteArray`.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => ObjectType::Null,
            1 => ObjectType::Boolean,
            2 => ObjectType::Byte,
            3 => ObjectType::Char,
            4 => ObjectType::Short,
            5 => ObjectType::Int,
            6 => ObjectType::Long,
            7 => ObjectType::Float,
            8 => ObjectType::Double,
            9 => ObjectType::String,
            10 => ObjectType::ByteArray,
            _ => return None,
        })
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// A tagged scalar as carried by properties, map entries and stream entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Value::Null => ObjectType::Null,
            Value::Boolean(_) => ObjectType::Boolean,
            Value::Byte(_) => ObjectType::Byte,
            Value::Char(_) => ObjectType::Char,
            Value::Short(_) => ObjectType::Short,
            Value::Int(_) => ObjectType::Int,
            Value::Long(_) => ObjectType::Long,
            Value::Float(_) => ObjectType::Float,
            Value::Double(_) => ObjectType::Double,
            Value::String(_) => ObjectType::String,
            Value::Bytes(_) => ObjectType::ByteArray,
        }
    }

    /// Name used in conversion error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Char(_) => "char",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Bytes(_) => "byte[]",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            // Debug keeps the trailing ".0" on integral floats.
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::String(v) => f.write_str(v),
            Value::Bytes(v) => write!(f, "byte[{}]", v.len()),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    i8 => Byte,
    char => Char,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
