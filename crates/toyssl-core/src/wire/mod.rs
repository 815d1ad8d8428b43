pub mod buffer;


pub use buffer::*;

// Closed enumeration identified by a fixed-width wire code.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident : $repr:ty { $($variant:ident = $code:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn code(self) -> $repr {
                match self {
                    $($name::$variant => $code,)*
                }
            }

            pub fn from_code(code: $repr) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

pub(crate) use wire_enum;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("read overrun at offset {offset}: wanted {wanted} bytes, {available} available")]
    Overrun { offset: usize, wanted: usize, available: usize },

    #[error("value {value} does not fit in {width} bytes")]
    ValueTooLarge { value: u64, width: usize },

    #[error("unsupported integer width: {0}")]
    InvalidWidth(usize),

    #[error("deferred field of {width} bytes cannot hold length {len}")]
    DeferredOverflow { len: usize, width: usize },

    #[error("{0} trailing bytes after parse")]
    TrailingBytes(usize),
}
