//! The machine word: a range-limited integer or a character.
//!
//! Integers live in the closed range [-999, 999]. Characters carry their
//! code point but never mix with integers in arithmetic; the distinction is
//! tracked at runtime and preserved by the compiler's constant folder.

use serde::Serialize;

/// Smallest representable integer value.
pub const MIN_INT: i32 = -999;

/// Largest representable integer value.
pub const MAX_INT: i32 = 999;

/// Highest legal floor index unless a program overrides it with
/// `init floor_max`.
pub const DEFAULT_FLOOR_MAX: u32 = 63;

/// Errors produced by word construction and arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("integer value out of range [-999, 999]")]
    Overflow,

    #[error("division by zero")]
    DivByZero,

    #[error("mod by zero")]
    ModByZero,

    #[error("operation mixes an integer and a character")]
    TypeMismatch,
}

/// A single machine word.
///
/// Stored as the raw value plus a character flag, mirroring how the machine
/// itself keeps words: characters are just tagged code points and respond to
/// increment/decrement, but refuse arithmetic against plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HrmValue {
    value: i32,
    is_char: bool,
}

impl HrmValue {
    /// A range-checked integer word.
    pub fn int(value: i32) -> Result<Self, ValueError> {
        if !(MIN_INT..=MAX_INT).contains(&value) {
            return Err(ValueError::Overflow);
        }
        Ok(Self {
            value,
            is_char: false,
        })
    }

    /// A character word.
    pub fn char(value: char) -> Self {
        Self {
            value: value as i32,
            is_char: true,
        }
    }

    /// Reconstructs a word from its raw parts. Integers are range-checked.
    pub fn from_raw(value: i32, is_char: bool) -> Result<Self, ValueError> {
        if is_char {
            Ok(Self {
                value,
                is_char: true,
            })
        } else {
            Self::int(value)
        }
    }

    pub fn raw(&self) -> i32 {
        self.value
    }

    pub fn is_char(&self) -> bool {
        self.is_char
    }

    pub fn is_int(&self) -> bool {
        !self.is_char
    }

    /// Machine truthiness: any non-zero word.
    pub fn is_truthy(&self) -> bool {
        self.value != 0
    }

    fn require_same_type(&self, other: &Self) -> Result<(), ValueError> {
        if self.is_char != other.is_char {
            return Err(ValueError::TypeMismatch);
        }
        Ok(())
    }

    /// Arithmetic results are always integers, even between characters:
    /// `'b' - 'a'` yields the distance 1.
    fn arith(&self, other: &Self, f: impl FnOnce(i32, i32) -> i32) -> Result<Self, ValueError> {
        self.require_same_type(other)?;
        Self::int(f(self.value, other.value))
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, ValueError> {
        self.arith(other, |a, b| a + b)
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self, ValueError> {
        self.arith(other, |a, b| a - b)
    }

    pub fn checked_mul(&self, other: &Self) -> Result<Self, ValueError> {
        self.arith(other, |a, b| a * b)
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self, ValueError> {
        if other.value == 0 {
            return Err(ValueError::DivByZero);
        }
        self.arith(other, |a, b| a / b)
    }

    pub fn checked_rem(&self, other: &Self) -> Result<Self, ValueError> {
        if other.value == 0 {
            return Err(ValueError::ModByZero);
        }
        self.arith(other, |a, b| a % b)
    }

    /// Unary minus keeps the character flag, like increment/decrement.
    pub fn negate(&self) -> Result<Self, ValueError> {
        if self.is_char {
            Ok(Self {
                value: -self.value,
                is_char: true,
            })
        } else {
            Self::int(-self.value)
        }
    }

    /// `++`: steps the raw value, keeping the character flag.
    pub fn increment(&self) -> Result<Self, ValueError> {
        if self.is_char {
            Ok(Self {
                value: self.value + 1,
                is_char: true,
            })
        } else {
            Self::int(self.value + 1)
        }
    }

    /// `--`: steps the raw value, keeping the character flag.
    pub fn decrement(&self) -> Result<Self, ValueError> {
        if self.is_char {
            Ok(Self {
                value: self.value - 1,
                is_char: true,
            })
        } else {
            Self::int(self.value - 1)
        }
    }

    /// Comparisons require matching types and yield 0/1 integer words.
    pub fn compare(&self, other: &Self, f: impl FnOnce(i32, i32) -> bool) -> Result<Self, ValueError> {
        self.require_same_type(other)?;
        Ok(Self::bool(f(self.value, other.value)))
    }

    /// A 0/1 integer word.
    pub fn bool(value: bool) -> Self {
        Self {
            value: value as i32,
            is_char: false,
        }
    }
}

impl std::fmt::Display for HrmValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_char {
            match char::from_u32(self.value as u32) {
                Some(c) => write!(f, "'{c}'"),
                None => write!(f, "'\\{}'", self.value),
            }
        } else {
            write!(f, "{}", self.value)
        }
    }
}
