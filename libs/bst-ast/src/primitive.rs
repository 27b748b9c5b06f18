//! # Primitives
//!
//! The operators and built-in functions of the BST language together with
//! their stack effects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of values a primitive pops and pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackEffect {
    /// Always pops `inputs` values and pushes `outputs` values.
    Fixed { inputs: usize, outputs: usize },
    /// Depends on the functions or values the primitive receives.
    Dynamic,
}

impl StackEffect {
    const fn fixed(inputs: usize, outputs: usize) -> Self {
        Self::Fixed { inputs, outputs }
    }
}

macro_rules! primitives {
    ($($variant:ident => $name:literal, $effect:expr;)*) => {
        /// An operator or built-in function.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Primitive {
            $($variant,)*
        }

        impl Primitive {
            /// Every primitive, operators first, built-ins in name order.
            pub const ALL: &'static [Primitive] = &[$(Primitive::$variant,)*];

            /// Name as written in source.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Look up a primitive by its source name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Stack effect of applying the primitive.
            pub const fn stack_effect(&self) -> StackEffect {
                match self {
                    $(Self::$variant => $effect,)*
                }
            }
        }
    };
}

primitives! {
    Equal => "=", StackEffect::fixed(2, 1);
    Less => "<", StackEffect::fixed(2, 1);
    Greater => ">", StackEffect::fixed(2, 1);
    Add => "+", StackEffect::fixed(2, 1);
    Subtract => "-", StackEffect::fixed(2, 1);
    Concat => "*", StackEffect::fixed(2, 1);
    Assign => ":=", StackEffect::fixed(2, 0);
    AddPeriod => "add.period$", StackEffect::fixed(1, 1);
    CallType => "call.type$", StackEffect::Dynamic;
    ChangeCase => "change.case$", StackEffect::fixed(2, 1);
    ChrToInt => "chr.to.int$", StackEffect::fixed(1, 1);
    Cite => "cite$", StackEffect::fixed(0, 1);
    Duplicate => "duplicate$", StackEffect::fixed(1, 2);
    Empty => "empty$", StackEffect::fixed(1, 1);
    FormatName => "format.name$", StackEffect::fixed(3, 1);
    If => "if$", StackEffect::Dynamic;
    IntToChr => "int.to.chr$", StackEffect::fixed(1, 1);
    IntToStr => "int.to.str$", StackEffect::fixed(1, 1);
    Missing => "missing$", StackEffect::fixed(1, 1);
    Newline => "newline$", StackEffect::fixed(0, 0);
    NumNames => "num.names$", StackEffect::fixed(1, 1);
    Pop => "pop$", StackEffect::fixed(1, 0);
    Preamble => "preamble$", StackEffect::fixed(0, 1);
    Purify => "purify$", StackEffect::fixed(1, 1);
    Quote => "quote$", StackEffect::fixed(0, 1);
    Skip => "skip$", StackEffect::fixed(0, 0);
    Stack => "stack$", StackEffect::Dynamic;
    Substring => "substring$", StackEffect::fixed(3, 1);
    Swap => "swap$", StackEffect::fixed(2, 2);
    TextLength => "text.length$", StackEffect::fixed(1, 1);
    TextPrefix => "text.prefix$", StackEffect::fixed(2, 1);
    Top => "top$", StackEffect::fixed(1, 0);
    Type => "type$", StackEffect::fixed(0, 1);
    Warning => "warning$", StackEffect::fixed(1, 0);
    While => "while$", StackEffect::Dynamic;
    Width => "width$", StackEffect::fixed(1, 1);
    Write => "write$", StackEffect::fixed(1, 0);
}

impl Primitive {
    /// Whether this is one of the seven operators.
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::Less
                | Self::Greater
                | Self::Add
                | Self::Subtract
                | Self::Concat
                | Self::Assign
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TESTS
// =============================================================================
