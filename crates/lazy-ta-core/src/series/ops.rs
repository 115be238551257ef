//! Element-wise combinators.
//!
//! Booleans are encoded as `1.0` / `0.0`. Any `NaN` operand produces `NaN`,
//! comparisons and logical operators included.

use std::fmt;

#[inline]
const fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Two-operand combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`, `NaN` when `b` is exactly zero
    Div,
    /// Smaller operand
    Min,
    /// Larger operand
    Max,
    /// `a > b`
    Gt,
    /// `a >= b`
    Ge,
    /// `a < b`
    Lt,
    /// `a <= b`
    Le,
    /// `a == b`
    Eq,
    /// `a != b`
    Ne,
    /// Both operands non-zero
    And,
    /// Either operand non-zero
    Or,
}

impl BinaryOp {
    /// Applies the operator to one pair of values.
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn eval(self, a: f64, b: f64) -> f64 {
        if a.is_nan() || b.is_nan() {
            return f64::NAN;
        }
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => {
                if b == 0.0 {
                    f64::NAN
                } else {
                    a / b
                }
            }
            Self::Min => a.min(b),
            Self::Max => a.max(b),
            Self::Gt => flag(a > b),
            Self::Ge => flag(a >= b),
            Self::Lt => flag(a < b),
            Self::Le => flag(a <= b),
            Self::Eq => flag(a == b),
            Self::Ne => flag(a != b),
            Self::And => flag(a != 0.0 && b != 0.0),
            Self::Or => flag(a != 0.0 || b != 0.0),
        }
    }

    /// Operator symbol, for logs.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Min => "min",
            Self::Max => "max",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One-operand combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `|x|`
    Abs,
    /// `1.0` when `x` is zero, else `0.0`
    Not,
    /// Square root, `NaN` for negative input
    Sqrt,
    /// Natural log, `NaN` for non-positive input
    Ln,
}

impl UnaryOp {
    /// Applies the operator to one value.
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn eval(self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        match self {
            Self::Neg => -x,
            Self::Abs => x.abs(),
            Self::Not => flag(x == 0.0),
            Self::Sqrt => x.sqrt(),
            Self::Ln => {
                if x > 0.0 {
                    x.ln()
                } else {
                    f64::NAN
                }
            }
        }
    }

    /// Operator name, for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Neg => "neg",
            Self::Abs => "abs",
            Self::Not => "not",
            Self::Sqrt => "sqrt",
            Self::Ln => "ln",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        assert_eq!(BinaryOp::Add.eval(2.0, 3.0), 5.0);
        assert_eq!(BinaryOp::Sub.eval(2.0, 3.0), -1.0);
        assert_eq!(BinaryOp::Mul.eval(2.0, 3.0), 6.0);
        assert_eq!(BinaryOp::Div.eval(3.0, 2.0), 1.5);
        assert_eq!(BinaryOp::Min.eval(3.0, 2.0), 2.0);
        assert_eq!(BinaryOp::Max.eval(3.0, 2.0), 3.0);
    }

    #[test]
    fn test_division_by_zero_is_nan() {
        assert!(BinaryOp::Div.eval(1.0, 0.0).is_nan());
        assert!(BinaryOp::Div.eval(1.0, -0.0).is_nan());
        assert!(BinaryOp::Div.eval(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_nan_propagates_through_every_binary_op() {
        let ops = [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Min,
            BinaryOp::Max,
            BinaryOp::Gt,
            BinaryOp::Ge,
            BinaryOp::Lt,
            BinaryOp::Le,
            BinaryOp::Eq,
            BinaryOp::Ne,
            BinaryOp::And,
            BinaryOp::Or,
        ];
        for op in ops {
            assert!(op.eval(f64::NAN, 1.0).is_nan(), "{op}");
            assert!(op.eval(1.0, f64::NAN).is_nan(), "{op}");
        }
    }

    #[test]
    fn test_comparisons_and_logic() {
        assert_eq!(BinaryOp::Gt.eval(2.0, 1.0), 1.0);
        assert_eq!(BinaryOp::Ge.eval(1.0, 1.0), 1.0);
        assert_eq!(BinaryOp::Lt.eval(2.0, 1.0), 0.0);
        assert_eq!(BinaryOp::Eq.eval(1.0, 1.0), 1.0);
        assert_eq!(BinaryOp::Ne.eval(1.0, 1.0), 0.0);
        assert_eq!(BinaryOp::And.eval(1.0, 0.0), 0.0);
        assert_eq!(BinaryOp::Or.eval(1.0, 0.0), 1.0);
    }

    #[test]
    fn test_unary() {
        assert_eq!(UnaryOp::Neg.eval(2.0), -2.0);
        assert_eq!(UnaryOp::Abs.eval(-2.0), 2.0);
        assert_eq!(UnaryOp::Not.eval(0.0), 1.0);
        assert_eq!(UnaryOp::Not.eval(3.0), 0.0);
        assert_eq!(UnaryOp::Sqrt.eval(9.0), 3.0);
        assert!(UnaryOp::Sqrt.eval(-1.0).is_nan());
        assert!(UnaryOp::Ln.eval(0.0).is_nan());
        assert!(UnaryOp::Not.eval(f64::NAN).is_nan());
    }
}
