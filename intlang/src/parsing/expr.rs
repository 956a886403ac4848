//! Expression precedence levels.
//!
//! From lowest to highest binding: logical, comparison, additive,
//! multiplicative, atom. Every binary level is right-recursive, so
//! `a - b - c` groups as `a - (b - c)`.
use super::{atom::Atom, nested, NotMatched, Parse};
use crate::{token_stream::TokenStream, tokens::TokenKind};

/// Full expression, the lowest precedence level.
pub type Expr = Logical;

pub type Comparison = Binary<Additive, CmpOp>;
pub type Additive = Binary<Multiplicative, AddOp>;
pub type Multiplicative = Binary<Atom, MulOp>;

/// Logical level.
///
/// The optional `not` applies to the left comparison only, so
/// `not a and b` groups as `(not a) and b`.
#[derive(Debug, Clone, PartialEq)]
pub struct Logical {
    pub not: bool,
    pub lhs: Comparison,
    pub rhs: Option<(LogicalOp, Box<Logical>)>,
}

/// A binary precedence level, with an operand of the next
/// higher level on the left and the same level on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary<T, Op> {
    pub lhs: T,
    pub rhs: Option<(Op, Box<Binary<T, Op>>)>,
}

/// Maps operator tokens to the operators of one precedence level.
pub trait Operator: Sized {
    fn from_token(token_kind: TokenKind) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    LtEq,
    Eq,
    NotEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOp {
    Add,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MulOp {
    Mul,
    Div,
}

impl Operator for LogicalOp {
    fn from_token(token_kind: TokenKind) -> Option<Self> {
        match token_kind {
            TokenKind::And => Some(LogicalOp::And),
            TokenKind::Or => Some(LogicalOp::Or),
            _ => None,
        }
    }
}

impl Operator for CmpOp {
    #[rustfmt::skip]
    fn from_token(token_kind: TokenKind) -> Option<Self> {
        use TokenKind as T;
        match token_kind {
            T::Lt    => Some(CmpOp::Lt),
            T::LtEq  => Some(CmpOp::LtEq),
            T::Eq    => Some(CmpOp::Eq),
            T::NotEq => Some(CmpOp::NotEq),
            T::Gt    => Some(CmpOp::Gt),
            T::GtEq  => Some(CmpOp::GtEq),
            _        => None,
        }
    }
}

impl Operator for AddOp {
    fn from_token(token_kind: TokenKind) -> Option<Self> {
        match token_kind {
            TokenKind::Plus => Some(AddOp::Add),
            TokenKind::Minus => Some(AddOp::Sub),
            _ => None,
        }
    }
}

impl Operator for MulOp {
    fn from_token(token_kind: TokenKind) -> Option<Self> {
        match token_kind {
            TokenKind::Star => Some(MulOp::Mul),
            TokenKind::Slash => Some(MulOp::Div),
            _ => None,
        }
    }
}

/// Consume the operator at the cursor if it belongs to the level `Op`.
fn match_operator<Op: Operator>(input: &mut TokenStream) -> Option<Op> {
    let op = input.peek_kind().and_then(Op::from_token)?;
    input.next_token();
    Some(op)
}

impl Parse for Logical {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        nested(input, |input| {
            let not = input.match_token(TokenKind::Not);
            let lhs = Comparison::parse(input)?;

            let rhs = match match_operator::<LogicalOp>(input) {
                Some(op) => Some((op, Box::new(Logical::parse(input)?))),
                None => None,
            };

            Ok(Logical { not, lhs, rhs })
        })
    }
}

impl<T, Op> Parse for Binary<T, Op>
where
    T: Parse,
    Op: Operator,
{
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        nested(input, |input| {
            let lhs = T::parse(input)?;

            let rhs = match match_operator::<Op>(input) {
                Some(op) => Some((op, Box::new(Self::parse(input)?))),
                None => None,
            };

            Ok(Binary { lhs, rhs })
        })
    }
}
