use super::{attempt, expect, func::FuncDef, ident::Ident, literal::parse_int, NotMatched, Parse};
use crate::{token_stream::TokenStream, tokens::TokenKind};

/// Top level definitions, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Global(GlobalDef),
    Func(FuncDef),
}

/// Definition of a global variable with an initial value.
///
/// # Example
///
/// ```text
/// counter = 0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDef {
    pub name: Ident,
    pub value: i64,
}

impl Program {
    #[inline]
    pub fn functions(&self) -> impl Iterator<Item = &FuncDef> {
        self.items.iter().filter_map(|item| match item {
            Item::Func(func) => Some(func),
            Item::Global(_) => None,
        })
    }
}

impl Parse for Program {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        let mut items = vec![];

        while !input.at_end() {
            items.push(Item::parse(input)?);
        }

        Ok(Program { items })
    }
}

impl Parse for Item {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        let start = input.position();

        let global_err = match attempt::<GlobalDef>(input) {
            Ok(global) => return Ok(Item::Global(global)),
            Err(err) => err,
        };

        let func_err = match attempt::<FuncDef>(input) {
            Ok(func) => return Ok(Item::Func(func)),
            Err(err) => err,
        };

        let err = global_err.furthest(func_err);
        if err.at == start {
            Err(NotMatched::new(input, "a global variable or function definition"))
        } else {
            Err(err)
        }
    }
}

impl Parse for GlobalDef {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        let name = Ident::parse(input)?;
        expect(input, TokenKind::Eq)?;

        // Only integer literals are supported as initial values.
        let value = parse_int(input)?;

        Ok(GlobalDef { name, value })
    }
}
