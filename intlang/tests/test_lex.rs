use intlang::{
    lex::{tokenize, LexError, Lexer},
    tokens::TokenKind,
};

const SOURCE: &str = include_str!("calls.intl");

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().into_iter().map(|token| token.kind).collect()
}

#[test]
fn test_lex_program() {
    let tokens = tokenize(SOURCE).unwrap();
    assert!(!tokens.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Fn);
    assert!(tokens.iter().all(|token| !token.text.is_empty()));
}

#[test]
fn test_keyword_boundaries() {
    use TokenKind as T;

    assert_eq!(
        kinds("fn endgame(andy) end"),
        vec![T::Fn, T::Ident, T::LeftParen, T::Ident, T::RightParen, T::End]
    );
    assert_eq!(kinds("end_ not_ ifx"), vec![T::Ident, T::Ident, T::Ident]);
    assert_eq!(kinds("if x else y end"), vec![T::If, T::Ident, T::Else, T::Ident, T::End]);
}

#[test]
fn test_negative_literal_before_minus() {
    use TokenKind as T;

    let tokens = tokenize("x -1 - 2").unwrap();
    let texts: Vec<&str> = tokens.iter().map(|token| token.text.as_str()).collect();
    assert_eq!(texts, vec!["x", "-1", "-", "2"]);
    assert_eq!(
        tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![T::Ident, T::Int, T::Minus, T::Int]
    );
}

#[test]
fn test_two_character_operators() {
    use TokenKind as T;

    assert_eq!(
        kinds("a<=b>=c!=d<e>f=g"),
        vec![
            T::Ident,
            T::LtEq,
            T::Ident,
            T::GtEq,
            T::Ident,
            T::NotEq,
            T::Ident,
            T::Lt,
            T::Ident,
            T::Gt,
            T::Ident,
            T::Eq,
            T::Ident
        ]
    );
}

#[test]
fn test_comments_and_lines() {
    let tokens = tokenize("# leading comment\nx = 1 # trailing\n\n  y").unwrap();

    let lines: Vec<(&str, usize)> = tokens
        .iter()
        .map(|token| (token.text.as_str(), token.line))
        .collect();
    assert_eq!(lines, vec![("x", 2), ("=", 2), ("1", 2), ("y", 4)]);
}

#[test]
fn test_spans() {
    let source = "print(42)";
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[2].span.fragment(source), "42");
    assert_eq!(tokens[2].span.index, 6);
    assert_eq!(tokens[2].span.size, 2);
}

#[test]
fn test_lex_error() {
    assert_eq!(
        tokenize("x = 1\ny = @ + 2\n"),
        Err(LexError {
            line: 2,
            near: "@ + 2".to_string()
        })
    );
}

#[test]
fn test_lexer_stops_after_error() {
    let mut lexer = Lexer::new("x $ y");

    assert!(matches!(lexer.next_token(), Some(Ok(_))));
    assert!(matches!(lexer.next_token(), Some(Err(_))));
    assert!(lexer.next_token().is_none());
}
