//! Recursive-descent parser with a single token of lookahead.
//!
//! Besides building the AST, the parser owns the declaration table used to
//! reject a second `var` for the same name. It does not check assignment
//! targets against that table; undeclared targets are caught during codegen.

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{Node, Program, TypeTag};
use crate::error::{CompileResult, SyntaxError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    declared: HashMap<String, TypeTag>,
}

impl<'a> Parser<'a> {
    /// Prime the parser with the first token of `src`.
    pub fn new(src: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(src);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            declared: HashMap::new(),
        })
    }

    /// Names declared so far, with their declared types.
    pub fn declarations(&self) -> &HashMap<String, TypeTag> {
        &self.declared
    }

    /// Parse statements until `End`. The first error aborts the whole parse.
    pub fn parse(&mut self) -> CompileResult<Program> {
        let mut stmts = Vec::new();
        while !self.current.is(TokenKind::End) {
            let stmt = match self.current.kind {
                TokenKind::Var => self.var_decl()?,
                TokenKind::Print => self.print()?,
                TokenKind::Identifier => self.assignment()?,
                _ => {
                    return Err(SyntaxError::UnexpectedToken {
                        found: self.current.to_string(),
                        offset: self.current.offset,
                    }
                    .into())
                }
            };
            debug!(?stmt, "parsed statement");
            stmts.push(stmt);
        }
        Ok(Program { stmts })
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> CompileResult<Token> {
        if self.current.is(kind) {
            return self.advance();
        }
        Err(SyntaxError::Expected {
            expected,
            found: self.current.to_string(),
            offset: self.current.offset,
        }
        .into())
    }

    // var (int|float) IDENT (= NUMBER)? ;
    fn var_decl(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::Var, "'var'")?;
        let declared_type = match self.current.kind {
            TokenKind::TypeInt => TypeTag::Int32,
            TokenKind::TypeFloat => TypeTag::Float32,
            _ => {
                return Err(SyntaxError::Expected {
                    expected: "a type ('int' or 'float')",
                    found: self.current.to_string(),
                    offset: self.current.offset,
                }
                .into())
            }
        };
        self.advance()?;

        let ident = self.expect(TokenKind::Identifier, "a variable name")?;
        if self.declared.contains_key(&ident.text) {
            return Err(SyntaxError::Duplicate {
                name: ident.text,
                offset: ident.offset,
            }
            .into());
        }

        let initializer = if self.current.is(TokenKind::Assign) {
            self.advance()?;
            Some(Box::new(self.number()?))
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "';' after variable declaration")?;

        self.declared.insert(ident.text.clone(), declared_type);
        Ok(Node::VarDecl {
            declared_type,
            name: ident.text,
            initializer,
        })
    }

    // IDENT = NUMBER ;
    fn assignment(&mut self) -> CompileResult<Node> {
        let target = self.expect(TokenKind::Identifier, "a variable name")?;
        self.expect(TokenKind::Assign, "'=' in assignment")?;
        let value = self.number()?;
        self.expect(TokenKind::Semicolon, "';' after assignment")?;
        Ok(Node::Assignment {
            name: target.text,
            value: Box::new(value),
        })
    }

    // print ( NUMBER | IDENT ) ;
    fn print(&mut self) -> CompileResult<Node> {
        self.expect(TokenKind::Print, "'print'")?;
        self.expect(TokenKind::LParen, "'(' after 'print'")?;
        let expr = match self.current.kind {
            TokenKind::Number => self.number()?,
            TokenKind::Identifier => Node::VariableRef {
                name: self.advance()?.text,
            },
            _ => {
                return Err(SyntaxError::Expected {
                    expected: "a number or variable in print",
                    found: self.current.to_string(),
                    offset: self.current.offset,
                }
                .into())
            }
        };
        self.expect(TokenKind::RParen, "')' after print argument")?;
        self.expect(TokenKind::Semicolon, "';' after print statement")?;
        Ok(Node::Print {
            expr: Box::new(expr),
        })
    }

    fn number(&mut self) -> CompileResult<Node> {
        let token = self.expect(TokenKind::Number, "a numeric literal")?;
        Ok(Node::number(token.text))
    }
}

/// Parse a complete program from raw source text.
pub fn parse(src: &str) -> CompileResult<Program> {
    Parser::new(src)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompileError, LexError};

    fn num(text: &str) -> Box<Node> {
        Box::new(Node::number(text))
    }

    #[test]
    fn parses_reference_program() {
        let program = parse("var int x = 5; var float y = 10.5; x = 3; print(x); print(y);").unwrap();
        assert_eq!(
            program.stmts,
            vec![
                Node::VarDecl {
                    declared_type: TypeTag::Int32,
                    name: "x".into(),
                    initializer: Some(num("5")),
                },
                Node::VarDecl {
                    declared_type: TypeTag::Float32,
                    name: "y".into(),
                    initializer: Some(num("10.5")),
                },
                Node::Assignment {
                    name: "x".into(),
                    value: num("3"),
                },
                Node::Print {
                    expr: Box::new(Node::VariableRef { name: "x".into() }),
                },
                Node::Print {
                    expr: Box::new(Node::VariableRef { name: "y".into() }),
                },
            ]
        );
    }

    #[test]
    fn declaration_without_initializer() {
        let program = parse("var float f;").unwrap();
        assert_eq!(
            program.stmts,
            vec![Node::VarDecl {
                declared_type: TypeTag::Float32,
                name: "f".into(),
                initializer: None,
            }]
        );
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        assert!(parse("  \n\t").unwrap().stmts.is_empty());
    }

    #[test]
    fn declaration_table_records_each_name_once() {
        let mut parser = Parser::new("var int a = 1; var float b; a = 2;").unwrap();
        parser.parse().unwrap();
        let table = parser.declarations();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Some(&TypeTag::Int32));
        assert_eq!(table.get("b"), Some(&TypeTag::Float32));
    }

    #[test]
    fn redeclaration_is_rejected_regardless_of_type() {
        for src in ["var int x = 5; var int x = 6;", "var int x; var float x = 1.5;"] {
            let err = parse(src).unwrap_err();
            assert!(
                matches!(&err, CompileError::Syntax(SyntaxError::Duplicate { name, .. }) if name == "x"),
                "{src}: {err}"
            );
        }
    }

    #[test]
    fn undeclared_assignment_parses() {
        let program = parse("ghost = 1;").unwrap();
        assert_eq!(program.stmts.len(), 1);
    }

    #[test]
    fn print_of_literal() {
        let program = parse("print(2.5);").unwrap();
        assert_eq!(program.stmts, vec![Node::Print { expr: num("2.5") }]);
    }

    #[test]
    fn expressions_are_not_accepted() {
        let err = parse("var int x = 1 + 2;").unwrap_err();
        assert!(matches!(
            err,
            CompileError::Syntax(SyntaxError::Expected { offset: 14, .. })
        ));

        let err = parse("print(x + 1);").unwrap_err();
        assert!(matches!(err, CompileError::Syntax(SyntaxError::Expected { .. })));

        let err = parse("var int x = y;").unwrap_err();
        assert!(matches!(err, CompileError::Syntax(SyntaxError::Expected { .. })));
    }

    #[test]
    fn unexpected_leading_token() {
        let err = parse("var int x; ; print(x);").unwrap_err();
        assert!(matches!(
            err,
            CompileError::Syntax(SyntaxError::UnexpectedToken { offset: 11, .. })
        ));
    }

    #[test]
    fn missing_pieces() {
        for src in [
            "var x = 1;",
            "var int = 1;",
            "var int x = 1",
            "x 1;",
            "print x;",
            "print(x;",
            "print(x)",
        ] {
            let err = parse(src).unwrap_err();
            assert_eq!(err.category(), "syntax", "{src}: {err}");
        }
    }

    #[test]
    fn lexical_errors_surface_through_parse() {
        let err = parse("var int x = 5; x = 3.;").unwrap_err();
        assert!(matches!(err, CompileError::Lex(LexError::MalformedFloat { .. })));
    }
}
