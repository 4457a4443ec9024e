//! # Parser — Programa e Consultas
//!
//! Gramática aceita (descida recursiva sobre os tokens gerados pelo
//! [`lexer`](super::lexer)):
//!
//! ```text
//! program := clause*
//! clause  := goal [ ":-" goal { "," goal } ] "."
//! query   := [ "?-" ] goal { "," goal } [ "." ]
//! goal    := ATOM [ "(" term { "," term } ")" ]
//! term    := VAR | ATOM [ "(" term { "," term } ")" ]
//! ```
//!
//! Cada `_` recebe um nome único (`_#1`, `_#2`, ...) para que ocorrências
//! distintas não se liguem entre si. O `#` não é aceito pelo lexer, então
//! esses nomes nunca colidem com variáveis escritas na fonte, como `_1`.

use super::lexer::{tokenize, Spanned, Token};
use crate::core::{Clause, LoadError, ParseError, Term};

/// Interpreta o texto de uma KB inteira.
///
/// # Erros
///
/// - [`LoadError::Syntax`] com linha/coluna do problema
/// - [`LoadError::InvalidClause`] vindo de [`Clause::new()`]
pub fn parse_program(src: &str) -> Result<Vec<Clause>, LoadError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser::new(&tokens);
    let mut clauses = Vec::new();
    while !parser.at_end() {
        clauses.push(parser.clause()?);
    }
    Ok(clauses)
}

/// Interpreta uma consulta: um ou mais objetivos separados por vírgula.
///
/// O prefixo `?-` e o ponto final são opcionais, de modo que
/// `"ancestor(john, emma)"` e `"?- ancestor(john, emma)."` são equivalentes.
pub fn parse_query(src: &str) -> Result<Vec<Term>, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser::new(&tokens);
    if parser.at_end() {
        return Err(ParseError::new(1, 1, "consulta vazia"));
    }
    parser.eat(&Token::QueryPrefix);
    let goals = parser.conjunction()?;
    parser.eat(&Token::Dot);
    if let Some(extra) = parser.peek() {
        return Err(parser.error_at(
            extra,
            format!("{} inesperado após a consulta", extra.token.describe()),
        ));
    }
    Ok(goals)
}

struct Parser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    anonymous: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Spanned]) -> Self {
        Self {
            tokens,
            pos: 0,
            anonymous: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'t Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Spanned> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    /// Consome o token se for o esperado.
    fn eat(&mut self, expected: &Token) -> bool {
        match self.peek() {
            Some(s) if &s.token == expected => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn error_at(&self, at: &Spanned, message: String) -> ParseError {
        ParseError::new(at.line, at.column, message)
    }

    /// Erro posicionado no token atual, ou logo após o último se acabou.
    fn unexpected(&self, wanted: &str) -> ParseError {
        match self.peek() {
            Some(s) => self.error_at(
                s,
                format!("esperado {}, encontrado {}", wanted, s.token.describe()),
            ),
            None => {
                let (line, column) = self
                    .tokens
                    .last()
                    .map(|s| (s.line, s.column + 1))
                    .unwrap_or((1, 1));
                ParseError::new(line, column, format!("esperado {}, fim do texto", wanted))
            }
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(&expected.describe()))
        }
    }

    fn clause(&mut self) -> Result<Clause, LoadError> {
        // Nomes de `_` só precisam ser únicos dentro da cláusula.
        self.anonymous = 0;
        let head = self.goal()?;
        let body = if self.eat(&Token::Neck) {
            self.conjunction()?
        } else {
            Vec::new()
        };
        self.expect(&Token::Dot)?;
        Clause::new(head, body)
    }

    fn conjunction(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut goals = vec![self.goal()?];
        while self.eat(&Token::Comma) {
            goals.push(self.goal()?);
        }
        Ok(goals)
    }

    fn goal(&mut self) -> Result<Term, ParseError> {
        match self.peek() {
            Some(Spanned {
                token: Token::Atom(_),
                ..
            }) => self.term(),
            _ => Err(self.unexpected("um predicado")),
        }
    }

    fn term(&mut self) -> Result<Term, ParseError> {
        let Some(spanned) = self.next() else {
            return Err(self.unexpected("um termo"));
        };
        match &spanned.token {
            Token::Var(name) if name == "_" => {
                self.anonymous += 1;
                Ok(Term::var(&format!("_#{}", self.anonymous)))
            }
            Token::Var(name) => Ok(Term::var(name)),
            Token::Atom(name) => {
                if !self.eat(&Token::LParen) {
                    return Ok(Term::atom(name));
                }
                let mut args = vec![self.term()?];
                while self.eat(&Token::Comma) {
                    args.push(self.term()?);
                }
                self.expect(&Token::RParen)?;
                Ok(Term::compound(name, args))
            }
            other => Err(self.error_at(
                spanned,
                format!("esperado um termo, encontrado {}", other.describe()),
            )),
        }
    }
}
