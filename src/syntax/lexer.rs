//! # Lexer — Tokens do Formato de Cláusulas
//!
//! Converte o texto da KB (ou de uma consulta) em [`Token`]s com posição.
//! O autômato é gerado pelo `logos`; aqui só convertemos os spans em
//! linha/coluna e os erros em [`ParseError`].
//!
//! | Entrada | Token |
//! |---------|-------|
//! | `john`, `42`, `'New York'` | `Atom` |
//! | `X`, `Pai`, `_`, `_Tmp` | `Var` |
//! | `(` `)` `,` `.` | pontuação |
//! | `:-` | `Neck` |
//! | `?-` | `QueryPrefix` |
//!
//! `%` inicia um comentário até o fim da linha.

use logos::{Lexer, Logos};

use crate::core::ParseError;

#[derive(Logos, Clone, Debug, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"%[^\n]*")]
pub enum Token {
    #[regex(r"[\p{Ll}\p{Lo}\p{N}][\p{L}\p{N}_]*", |lex| lex.slice().to_owned())]
    #[regex(r"'([^'\\\n]|\\[^\n])*'", unquote)]
    Atom(String),

    #[regex(r"[\p{Lu}_][\p{L}\p{N}_]*", |lex| lex.slice().to_owned())]
    Var(String),

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(":-")]
    Neck,

    #[token("?-")]
    QueryPrefix,
}

/// Conteúdo de um átomo entre aspas. Escapes aceitos: `\'`, `\\`, `\n`.
fn unquote(lex: &mut Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut name = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            name.push(c);
            continue;
        }
        match chars.next()? {
            c @ ('\'' | '\\') => name.push(c),
            'n' => name.push('\n'),
            _ => return None,
        }
    }
    Some(name)
}

impl Token {
    /// Descrição curta para mensagens de erro.
    pub fn describe(&self) -> String {
        match self {
            Token::Atom(name) => format!("átomo `{}`", name),
            Token::Var(name) => format!("variável `{}`", name),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::Dot => "`.`".to_string(),
            Token::Neck => "`:-`".to_string(),
            Token::QueryPrefix => "`?-`".to_string(),
        }
    }
}

/// Token + posição (linha/coluna a partir de 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Converte offsets em bytes para linha/coluna. Os offsets chegam em
/// ordem crescente, então só o trecho novo é percorrido.
struct Positions<'a> {
    src: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Positions<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn at(&mut self, offset: usize) -> (usize, usize) {
        for c in self.src[self.offset..offset].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = offset;
        (self.line, self.column)
    }
}

/// Quebra o texto em tokens.
///
/// # Erros
///
/// [`ParseError`] para caracteres inesperados, `:` ou `?` soltos, escapes
/// desconhecidos e átomos entre aspas não terminados.
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut lex = Token::lexer(src);
    let mut positions = Positions::new(src);
    let mut tokens = Vec::new();

    while let Some(result) = lex.next() {
        let (line, column) = positions.at(lex.span().start);
        match result {
            Ok(token) => tokens.push(Spanned {
                token,
                line,
                column,
            }),
            Err(()) => return Err(ParseError::new(line, column, invalid(lex.slice()))),
        }
    }

    Ok(tokens)
}

fn invalid(slice: &str) -> String {
    match slice.chars().next() {
        Some('\'') if slice.len() > 1 && slice.ends_with('\'') => {
            "escape desconhecido em átomo entre aspas".to_string()
        }
        Some('\'') => "átomo entre aspas não terminado".to_string(),
        Some(c @ (':' | '?')) => format!("esperado `{}-`", c),
        Some(c) => format!("caractere inesperado `{}`", c),
        None => "fim inesperado do texto".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn fact_tokens() {
        assert_eq!(
            kinds("parent(john, mary)."),
            vec![
                Token::Atom("parent".into()),
                Token::LParen,
                Token::Atom("john".into()),
                Token::Comma,
                Token::Atom("mary".into()),
                Token::RParen,
                Token::Dot,
            ]
        );
    }

    #[test]
    fn rule_and_query_markers() {
        assert_eq!(
            kinds("?- a :- B"),
            vec![
                Token::QueryPrefix,
                Token::Atom("a".into()),
                Token::Neck,
                Token::Var("B".into()),
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("% cabeçalho\nmale(john). % fim"),
            vec![
                Token::Atom("male".into()),
                Token::LParen,
                Token::Atom("john".into()),
                Token::RParen,
                Token::Dot,
            ]
        );
    }

    #[test]
    fn positions_are_tracked() {
        let tokens = tokenize("a.\n  b.").unwrap();
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let tokens = tokenize("'ação' x").unwrap();
        assert_eq!(tokens[1].column, 8);
    }

    #[test]
    fn quoted_atoms_with_escapes() {
        assert_eq!(
            kinds("'New York' 'it\\'s'"),
            vec![
                Token::Atom("New York".into()),
                Token::Atom("it's".into()),
            ]
        );
    }

    #[test]
    fn underscore_is_a_variable() {
        assert_eq!(kinds("_ _X"), vec![Token::Var("_".into()), Token::Var("_X".into())]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = tokenize("'oops").unwrap_err();
        assert_eq!((err.line, err.column), (1, 1));
        assert!(err.message.contains("não terminado"), "{}", err.message);
    }

    #[test]
    fn unknown_escape_is_an_error() {
        let err = tokenize("'a\\qb'").unwrap_err();
        assert!(err.message.contains("escape"), "{}", err.message);
    }

    #[test]
    fn stray_characters_are_errors() {
        let err = tokenize("parent(john; mary).").unwrap_err();
        assert_eq!(err.column, 12);
        assert!(tokenize("a : b").is_err());
    }

    #[test]
    fn hash_is_not_part_of_a_variable() {
        assert!(tokenize("_#1").is_err());
    }
}
