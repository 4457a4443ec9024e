//! # Term — Termos da Lógica de Cláusulas de Horn
//!
//! Um [`Term`] é o valor básico manipulado pelo motor de inferência:
//!
//! | Variante | Exemplo | Significado |
//! |----------|---------|-------------|
//! | `Atom` | `john` | Constante simbólica opaca |
//! | `Var` | `X`, `_` | Marcador nomeado, local a uma consulta ou aplicação de regra |
//! | `Compound` | `parent(john, mary)` | Functor + argumentos ordenados |
//!
//! ## Variáveis e Gerações
//!
//! Cada [`Var`] carrega um **índice de geração**. Variáveis escritas no
//! arquivo da KB ou na consulta têm geração `0`; a cada aplicação de uma
//! cláusula o solver carimba uma geração nova via [`Term::rename()`]
//! ("standardizing apart"). Assim, duas aplicações da mesma regra nunca
//! compartilham variáveis.
//!
//! ## Exemplo
//!
//! ```rust
//! let goal = Term::compound("father", vec![Term::var("X"), Term::atom("mary")]);
//! assert_eq!(goal.to_string(), "father(X, mary)");
//! assert_eq!(goal.signature().unwrap().to_string(), "father/2");
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Nome interno de átomos, functores e variáveis.
///
/// `Arc<str>` torna o clone barato — termos são clonados a cada renomeação.
pub type Symbol = Arc<str>;

/// Variável lógica: nome + geração.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var {
    /// Nome como escrito na fonte (ex: `X`, `Pai`, `_Tmp`); `_#N` para cada `_`.
    pub name: Symbol,
    /// `0` para variáveis da fonte; `> 0` para cópias renomeadas.
    pub generation: u64,
}

impl Var {
    /// Cria uma variável de geração `0`.
    pub fn new(name: &str) -> Self {
        Self {
            name: Symbol::from(name),
            generation: 0,
        }
    }

    /// Retorna a mesma variável carimbada com outra geração.
    pub fn renamed(&self, generation: u64) -> Self {
        Self {
            name: self.name.clone(),
            generation,
        }
    }

    /// Variáveis iniciadas por `_` não aparecem nas respostas.
    pub fn is_anonymous(&self) -> bool {
        self.name.starts_with('_')
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}_{}", self.name, self.generation)
        }
    }
}

/// Identificador de predicado: functor + aridade (ex: `father/2`).
///
/// É a chave do índice da [`KnowledgeBase`](super::KnowledgeBase).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    pub name: Symbol,
    pub arity: usize,
}

impl Signature {
    pub fn new(name: &str, arity: usize) -> Self {
        Self {
            name: Symbol::from(name),
            arity,
        }
    }

    /// Interpreta um indicador `nome/aridade`, como usado em `:listing father/2`.
    ///
    /// Retorna `None` se o texto não tiver essa forma.
    pub fn parse_indicator(text: &str) -> Option<Self> {
        let (name, arity) = text.trim().rsplit_once('/')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let arity = arity.trim().parse().ok()?;
        Some(Self::new(name, arity))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// Termo lógico.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// Constante simbólica.
    Atom(Symbol),
    /// Variável lógica.
    Var(Var),
    /// Termo composto. `args` nunca é vazio: `foo` sem argumentos é um `Atom`.
    Compound { functor: Symbol, args: Vec<Term> },
}

impl Term {
    pub fn atom(name: &str) -> Self {
        Term::Atom(Symbol::from(name))
    }

    pub fn var(name: &str) -> Self {
        Term::Var(Var::new(name))
    }

    /// Cria um termo composto. Com `args` vazio, degrada para átomo.
    pub fn compound(functor: &str, args: Vec<Term>) -> Self {
        if args.is_empty() {
            Term::atom(functor)
        } else {
            Term::Compound {
                functor: Symbol::from(functor),
                args,
            }
        }
    }

    /// Assinatura do termo quando usado como objetivo.
    ///
    /// Átomos são predicados de aridade 0; variáveis não são chamáveis.
    pub fn signature(&self) -> Option<Signature> {
        match self {
            Term::Atom(name) => Some(Signature {
                name: name.clone(),
                arity: 0,
            }),
            Term::Compound { functor, args } => Some(Signature {
                name: functor.clone(),
                arity: args.len(),
            }),
            Term::Var(_) => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        !matches!(self, Term::Var(_))
    }

    /// `true` se o termo não contém variáveis.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Atom(_) => true,
            Term::Var(_) => false,
            Term::Compound { args, .. } => args.iter().all(Term::is_ground),
        }
    }

    /// Acumula as variáveis do termo em `out`, na ordem da primeira ocorrência
    /// e sem repetições.
    pub fn collect_vars(&self, out: &mut Vec<Var>) {
        match self {
            Term::Atom(_) => {}
            Term::Var(v) => {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            Term::Compound { args, .. } => {
                for arg in args {
                    arg.collect_vars(out);
                }
            }
        }
    }

    /// Copia o termo trocando a geração de todas as variáveis.
    pub fn rename(&self, generation: u64) -> Term {
        match self {
            Term::Atom(_) => self.clone(),
            Term::Var(v) => Term::Var(v.renamed(generation)),
            Term::Compound { functor, args } => Term::Compound {
                functor: functor.clone(),
                args: args.iter().map(|a| a.rename(generation)).collect(),
            },
        }
    }

    /// Maior geração presente no termo (`0` se não houver variáveis).
    pub fn max_generation(&self) -> u64 {
        match self {
            Term::Atom(_) => 0,
            Term::Var(v) => v.generation,
            Term::Compound { args, .. } => {
                args.iter().map(Term::max_generation).max().unwrap_or(0)
            }
        }
    }
}

/// Um átomo dispensa aspas se começa por minúscula ou dígito e só contém
/// alfanuméricos e `_`.
fn is_plain_atom(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_lowercase() || c.is_ascii_digit() => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn write_atom(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if is_plain_atom(name) {
        return f.write_str(name);
    }
    f.write_str("'")?;
    for c in name.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            _ => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write_atom(f, name),
            Term::Var(v) => write!(f, "{}", v),
            Term::Compound { functor, args } => {
                write_atom(f, functor)?;
                f.write_str("(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Termos são serializados na sua forma textual (`"parent(john, mary)"`).
impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
