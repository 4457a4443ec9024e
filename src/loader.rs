//! # Loader — Leitura da KB a partir do Disco
//!
//! Lê o arquivo de cláusulas (por padrão `kb/family_kb.pl`), interpreta e
//! monta a [`KnowledgeBase`]. Qualquer problema é um [`LoadError`] fatal,
//! reportado antes da primeira consulta.
//!
//! O arquivo é apenas lido; nada é escrito de volta.

use std::path::Path;

use crate::core::{KnowledgeBase, LoadError};
use crate::syntax::parse_program;

/// Monta a KB a partir de texto já em memória.
pub fn parse_kb(src: &str) -> Result<KnowledgeBase, LoadError> {
    KnowledgeBase::from_clauses(parse_program(src)?)
}

/// Lê e monta a KB do arquivo em `path`.
///
/// # Erros
///
/// - [`LoadError::Io`] se o arquivo não puder ser lido
/// - erros de sintaxe ou de aridade vindos de [`parse_kb()`]
pub fn load_kb(path: &Path) -> Result<KnowledgeBase, LoadError> {
    let src = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let kb = parse_kb(&src)?;
    tracing::info!(
        path = %path.display(),
        clauses = kb.clause_count(),
        predicates = kb.predicate_count(),
        "KB carregada do disco"
    );
    Ok(kb)
}
