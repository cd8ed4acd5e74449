//! Filtrado de tokens.
//!
//! Primera fase propia del transpilador. Reduce el flujo del lexer a
//! la superficie que el generador sabe traducir, preservando el orden.
//! El filtro es permisivo y silencioso: lo que no reconoce simplemente
//! desaparece, y el rechazo real ocurre más adelante.

use tracing::debug;

use crate::{
    tables::Tables,
    token::{Kind, Signal, Token},
};

/// Filtra una secuencia completa de tokens.
pub fn filter(tokens: Vec<Token>, tables: &Tables) -> Vec<Token> {
    let total = tokens.len();
    let kept: Vec<Token> = tokens
        .into_iter()
        .filter(|token| admits(token, tables))
        .collect();

    let kept = drop_dangling_imports(kept);
    let kept = collapse_newlines(kept);

    debug!(total, kept = kept.len(), "filtered token stream");
    kept
}

/// Decide si un token individual sobrevive al filtro.
fn admits(token: &Token, tables: &Tables) -> bool {
    let surface = tables.surface();

    if token.is_indent() {
        return true;
    }

    if token.kind() == Kind::ImportModule {
        // Importar un módulo no soportado equivale a no importarlo
        return token
            .lexeme()
            .map_or(false, |name| tables.module(name).is_some());
    }

    surface.is_builtin(token) || surface.supports(token) || token.kind().is_structural()
}

/// Descarta `import` cuando no le sigue inmediatamente un módulo.
fn drop_dangling_imports(tokens: Vec<Token>) -> Vec<Token> {
    let mut kept = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        let dangling = token.is_keyword("import")
            && !matches!(iter.peek(), Some(next) if next.kind() == Kind::ImportModule);

        if !dangling {
            kept.push(token);
        }
    }

    kept
}

/// Colapsa señales de fin de sentencia consecutivas en una sola.
///
/// La operación es idempotente.
pub fn collapse_newlines(tokens: Vec<Token>) -> Vec<Token> {
    let mut collapsed: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let repeated = token.is_signal(Signal::Newline)
            && collapsed
                .last()
                .map_or(false, |last| last.is_signal(Signal::Newline));

        if !repeated {
            collapsed.push(token);
        }
    }

    collapsed
}
