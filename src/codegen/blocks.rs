//! Reconstrucción de bloques.
//!
//! El dialecto no cierra sus bloques explícitamente: un bloque termina
//! cuando la indentación vuelve a un nivel igual o menor al de la línea
//! que lo abrió. El lenguaje objetivo, en cambio, exige una llave de
//! cierre por cada llave de apertura. Este módulo decide dónde van esas
//! llaves.
//!
//! # Estrategias
//! - [`BlockStyle::Indentation`]: una pila con la indentación de la
//!   línea que abrió cada bloque. La primera palabra de cada línea
//!   cierra todos los bloques cuya cabecera tenga indentación mayor o
//!   igual a la de la línea. El fin de la entrada cierra lo que quede.
//! - [`BlockStyle::Lookbehind`]: la heurística posicional histórica.
//!   Antes de cada palabra clave se mira uno o dos tokens hacia atrás;
//!   si no hay una señal estructural allí, se emite una llave de cierre.

use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, trace};

use super::Output;
use crate::token::{Kind, Signal, Token};

/// Estrategia de reconstrucción de bloques.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStyle {
    #[default]
    Indentation,
    Lookbehind,
}

impl FromStr for BlockStyle {
    type Err = ();

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "indentation" => Ok(BlockStyle::Indentation),
            "lookbehind" => Ok(BlockStyle::Lookbehind),
            _ => Err(()),
        }
    }
}

pub(super) enum Blocks {
    Indentation(Stack),
    Lookbehind,
}

/// Pila de bloques abiertos.
pub(super) struct Stack {
    /// Indentación de la cabecera de cada bloque abierto.
    open: Vec<u32>,

    /// Indentación de la línea actual.
    line: u32,

    /// Todavía no se ha visto contenido en la línea actual.
    at_line_start: bool,
}

impl Blocks {
    pub fn new(style: BlockStyle) -> Self {
        match style {
            BlockStyle::Indentation => Blocks::Indentation(Stack {
                open: Vec::new(),
                line: 0,
                at_line_start: true,
            }),

            BlockStyle::Lookbehind => Blocks::Lookbehind,
        }
    }

    /// Cierra bloques implícitos antes de traducir un token.
    pub fn before(&mut self, tokens: &[Token], index: usize, out: &mut Output) {
        match self {
            Blocks::Indentation(stack) => {
                if tokens[index].as_signal().is_none() {
                    stack.dedent(out);
                }
            }

            Blocks::Lookbehind => {
                if closes_before_keyword(tokens, index) {
                    trace!(index, "closing block before keyword");
                    out.close_brace();
                }
            }
        }
    }

    /// Registra una señal de fin de línea.
    pub fn newline(&mut self) {
        if let Blocks::Indentation(stack) = self {
            stack.line = 0;
            stack.at_line_start = true;
        }
    }

    /// Registra el marcador de indentación de la línea actual.
    pub fn indent(&mut self, width: u32) {
        if let Blocks::Indentation(stack) = self {
            stack.line = width;
        }
    }

    /// Apertura explícita de bloque.
    pub fn open(&mut self, out: &mut Output) {
        out.open_brace();

        if let Blocks::Indentation(stack) = self {
            debug!(header = stack.line, depth = stack.open.len() + 1, "block opened");
            stack.open.push(stack.line);
        }
    }

    /// Termina la sentencia previa a un cierre explícito.
    pub fn before_close(&self, out: &mut Output) {
        match self {
            // Entre dos cierres no queda sentencia que terminar
            Blocks::Indentation(_) => out.finish_statement(),
            Blocks::Lookbehind => out.terminate(),
        }
    }

    /// Cierre explícito de bloque.
    pub fn close(&mut self, out: &mut Output) {
        match self {
            Blocks::Indentation(stack) => match stack.open.pop() {
                Some(header) => {
                    debug!(header, "block closed explicitly");
                    out.close_block();
                }

                None => debug!("block close without an open block, ignored"),
            },

            Blocks::Lookbehind => out.close_brace(),
        }
    }

    /// Fin de la entrada.
    pub fn finish(&mut self, out: &mut Output) {
        if let Blocks::Indentation(stack) = self {
            out.finish_statement();
            while let Some(header) = stack.open.pop() {
                debug!(header, "block closed at end of input");
                out.close_block();
            }
        }
    }
}

impl Stack {
    fn dedent(&mut self, out: &mut Output) {
        if !self.at_line_start {
            return;
        }

        self.at_line_start = false;
        while let Some(&header) = self.open.last() {
            if header < self.line {
                break;
            }

            debug!(header, line = self.line, "block closed on dedent");
            self.open.pop();
            out.close_block();
        }
    }
}

/// Heurística posicional de cierre de bloques.
///
/// Aplica a toda palabra clave excepto `continue`, `return` y la
/// definición del punto de entrada. Una señal de fin de línea
/// inmediatamente anterior se salta.
fn closes_before_keyword(tokens: &[Token], index: usize) -> bool {
    let token = &tokens[index];
    if token.kind() != Kind::Keyword
        || token.is_keyword("continue")
        || token.is_keyword("return")
        || super::defines_entry_point(tokens, index)
    {
        return false;
    }

    let back = match index.checked_sub(1).map(|i| &tokens[i]) {
        Some(previous) if previous.is_signal(Signal::Newline) => 2,
        _ => 1,
    };

    match index.checked_sub(back) {
        Some(at) => tokens[at].as_signal().is_none(),
        None => false,
    }
}
