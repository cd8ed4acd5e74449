//! Reporte de errores con ubicación.
//!
//! Los errores que se originan en un volcado de tokens llevan una
//! ubicación exacta. [`Diagnostics`] los agrupa y los presenta con un
//! extracto de la línea afectada, al estilo de `rustc`:
//!
//! ```text
//! Token error: Unknown token kind `ODD`
//!  --> dump.txt:2:1-3
//!   |
//! 2 | ODD thing
//!   | ^^^
//!
//! Rejected with 1 error
//! ```

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::source::{Located, Location};

/// Conjunto de errores ubicados, en orden de aparición.
pub struct Diagnostics<E> {
    kind: &'static str,
    errors: Vec<Located<E>>,
}

impl<E> Diagnostics<E> {
    /// Cambia la etiqueta que precede a cada mensaje.
    pub fn kind(self, kind: &'static str) -> Self {
        Diagnostics { kind, ..self }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Located<E>] {
        &self.errors
    }
}

impl<E> From<Vec<Located<E>>> for Diagnostics<E> {
    fn from(errors: Vec<Located<E>>) -> Self {
        Diagnostics {
            kind: "error",
            errors,
        }
    }
}

impl<E> From<Located<E>> for Diagnostics<E> {
    fn from(error: Located<E>) -> Self {
        Diagnostics::from(vec![error])
    }
}

impl<E: Error> Display for Diagnostics<E> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        if count == 0 {
            return writeln!(fmt, "No errors were reported");
        }

        for error in &self.errors {
            writeln!(fmt, "{}: {}", self.kind, error.as_ref())?;
            excerpt(fmt, error.location())?;
            writeln!(fmt)?;
        }

        let plural = if count == 1 { "" } else { "s" };
        writeln!(fmt, "Rejected with {} error{}", count, plural)
    }
}

/// Escribe la ubicación, la línea afectada y una marca bajo las
/// columnas señaladas.
fn excerpt(fmt: &mut Formatter<'_>, location: &Location) -> fmt::Result {
    let number = location.line();
    let gutter = number.to_string().len();

    writeln!(fmt, " --> {}", location)?;
    writeln!(fmt, "{:gutter$} |", "", gutter = gutter)?;

    if let Some(line) = location.source().line(number) {
        writeln!(fmt, "{} | {}", number, line)?;
    }

    let span = location.span();
    writeln!(
        fmt,
        "{:gutter$} | {}{}",
        "",
        " ".repeat(span.start as usize - 1),
        "^".repeat(span.len()),
        gutter = gutter
    )
}
