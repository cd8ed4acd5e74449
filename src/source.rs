//! Rastreo de ubicaciones originales en volcados de tokens.
//!
//! El lexer entrega su salida como texto, un token por línea. Los
//! errores de formato en ese texto se asocian a una línea y un rango
//! de columnas, lo cual permite mostrar un extracto del volcado al
//! reportarlos.

use std::{
    fmt::{self, Debug, Display, Formatter},
    io::{self, BufRead},
    ops::Range,
    rc::Rc,
};

/// Un objeto cualquiera con una posición original asociada.
#[derive(Debug, Clone)]
pub struct Located<T> {
    location: Location,
    value: T,
}

impl<T> Located<T> {
    /// Obtiene el valor.
    pub fn val(&self) -> &T {
        &self.value
    }

    /// Obtiene la ubicación.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Construye a partir de un valor y una ubicación.
    pub fn at(value: T, location: Location) -> Self {
        Located { value, location }
    }
}

impl<T> AsRef<T> for Located<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Una ubicación es un rango de columnas dentro de una línea de un origen.
///
/// Los volcados tienen un token por línea, así que ningún error abarca
/// más de una. El rango de columnas es semiabierto y comienza en 1.
#[derive(Clone)]
pub struct Location {
    from: Rc<Source>,
    line: u32,
    columns: Range<u32>,
}

impl Location {
    /// Ubicación de las columnas `[from, to)` de una línea.
    pub fn columns(source: &Rc<Source>, line: u32, from: u32, to: u32) -> Self {
        let from = from.max(1);
        Location {
            from: Rc::clone(source),
            line,
            columns: from..to.max(from + 1),
        }
    }

    /// Número de línea, a partir de 1.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Primera columna y columna siguiente a la última.
    pub fn span(&self) -> Range<u32> {
        self.columns.clone()
    }

    /// Obtiene el origen.
    pub fn source(&self) -> &Source {
        &self.from
    }
}

impl Display for Location {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let Range { start, end } = self.columns;
        write!(formatter, "{}:{}:{}", self.from.name, self.line, start)?;

        // Rangos de más de una columna llevan la última columna incluida
        if end > start + 1 {
            write!(formatter, "-{}", end - 1)?;
        }

        Ok(())
    }
}

impl Debug for Location {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        <Self as Display>::fmt(self, formatter)
    }
}

/// Nombre de origen y sus líneas.
pub struct Source {
    name: String,
    lines: Vec<String>,
}

impl Source {
    /// Lee por completo un origen de texto.
    pub fn read<R, S>(reader: R, name: S) -> io::Result<Rc<Source>>
    where
        R: BufRead,
        S: Into<String>,
    {
        let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
        Ok(Rc::new(Source {
            name: name.into(),
            lines,
        }))
    }

    /// Construye un origen a partir de texto ya cargado en memoria.
    pub fn from_text<S: Into<String>>(text: &str, name: S) -> Rc<Source> {
        Rc::new(Source {
            name: name.into(),
            lines: text.lines().map(String::from).collect(),
        })
    }

    /// Obtiene el nombre.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Itera por líneas, numeradas a partir de 1.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index as u32 + 1, line.as_str()))
    }

    /// Obtiene una línea por número, si existe.
    pub fn line(&self, number: u32) -> Option<&str> {
        let index = number.checked_sub(1)? as usize;
        self.lines.get(index).map(String::as_str)
    }
}
