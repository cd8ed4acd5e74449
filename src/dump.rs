//! Lectura de volcados de tokens.
//!
//! # Formato
//! El lexer externo escribe un token por línea, en la forma
//! `<TIPO> <valor>`. El tipo es una de las etiquetas de [`Kind`] y
//! el valor es el resto de la línea, incluyendo espacios internos.
//! Se ignoran líneas vacías y líneas que comienzan con `#`.
//!
//! ```text
//! KW def
//! FUNC main
//! OP (
//! OP )
//! SIG BLOCK_START
//! SIG NEWLINE
//! SIG 4 TAB
//! NAME print
//! ```
//!
//! # Errores
//! Al igual que un lexer con recuperación, la lectura continúa tras
//! una línea mal formada para reportar todos los errores del volcado
//! en una sola ejecución. Si hay al menos un error, no se produce
//! ningún token.

use std::rc::Rc;

use thiserror::Error;

use crate::{
    source::{Located, Location, Source},
    token::{Kind, Token, TokenError},
};

/// Error de lectura de un volcado.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DumpError {
    /// El tipo o la señal no son válidos.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// La línea solo contiene un tipo.
    #[error("Token kind `{0}` is missing its value")]
    MissingValue(Kind),
}

/// Interpreta por completo un origen ya leído.
pub fn parse(source: &Rc<Source>) -> Result<Vec<Token>, Vec<Located<DumpError>>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for (number, line) in source.lines() {
        match parse_line(line) {
            Ok(None) => (),
            Ok(Some(token)) => tokens.push(token),
            Err((error, columns)) => {
                let location = Location::columns(source, number, columns.start, columns.end);
                errors.push(Located::at(error, location));
            }
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

/// Atajo para volcados en memoria.
pub fn parse_str(text: &str) -> Result<Vec<Token>, Vec<Located<DumpError>>> {
    parse(&Source::from_text(text, "<memory>"))
}

/// Escribe tokens en el mismo formato que se lee.
pub fn write(tokens: &[Token]) -> String {
    let mut dump = String::new();
    for token in tokens {
        dump.push_str(token.kind().tag());
        dump.push(' ');
        dump.push_str(&token.value());
        dump.push('\n');
    }

    dump
}

type LineResult = Result<Option<Token>, (DumpError, std::ops::Range<u32>)>;

fn parse_line(line: &str) -> LineResult {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    // Columnas base 1 del tipo dentro de la línea original
    let kind_start = (line.len() - trimmed.len()) as u32 + 1;
    let (tag, value) = match trimmed.split_once(' ') {
        Some((tag, value)) => (tag, Some(value)),
        None => (trimmed.trim_end(), None),
    };

    let kind_end = kind_start + tag.chars().count() as u32;
    let kind: Kind = tag
        .parse()
        .map_err(|error| (DumpError::from(error), kind_start..kind_end))?;

    // Los literales de texto conservan espacios finales, el resto no
    let value = match value {
        Some(value) if matches!(kind, Kind::StringLiteral | Kind::FormattedString) => value,
        Some(value) => value.trim_end(),
        None => "",
    };

    if value.is_empty() {
        return Err((DumpError::MissingValue(kind), kind_start..kind_end));
    }

    let value_start = kind_end + 1;
    let value_end = value_start + value.chars().count() as u32;

    Token::new(kind, value)
        .map(Some)
        .map_err(|error| (DumpError::from(error), value_start..value_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Signal;

    #[test]
    fn reads_every_kind_of_line() {
        let tokens = parse_str(
            "# cabecera\n\
             KW def\n\
             FUNC main\n\
             \n\
             SIG 4 TAB\n\
             STRING \"hello world\"\n",
        )
        .unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::keyword("def"),
                Token::new(Kind::FunctionName, "main").unwrap(),
                Token::signal(Signal::Indent(4)),
                Token::new(Kind::StringLiteral, "\"hello world\"").unwrap(),
            ]
        );
    }

    #[test]
    fn collects_every_error() {
        let errors = parse_str("KW def\nLAMBDA x\nSIG SIDEWAYS\nNAME\n").unwrap_err();
        assert_eq!(errors.len(), 3);

        let lines: Vec<_> = errors.iter().map(|e| e.location().line()).collect();
        assert_eq!(lines, vec![2, 3, 4]);

        assert!(matches!(
            errors[0].val(),
            DumpError::Token(TokenError::UnknownKind(kind)) if kind == "LAMBDA"
        ));
        assert!(matches!(errors[2].val(), DumpError::MissingValue(Kind::Name)));
    }

    #[test]
    fn signal_error_points_at_value() {
        let errors = parse_str("SIG SIDEWAYS").unwrap_err();
        let location = errors[0].location();
        assert_eq!(location.span(), 5..13);
    }

    #[test]
    fn write_then_read() {
        let text = "KW if\nVARREF x\nOP >\nINT 1\nSIG BLOCK_START\n";
        let tokens = parse_str(text).unwrap();
        assert_eq!(write(&tokens), text);
    }
}
