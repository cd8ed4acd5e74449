//! Contrato de tokens entre el lexer y el transpilador.
//!
//! # Origen
//! El lexer del dialecto es externo a este crate. Lo único que se
//! asume de él es que produce una secuencia ordenada de pares
//! (tipo, valor), donde el tipo proviene de un conjunto cerrado
//! ([`Kind`]) y el valor es el lexema original, excepto para señales
//! estructurales, cuyo valor es uno de los marcadores de [`Signal`].
//!
//! # Señales estructurales
//! El dialecto delimita bloques por indentación. El lexer traduce
//! estas transiciones a señales explícitas de apertura y cierre de
//! bloque, y además antepone a cada línea física un marcador con la
//! anchura absoluta de su indentación en espacios (`"<N> TAB"`).

use std::{
    borrow::Cow,
    fmt::{self, Display},
    str::FromStr,
};

use thiserror::Error;
use unicase::Ascii as NoCase;

/// Sufijo de los marcadores de indentación.
const TAB_SUFFIX: &str = " TAB";

/// Error de construcción de un token a partir de texto.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Unknown token kind `{0}`")]
    UnknownKind(String),

    #[error("Unknown structural signal `{0}`")]
    UnknownSignal(String),
}

/// Tipo de un token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Keyword,
    Signal,
    Name,
    FunctionName,
    VariableName,
    ParameterName,
    TypeName,
    StringLiteral,
    FormattedString,
    IntegerLiteral,
    Operator,
    VariableRef,
    FunctionRef,
    ImportRef,
    MethodName,
    ImportModule,
}

impl Kind {
    /// Etiqueta corta con la que el lexer identifica este tipo.
    pub fn tag(self) -> &'static str {
        use Kind::*;

        match self {
            Keyword         => "KW",
            Signal          => "SIG",
            Name            => "NAME",
            FunctionName    => "FUNC",
            VariableName    => "VAR",
            ParameterName   => "PARAM",
            TypeName        => "TYPE",
            StringLiteral   => "STRING",
            FormattedString => "FSTRING",
            IntegerLiteral  => "INT",
            Operator        => "OP",
            VariableRef     => "VARREF",
            FunctionRef     => "FUNCREF",
            ImportRef       => "IMPORTREF",
            MethodName      => "METHOD",
            ImportModule    => "IMPORT_MODULE",
        }
    }

    /// Determina si el tipo es relevante para la estructura del programa.
    ///
    /// Estos tipos atraviesan el filtro de tokens aunque su valor no
    /// forme parte de la superficie soportada. Las palabras clave y
    /// los nombres de método no son estructurales: solo pasan si la
    /// superficie o la tabla de builtins los nombra.
    pub fn is_structural(self) -> bool {
        !matches!(self, Kind::Keyword | Kind::MethodName)
    }
}

impl Display for Kind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.tag())
    }
}

impl FromStr for Kind {
    type Err = TokenError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        use Kind::*;

        const KINDS: &[(NoCase<&str>, Kind)] = &[
            (NoCase::new("KW"),              Keyword),
            (NoCase::new("keyword"),         Keyword),
            (NoCase::new("SIG"),             Signal),
            (NoCase::new("signal"),          Signal),
            (NoCase::new("NAME"),            Name),
            (NoCase::new("FUNC"),            FunctionName),
            (NoCase::new("VAR"),             VariableName),
            (NoCase::new("PARAM"),           ParameterName),
            (NoCase::new("TYPE"),            TypeName),
            (NoCase::new("STRING"),          StringLiteral),
            (NoCase::new("FSTRING"),         FormattedString),
            (NoCase::new("INT"),             IntegerLiteral),
            (NoCase::new("OP"),              Operator),
            (NoCase::new("operator"),        Operator),
            (NoCase::new("VARREF"),          VariableRef),
            (NoCase::new("FUNCREF"),         FunctionRef),
            (NoCase::new("IMPORTREF"),       ImportRef),
            (NoCase::new("METHOD"),          MethodName),
            (NoCase::new("IMPORT_MODULE"),   ImportModule),
        ];

        KINDS
            .iter()
            .find(|&&(name, _)| name == NoCase::new(string))
            .map(|&(_, kind)| kind)
            .ok_or_else(|| TokenError::UnknownKind(string.to_owned()))
    }
}

/// Señal estructural.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Fin de sentencia.
    Newline,

    /// Apertura de bloque.
    BlockStart,

    /// Cierre de bloque.
    BlockEnd,

    /// `:` en la anotación de tipo de un parámetro o variable.
    TypePointer,

    /// `->` en la anotación de retorno de una función.
    FuncTypePointer,

    /// `,`
    Comma,

    /// `.`
    Dot,

    /// Anchura de indentación de la línea actual, en espacios.
    Indent(u32),
}

impl Display for Signal {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Signal::*;

        let string = match self {
            Newline         => "NEWLINE",
            BlockStart      => "BLOCK_START",
            BlockEnd        => "BLOCK_END",
            TypePointer     => "TYPEPOINTER",
            FuncTypePointer => "FUNCTYPEPOINTER",
            Comma           => "COMMA",
            Dot             => "DOT",
            Indent(width)   => return write!(fmt, "{}{}", width, TAB_SUFFIX),
        };

        fmt.write_str(string)
    }
}

impl FromStr for Signal {
    type Err = TokenError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        use Signal::*;

        let signal = match string {
            "NEWLINE" => Newline,
            "BLOCK_START" => BlockStart,
            "BLOCK_END" => BlockEnd,
            "TYPEPOINTER" => TypePointer,
            "FUNCTYPEPOINTER" => FuncTypePointer,
            "COMMA" => Comma,
            "DOT" => Dot,

            _ => string
                .strip_suffix(TAB_SUFFIX)
                .and_then(|width| width.trim().parse().ok())
                .map(Indent)
                .ok_or_else(|| TokenError::UnknownSignal(string.to_owned()))?,
        };

        Ok(signal)
    }
}

/// Un token del flujo de entrada.
///
/// Los tokens son inmutables. Las señales estructurales se guardan
/// ya interpretadas, el resto conserva su lexema original.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token(Repr);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Repr {
    Signal(Signal),
    Lexeme(Kind, String),
}

impl Token {
    /// Construye un token a partir de su par (tipo, valor).
    pub fn new<S: Into<String>>(kind: Kind, value: S) -> Result<Self, TokenError> {
        let value = value.into();
        match kind {
            Kind::Signal => value.parse().map(Token::signal),
            _ => Ok(Token(Repr::Lexeme(kind, value))),
        }
    }

    pub fn signal(signal: Signal) -> Self {
        Token(Repr::Signal(signal))
    }

    pub fn keyword<S: Into<String>>(keyword: S) -> Self {
        Token(Repr::Lexeme(Kind::Keyword, keyword.into()))
    }

    /// Obtiene el tipo.
    pub fn kind(&self) -> Kind {
        match &self.0 {
            Repr::Signal(_) => Kind::Signal,
            Repr::Lexeme(kind, _) => *kind,
        }
    }

    /// Obtiene el valor tal como lo escribiría el lexer.
    pub fn value(&self) -> Cow<'_, str> {
        match &self.0 {
            Repr::Signal(signal) => Cow::Owned(signal.to_string()),
            Repr::Lexeme(_, value) => Cow::Borrowed(value),
        }
    }

    /// Obtiene la señal, si este token es una.
    pub fn as_signal(&self) -> Option<Signal> {
        match &self.0 {
            Repr::Signal(signal) => Some(*signal),
            Repr::Lexeme(..) => None,
        }
    }

    /// Obtiene el lexema, si este token no es una señal.
    pub fn lexeme(&self) -> Option<&str> {
        match &self.0 {
            Repr::Signal(_) => None,
            Repr::Lexeme(_, value) => Some(value),
        }
    }

    /// Compara contra un par (tipo, lexema).
    pub fn is(&self, kind: Kind, value: &str) -> bool {
        matches!(&self.0, Repr::Lexeme(k, v) if *k == kind && v == value)
    }

    pub fn is_signal(&self, signal: Signal) -> bool {
        self.as_signal() == Some(signal)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is(Kind::Keyword, keyword)
    }

    /// Determina si es un marcador de indentación.
    pub fn is_indent(&self) -> bool {
        matches!(self.as_signal(), Some(Signal::Indent(_)))
    }
}

impl Display for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "({}, {:?})", self.kind(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("KW", Kind::Keyword)]
    #[case("kw", Kind::Keyword)]
    #[case("Import_Module", Kind::ImportModule)]
    #[case("fstring", Kind::FormattedString)]
    #[case("signal", Kind::Signal)]
    fn kinds_are_case_insensitive(#[case] tag: &str, #[case] kind: Kind) {
        assert_eq!(tag.parse::<Kind>(), Ok(kind));
    }

    #[test]
    fn unknown_kind() {
        assert_eq!(
            "LAMBDA".parse::<Kind>(),
            Err(TokenError::UnknownKind("LAMBDA".into()))
        );
    }

    #[rstest]
    #[case("NEWLINE", Signal::Newline)]
    #[case("FUNCTYPEPOINTER", Signal::FuncTypePointer)]
    #[case("0 TAB", Signal::Indent(0))]
    #[case("12 TAB", Signal::Indent(12))]
    fn signals(#[case] text: &str, #[case] signal: Signal) {
        assert_eq!(text.parse::<Signal>(), Ok(signal));
        assert_eq!(signal.to_string(), text);
    }

    #[rstest]
    #[case("TAB")]
    #[case("four TAB")]
    #[case("newline")]
    fn bad_signals(#[case] text: &str) {
        assert!(text.parse::<Signal>().is_err());
    }

    #[test]
    fn signal_tokens_keep_their_value() {
        let token = Token::new(Kind::Signal, "8 TAB").unwrap();
        assert!(token.is_indent());
        assert_eq!(token.kind(), Kind::Signal);
        assert_eq!(token.value(), "8 TAB");
        assert_eq!(token.lexeme(), None);
    }

    #[test]
    fn lexemes() {
        let token = Token::new(Kind::Name, "print").unwrap();
        assert!(token.is(Kind::Name, "print"));
        assert!(!token.is(Kind::MethodName, "print"));
        assert_eq!(token.to_string(), r#"(NAME, "print")"#);
    }
}
