//! Generación de código objetivo.
//!
//! # Recorrido
//! El generador hace una única pasada de izquierda a derecha sobre la
//! secuencia ya filtrada. No construye un árbol sintáctico: cada token
//! se traduce mirando a lo sumo unas pocas posiciones hacia atrás o
//! hacia adelante. Antes del cuerpo traducido se emite el preámbulo fijo
//! de [`Tables`].
//!
//! # Errores
//! Hay dos niveles. Un [`GenerateError`] aborta la generación de
//! inmediato. Un [`Diagnostic`] se entrega al [`Reporter`] en el
//! momento en que ocurre y la generación continúa; el rechazo final
//! queda en manos del compilador nativo.

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    tables::Tables,
    token::{Kind, Signal, Token},
};

mod blocks;
mod fstring;

use blocks::Blocks;

pub use blocks::BlockStyle;

/// Error fatal de generación.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("token #{index}: keyword '{keyword}' is not yet implemented, sorry")]
    UnimplementedKeyword { index: usize, keyword: String },

    #[error("token #{index}: no type specified for param '{parameter}'")]
    MissingParameterType { index: usize, parameter: String },

    #[error("token #{index}: invalid type specified for param '{parameter}'")]
    InvalidParameterType {
        index: usize,
        parameter: String,
        annotation: String,
    },

    #[error("token #{index}: operator '{operator}' is not supported")]
    UnsupportedOperator { index: usize, operator: String },
}

/// Problema no fatal detectado durante la generación.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("token #{index}: invalid type specified for function '{function}'")]
    InvalidFunctionType {
        index: usize,
        function: String,
        annotation: String,
    },

    #[error("token #{index}: invalid type specified for variable '{variable}'")]
    InvalidVariableType {
        index: usize,
        variable: String,
        annotation: String,
    },
}

/// Destino de diagnósticos no fatales.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Opciones de generación.
#[derive(Copy, Clone, Debug, Default)]
pub struct Options {
    pub blocks: BlockStyle,
}

/// Resultado de la generación.
pub struct Generated {
    /// Unidad de compilación completa.
    pub code: String,

    /// Secuencia consumida, para introspección.
    pub tokens: Vec<Token>,
}

/// Genera la unidad de compilación para una secuencia filtrada.
pub fn generate<R>(
    tokens: Vec<Token>,
    tables: &Tables,
    options: &Options,
    reporter: &mut R,
) -> Result<Generated, GenerateError>
where
    R: Reporter + ?Sized,
{
    let out = Output::new(tables.preamble().render());
    let mut context = Context {
        tokens: &tokens,
        tables,
        reporter,
        out,
        blocks: Blocks::new(options.blocks),
    };

    for index in 0..tokens.len() {
        context.blocks.before(&tokens, index, &mut context.out);
        context.translate(index)?;
        context.trailing(index);
    }

    context.blocks.finish(&mut context.out);

    let code = context.out.code;
    info!(tokens = tokens.len(), bytes = code.len(), "generated compilation unit");

    Ok(Generated { code, tokens })
}

/// Determina si el `def` en `index` define el punto de entrada.
fn defines_entry_point(tokens: &[Token], index: usize) -> bool {
    tokens
        .get(index + 1)
        .map_or(false, |next| next.is(Kind::FunctionName, "main"))
}

/// Texto de salida en construcción.
pub(crate) struct Output {
    code: String,

    /// Hay una sentencia emitida sin terminador.
    open_statement: bool,
}

impl Output {
    fn new(code: String) -> Self {
        Output {
            code,
            open_statement: false,
        }
    }

    fn push(&mut self, text: &str) {
        if !text.is_empty() {
            self.code.push_str(text);
            self.open_statement = true;
        }
    }

    fn terminate(&mut self) {
        self.code.push(';');
        self.open_statement = false;
    }

    fn open_brace(&mut self) {
        self.code.push('{');
        self.open_statement = false;
    }

    fn close_brace(&mut self) {
        self.code.push('}');
        self.open_statement = false;
    }

    /// Termina la sentencia pendiente, si la hay.
    fn finish_statement(&mut self) {
        if self.open_statement {
            self.terminate();
        }
    }

    /// Cierra un bloque, terminando antes la sentencia pendiente.
    fn close_block(&mut self) {
        self.finish_statement();
        self.close_brace();
    }

    fn prepend(&mut self, text: &str) {
        self.code.insert_str(0, text);
    }
}

struct Context<'a, R: ?Sized> {
    tokens: &'a [Token],
    tables: &'a Tables,
    reporter: &'a mut R,
    out: Output,
    blocks: Blocks,
}

type Generate = Result<(), GenerateError>;

impl<'a, R: Reporter + ?Sized> Context<'a, R> {
    fn translate(&mut self, index: usize) -> Generate {
        let token = &self.tokens[index];
        let text = token.lexeme().unwrap_or_default();

        match token.kind() {
            Kind::Keyword => self.keyword(index)?,
            Kind::Operator => self.operator(index)?,
            Kind::ParameterName => self.parameter(index)?,
            Kind::VariableName => self.variable(index),

            Kind::Signal => {
                if let Some(signal) = token.as_signal() {
                    self.signal(index, signal);
                }
            }

            Kind::Name
            | Kind::FunctionName
            | Kind::FunctionRef
            | Kind::VariableRef
            | Kind::ImportRef
            | Kind::MethodName
            | Kind::StringLiteral
            | Kind::IntegerLiteral => self.out.push(text),

            Kind::FormattedString => self.out.push(&fstring::transcode(text)),

            // Las anotaciones se consumen desde el token que anotan
            Kind::TypeName | Kind::ImportModule => (),
        }

        Ok(())
    }

    fn keyword(&mut self, index: usize) -> Generate {
        let keyword = self.tokens[index].lexeme().unwrap_or_default();

        match keyword {
            "def" => self.function(index),

            "for" => {
                let variable = self.lexeme_at(index + 1).unwrap_or_default();
                self.out.push(&format!("for(auto {}", variable));
            }

            "if" => self.out.push("if("),
            "elif" => self.out.push("else if("),
            "else" => self.out.push("else"),
            "while" => self.out.push("while("),
            "continue" => self.out.push("continue"),
            "return" => self.out.push("return "),
            "import" => self.import(index),

            _ => {
                return Err(GenerateError::UnimplementedKeyword {
                    index,
                    keyword: keyword.to_owned(),
                })
            }
        }

        Ok(())
    }

    /// Tipo de retorno de una definición de función.
    fn function(&mut self, index: usize) {
        if defines_entry_point(self.tokens, index) {
            self.out.push("int ");
            return;
        }

        // La anotación de retorno solo se busca dentro de la cabecera
        let header = &self.tokens[index..];
        let header = match header.iter().position(|t| t.is_signal(Signal::BlockStart)) {
            Some(end) => &header[..end],
            None => header,
        };

        let pointer = header
            .iter()
            .position(|t| t.is_signal(Signal::FuncTypePointer))
            .map(|offset| index + offset);

        let pointer = match pointer {
            Some(pointer) => pointer,
            None => {
                debug!(index, "function without return annotation, deducing");
                self.out.push("auto ");
                return;
            }
        };

        let annotation = self.lexeme_at(pointer + 1).unwrap_or_default();
        match self.tables.types().target(annotation) {
            Some(target) => self.out.push(&format!("{} ", target)),
            None => {
                let function = self.lexeme_at(index + 1).unwrap_or_default().to_owned();
                self.reporter.report(Diagnostic::InvalidFunctionType {
                    index,
                    function,
                    annotation: annotation.to_owned(),
                });
            }
        }
    }

    fn import(&mut self, index: usize) {
        let module = self
            .lexeme_at(index + 1)
            .filter(|_| self.tokens[index + 1].kind() == Kind::ImportModule)
            .and_then(|name| self.tables.module(name));

        if let Some(module) = module {
            debug!(module = module.name(), "importing module");
            self.out.prepend(&module.prelude());
        }
    }

    fn operator(&mut self, index: usize) -> Generate {
        let operator = self.tokens[index].lexeme().unwrap_or_default();

        match operator {
            "(" | "LPAREN" => self.out.push("("),
            ")" | "RPAREN" => self.out.push(")"),
            "in" => self.out.push(": "),

            _ => match self.tables.operators().target(operator) {
                // Los terminadores salen de las señales de fin de línea
                Some(";") => (),
                Some(target) => self.out.push(target),
                None => {
                    return Err(GenerateError::UnsupportedOperator {
                        index,
                        operator: operator.to_owned(),
                    })
                }
            },
        }

        Ok(())
    }

    fn signal(&mut self, index: usize, signal: Signal) {
        match signal {
            Signal::Newline => {
                if self.newline_terminates(index) {
                    self.out.terminate();
                }

                self.blocks.newline();
            }

            Signal::Comma => self.out.push(","),
            Signal::Dot => self.out.push("."),
            Signal::BlockStart => self.blocks.open(&mut self.out),
            Signal::BlockEnd => self.blocks.close(&mut self.out),
            Signal::Indent(width) => self.blocks.indent(width),
            Signal::TypePointer | Signal::FuncTypePointer => (),
        }
    }

    /// Un fin de línea termina una sentencia si le precede contenido
    /// y no le sigue una definición de función.
    fn newline_terminates(&self, index: usize) -> bool {
        let after_content = index
            .checked_sub(1)
            .map_or(false, |previous| self.tokens[previous].as_signal().is_none());

        let before_def = self
            .tokens
            .get(index + 1)
            .map_or(false, |next| next.is_keyword("def"));

        after_content && !before_def
    }

    fn parameter(&mut self, index: usize) -> Generate {
        let parameter = self.tokens[index].lexeme().unwrap_or_default().to_owned();

        let annotated = self
            .tokens
            .get(index + 1)
            .map_or(false, |next| next.is_signal(Signal::TypePointer));

        if !annotated {
            return Err(GenerateError::MissingParameterType { index, parameter });
        }

        let annotation = self.lexeme_at(index + 2).unwrap_or_default();
        match self.tables.types().target(annotation) {
            Some(target) => {
                self.out.push(&format!("{} {}", target, parameter));
                Ok(())
            }

            None => Err(GenerateError::InvalidParameterType {
                index,
                parameter,
                annotation: annotation.to_owned(),
            }),
        }
    }

    /// Declaración de variable.
    ///
    /// La variable de un `for` ya fue nombrada por la cabecera del ciclo.
    fn variable(&mut self, index: usize) {
        let follows_for = index
            .checked_sub(1)
            .map_or(false, |previous| self.tokens[previous].is_keyword("for"));

        if follows_for {
            return;
        }

        let variable = self.tokens[index].lexeme().unwrap_or_default().to_owned();
        let annotated = self
            .tokens
            .get(index + 1)
            .map_or(false, |next| next.is_signal(Signal::TypePointer));

        if !annotated {
            self.out.push(&format!("auto {}", variable));
            return;
        }

        let annotation = self.lexeme_at(index + 2).unwrap_or_default();
        match self.tables.types().target(annotation) {
            Some(target) => self.out.push(&format!("{} {}", target, variable)),
            None => {
                self.out.push(&format!("auto {}", variable));
                self.reporter.report(Diagnostic::InvalidVariableType {
                    index,
                    variable,
                    annotation: annotation.to_owned(),
                });
            }
        }
    }

    /// Reglas que dependen del token siguiente.
    fn trailing(&mut self, index: usize) {
        let current = &self.tokens[index];
        let next = match self.tokens.get(index + 1) {
            Some(next) => next,
            None => return,
        };

        if next.is_signal(Signal::BlockEnd) && !current.is_signal(Signal::Newline) {
            self.blocks.before_close(&mut self.out);
        }

        if next.is_signal(Signal::BlockStart) {
            // `def` y `else` nunca abrieron un paréntesis
            let opener = self.tokens[..=index]
                .iter()
                .rev()
                .find(|token| token.kind() == Kind::Keyword);

            let parenthesized =
                !opener.map_or(false, |k| k.is_keyword("def") || k.is_keyword("else"));

            if parenthesized {
                self.out.push(")");
            }
        }
    }

    fn lexeme_at(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).and_then(Token::lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::parse_str;
    use rstest::rstest;

    fn body(dump: &str, style: BlockStyle) -> Result<(String, Vec<Diagnostic>), GenerateError> {
        let tables = Tables::standard();
        let mut diagnostics = Vec::new();
        let options = Options { blocks: style };

        let generated = generate(parse_str(dump).unwrap(), tables, &options, &mut diagnostics)?;
        let preamble = tables.preamble().render();

        let code = match generated.code.find(&preamble) {
            Some(at) => {
                let mut code = generated.code.clone();
                code.replace_range(at..at + preamble.len(), "");
                code
            }

            None => generated.code,
        };

        Ok((code, diagnostics))
    }

    fn indented(dump: &str) -> String {
        body(dump, BlockStyle::Indentation).unwrap().0
    }

    #[test]
    fn entry_point_returns_int() {
        let code = indented(
            "KW def\nFUNC main\nOP (\nOP )\nSIG BLOCK_START\nSIG NEWLINE\n\
             SIG 4 TAB\nNAME print\nOP (\nINT 1\nOP )\nSIG NEWLINE\n",
        );

        assert_eq!(code, "int main(){print(1);}");
    }

    #[test]
    fn annotated_function() {
        let code = indented(
            "KW def\nFUNC twice\nOP (\nPARAM x\nSIG TYPEPOINTER\nTYPE int\nOP )\n\
             SIG FUNCTYPEPOINTER\nTYPE int\nSIG BLOCK_START\nSIG NEWLINE\n\
             SIG 4 TAB\nKW return\nVARREF x\nOP *\nINT 2\nSIG NEWLINE\n",
        );

        assert_eq!(code, "long long int twice(long long int x){return x*2;}");
    }

    #[rstest]
    #[case("str", "std::string")]
    #[case("int", "long long int")]
    #[case("float", "long double")]
    #[case("None", "void")]
    #[case("list", "list<std::string>")]
    fn annotations_map_in_headers(#[case] annotation: &str, #[case] target: &str) {
        let dump = format!(
            "KW def\nFUNC g\nOP (\nPARAM p\nSIG TYPEPOINTER\nTYPE {0}\nOP )\n\
             SIG FUNCTYPEPOINTER\nTYPE {0}\nSIG BLOCK_START\nSIG NEWLINE\n\
             SIG 4 TAB\nKW return\nVARREF p\nSIG NEWLINE\n",
            annotation
        );

        let (code, diagnostics) = body(&dump, BlockStyle::Indentation).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(code, format!("{0} g({0} p){{return p;}}", target));
    }

    #[test]
    fn unannotated_function_is_deduced() {
        let code = indented(
            "KW def\nFUNC one\nOP (\nOP )\nSIG BLOCK_START\nSIG NEWLINE\n\
             SIG 4 TAB\nKW return\nINT 1\nSIG NEWLINE\n",
        );

        assert_eq!(code, "auto one(){return 1;}");
    }

    #[test]
    fn return_annotation_is_searched_within_the_header() {
        let (code, diagnostics) = body(
            "KW def\nFUNC a\nOP (\nOP )\nSIG BLOCK_START\nSIG NEWLINE\n\
             SIG 4 TAB\nKW return\nINT 1\nSIG NEWLINE\n\
             SIG 0 TAB\nKW def\nFUNC b\nOP (\nOP )\nSIG FUNCTYPEPOINTER\nTYPE str\n\
             SIG BLOCK_START\nSIG NEWLINE\nSIG 4 TAB\nKW return\nSTRING \"b\"\nSIG NEWLINE\n",
            BlockStyle::Indentation,
        )
        .unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(
            code,
            "auto a(){return 1;}std::string b(){return \"b\";}"
        );
    }

    #[test]
    fn invalid_function_type_is_not_fatal() {
        let (code, diagnostics) = body(
            "KW def\nFUNC f\nOP (\nOP )\nSIG FUNCTYPEPOINTER\nTYPE dict\nSIG BLOCK_START\n\
             SIG NEWLINE\nSIG 4 TAB\nKW return\nINT 1\nSIG NEWLINE\n",
            BlockStyle::Indentation,
        )
        .unwrap();

        assert_eq!(code, "f(){return 1;}");
        assert_eq!(
            diagnostics,
            vec![Diagnostic::InvalidFunctionType {
                index: 0,
                function: "f".into(),
                annotation: "dict".into(),
            }]
        );
        assert_eq!(
            diagnostics[0].to_string(),
            "token #0: invalid type specified for function 'f'"
        );
    }

    #[test]
    fn parameter_without_annotation_is_fatal() {
        let error = body("KW def\nFUNC f\nOP (\nPARAM x\nOP )\n", BlockStyle::Indentation)
            .unwrap_err();

        assert_eq!(
            error,
            GenerateError::MissingParameterType {
                index: 3,
                parameter: "x".into(),
            }
        );
    }

    #[test]
    fn parameter_with_unknown_type_is_fatal() {
        let error = body(
            "KW def\nFUNC f\nOP (\nPARAM x\nSIG TYPEPOINTER\nTYPE bytes\nOP )\n",
            BlockStyle::Indentation,
        )
        .unwrap_err();

        assert!(matches!(error, GenerateError::InvalidParameterType { index: 3, .. }));
        assert!(error.to_string().contains("invalid type specified for param 'x'"));
    }

    #[test]
    fn unimplemented_keyword_names_itself() {
        let error = body("KW match\nVARREF x\n", BlockStyle::Indentation).unwrap_err();
        assert_eq!(
            error.to_string(),
            "token #0: keyword 'match' is not yet implemented, sorry"
        );
    }

    #[test]
    fn unsupported_operator_is_fatal() {
        let error = body("VARREF x\nOP **\nINT 2\n", BlockStyle::Indentation).unwrap_err();
        assert!(matches!(error, GenerateError::UnsupportedOperator { index: 1, .. }));
    }

    #[test]
    fn word_operators_are_mapped() {
        let code = indented(
            "KW while\nOP not\nVARREF a\nOP and\nVARREF b\nOP or\nVARREF c\nOP !=\nINT 1\n\
             SIG BLOCK_START\nSIG NEWLINE\nSIG 4 TAB\nKW continue\nSIG NEWLINE\n",
        );

        assert_eq!(code, "while(!a&&b||c!=1){continue;}");
    }

    #[test]
    fn statement_terminator_operator_is_suppressed() {
        let code = indented("VARREF a\nOP =\nINT 1\nOP ;\nSIG NEWLINE\n");
        assert_eq!(code, "a=1;");
    }

    #[test]
    fn for_loop_header() {
        let code = indented(
            "KW for\nVAR i\nOP in\nNAME range\nOP (\nINT 3\nOP )\nSIG BLOCK_START\n\
             SIG NEWLINE\nSIG 4 TAB\nNAME print\nOP (\nVARREF i\nOP )\nSIG NEWLINE\n",
        );

        assert_eq!(code, "for(auto i: range(3)){print(i);}");
    }

    #[test]
    fn if_elif_else() {
        let code = indented(
            "KW if\nVARREF x\nOP <\nINT 0\nSIG BLOCK_START\nSIG NEWLINE\n\
             SIG 4 TAB\nNAME print\nOP (\nINT 1\nOP )\nSIG NEWLINE\n\
             SIG 0 TAB\nKW elif\nVARREF x\nOP >\nINT 0\nSIG BLOCK_START\nSIG NEWLINE\n\
             SIG 4 TAB\nNAME print\nOP (\nINT 2\nOP )\nSIG NEWLINE\n\
             SIG 0 TAB\nKW else\nSIG BLOCK_START\nSIG NEWLINE\n\
             SIG 4 TAB\nNAME print\nOP (\nINT 3\nOP )\nSIG NEWLINE\n",
        );

        assert_eq!(
            code,
            "if(x<0){print(1);}else if(x>0){print(2);}else{print(3);}"
        );
    }

    #[test]
    fn variable_declarations() {
        let (code, diagnostics) = body(
            "VAR a\nOP =\nINT 1\nSIG NEWLINE\n\
             VAR b\nSIG TYPEPOINTER\nTYPE str\nOP =\nSTRING \"x\"\nSIG NEWLINE\n\
             VAR c\nSIG TYPEPOINTER\nTYPE set\nOP =\nINT 2\nSIG NEWLINE\n",
            BlockStyle::Indentation,
        )
        .unwrap();

        assert_eq!(code, "auto a=1;std::string b=\"x\";auto c=2;");
        assert!(matches!(
            &diagnostics[..],
            [Diagnostic::InvalidVariableType { index: 10, .. }]
        ));
    }

    #[test]
    fn formatted_strings_are_transcoded() {
        let code = indented("NAME print\nOP (\nFSTRING f\"{a} + {b}\"\nOP )\nSIG NEWLINE\n");
        assert_eq!(code, "print(\"{} + {}\", a, b);");
    }

    #[test]
    fn method_calls_and_commas() {
        let code = indented(
            "VARREF xs\nSIG DOT\nMETHOD append\nOP (\nINT 1\nOP )\nSIG NEWLINE\n\
             FUNCREF f\nOP (\nINT 1\nSIG COMMA\nINT 2\nOP )\nSIG NEWLINE\n",
        );

        assert_eq!(code, "xs.append(1);f(1,2);");
    }

    #[test]
    fn supported_import_is_prepended() {
        let tables = Tables::standard();
        let tokens = parse_str(
            "KW import\nIMPORT_MODULE math\nSIG NEWLINE\nKW def\nFUNC main\nOP (\nOP )\n\
             SIG BLOCK_START\nSIG NEWLINE\nSIG 4 TAB\nNAME print\nOP (\nIMPORTREF math\n\
             SIG DOT\nMETHOD sqrt\nOP (\nINT 4\nOP )\nOP )\nSIG NEWLINE\n",
        )
        .unwrap();

        let generated =
            generate(tokens, tables, &Options::default(), &mut Vec::<Diagnostic>::new()).unwrap();

        assert!(generated
            .code
            .starts_with("#include \"headers/pymath.hpp\"\nMath math;\n#include <iostream>"));
        assert!(generated
            .code
            .ends_with("int main(){print(math.sqrt(4));}"));
    }

    #[test]
    fn explicit_block_end_closes_once() {
        let code = indented(
            "KW if\nVARREF x\nSIG BLOCK_START\nSIG NEWLINE\nSIG 4 TAB\nNAME print\nOP (\n\
             VARREF x\nOP )\nSIG NEWLINE\nSIG BLOCK_END\nSIG 0 TAB\nNAME print\nOP (\nINT 0\nOP )\n",
        );

        assert_eq!(code, "if(x){print(x);}print(0);");
    }

    #[rstest]
    #[case(BlockStyle::Indentation, "if(x){if(y){print(1);}}")]
    #[case(BlockStyle::Lookbehind, "if(x){if(y){print(1);};}")]
    fn consecutive_block_ends(#[case] style: BlockStyle, #[case] expected: &str) {
        let (code, _) = body(
            "KW if\nVARREF x\nSIG BLOCK_START\nSIG NEWLINE\nSIG 4 TAB\nKW if\nVARREF y\n\
             SIG BLOCK_START\nSIG NEWLINE\nSIG 8 TAB\nNAME print\nOP (\nINT 1\nOP )\n\
             SIG NEWLINE\nSIG BLOCK_END\nSIG BLOCK_END\n",
            style,
        )
        .unwrap();

        assert_eq!(code, expected);
    }

    #[test]
    fn stray_block_end_is_ignored() {
        let code = indented("NAME print\nOP (\nINT 0\nOP )\nSIG NEWLINE\nSIG BLOCK_END\n");
        assert_eq!(code, "print(0);");
    }

    #[test]
    fn lookbehind_reproduces_the_positional_heuristic() {
        let (code, _) = body(
            "KW def\nFUNC f\nOP (\nOP )\nSIG FUNCTYPEPOINTER\nTYPE None\nSIG BLOCK_START\n\
             SIG NEWLINE\nSIG 4 TAB\nNAME print\nOP (\nINT 1\nOP )\nSIG NEWLINE\n\
             KW def\nFUNC g\nOP (\nOP )\nSIG BLOCK_START\nSIG NEWLINE\nSIG 4 TAB\n\
             FUNCREF f\nOP (\nOP )\nSIG NEWLINE\nSIG BLOCK_END\n",
            BlockStyle::Lookbehind,
        )
        .unwrap();

        // El fin de línea antes de `def` no termina la sentencia y la
        // llave de `f` proviene de la heurística
        assert_eq!(code, "void f(){print(1)}auto g(){f();}");
    }

    #[test]
    fn lookbehind_never_closes_before_the_entry_point() {
        let (code, _) = body(
            "KW def\nFUNC f\nOP (\nOP )\nSIG FUNCTYPEPOINTER\nTYPE None\nSIG BLOCK_START\n\
             SIG NEWLINE\nSIG 4 TAB\nNAME print\nOP (\nINT 1\nOP )\nSIG NEWLINE\n\
             KW def\nFUNC main\nOP (\nOP )\nSIG BLOCK_START\n",
            BlockStyle::Lookbehind,
        )
        .unwrap();

        assert_eq!(code, "void f(){print(1)int main(){");
    }
}
