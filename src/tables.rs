//! Tablas fijas del transpilador.
//!
//! Todo lo que el transpilador sabe del dialecto y del lenguaje objetivo
//! vive aquí: la superficie de tokens soportada, los tipos primitivos,
//! los operadores, los builtins, los módulos importables y el preámbulo
//! que encabeza cada unidad de compilación. Las tablas se construyen una
//! sola vez por proceso y nunca se modifican; tanto el filtro como el
//! generador las reciben por referencia.

use std::{collections::HashMap, fmt::Write};

use once_cell::sync::Lazy;

use crate::token::{Kind, Signal, Token};

static STANDARD: Lazy<Tables> = Lazy::new(Tables::build);

/// Palabras clave que el filtro deja pasar.
///
/// `match` y `case` forman parte de la superficie pero el generador
/// todavía no las implementa, por lo cual terminan en error fatal.
const KEYWORDS: &[&str] = &[
    "def", "for", "if", "elif", "else", "while", "match", "case", "return", "continue", "import",
];

const SIGNALS: &[Signal] = &[
    Signal::Newline,
    Signal::BlockStart,
    Signal::BlockEnd,
    Signal::TypePointer,
    Signal::FuncTypePointer,
    Signal::Comma,
];

/// Funciones y métodos predefinidos que siempre atraviesan el filtro.
const BUILTINS: &[(Kind, &str)] = &[
    (Kind::Name, "print"),
    (Kind::Name, "range"),
    (Kind::MethodName, "append"),
    (Kind::MethodName, "factorial"),
    (Kind::MethodName, "sqrt"),
];

const MODULES: &[Module] = &[Module {
    name: "math",
    header: "headers/pymath.hpp",
    class: "Math",
}];

/// Anotaciones de tipo del dialecto y su escritura en el objetivo.
const TYPES: &[(&str, &str)] = &[
    ("str", "std::string"),
    ("int", "long long int"),
    ("float", "long double"),
    ("None", "void"),
    ("list", "list<std::string>"),
];

/// Lista canónica de operadores (dialecto, objetivo).
///
/// Los paréntesis y `in` no aparecen aquí: el generador los trata
/// por separado.
const OPERATORS: &[(&str, &str)] = &[
    ("=", "="),
    ("+", "+"),
    ("-", "-"),
    ("*", "*"),
    ("/", "/"),
    ("%", "%"),
    ("==", "=="),
    ("!=", "!="),
    ("<", "<"),
    (">", ">"),
    ("<=", "<="),
    (">=", ">="),
    ("+=", "+="),
    ("-=", "-="),
    ("*=", "*="),
    ("/=", "/="),
    ("[", "["),
    ("]", "]"),
    (";", ";"),
    ("and", "&&"),
    ("or", "||"),
    ("not", "!"),
];

const INCLUDES: &[&str] = &[
    "<iostream>",
    "<sstream>",
    "<string>",
    "<vector>",
    "\"headers/range.hpp\"",
];

const USINGS: &[&str] = &["util::lang::range"];

/// Cuerpos de builtins, una sobrecarga por entrada.
const BUILTIN_BODIES: &[&str] = &[
    "const bool True = true; const bool False = false;",
    "void print(std::string str){std::cout << str << std::endl;}",
    "void print(const char* str){std::cout << str << std::endl;}",
    "void print(bool b){std::cout << (b ? \"True\" : \"False\") << std::endl;}",
    "void print(int istr){std::cout << istr << std::endl;}",
    "void print(float fstr){std::cout << fstr << std::endl;}",
    "void print(double dstr){std::cout << dstr << std::endl;}",
    "void print(long long int llistr){std::cout << llistr << std::endl;}",
    "void print(long double ldstr){std::cout << ldstr << std::endl;}",
    "template <typename T> std::size_t pyformat(std::ostringstream& out, const std::string& format, std::size_t at, const T& arg){std::size_t hole = format.find(\"{}\", at); if(hole == std::string::npos){return at;} out << format.substr(at, hole - at) << arg; return hole + 2;}",
    "template <typename... Args> void print(const std::string& format, const Args&... args){std::ostringstream out; std::size_t at = 0; ((at = pyformat(out, format, at, args)), ...); out << format.substr(at); std::cout << out.str() << std::endl;}",
    "int len(std::string str){return str.length();}",
    "int len(const char* str){return std::string(str).length();}",
    "template <typename T> int len(const T& sized){return sized.size();}",
    "std::string input(std::string prompt){std::cout << prompt; std::string x; std::getline(std::cin, x); return x;}",
];

const RECORD: &str = "template <typename T> struct list {std::vector<T> items; list() = default; \
list(std::initializer_list<T> init) : items(init) {} \
void append(const T& item){items.push_back(item);} \
std::size_t size() const {return items.size();} \
T& operator[](std::size_t index){return items[index];} \
typename std::vector<T>::iterator begin(){return items.begin();} \
typename std::vector<T>::iterator end(){return items.end();}};";

/// Conjunto completo de tablas.
pub struct Tables {
    surface: Surface,
    types: TypeMap,
    operators: OperatorMap,
    modules: &'static [Module],
    preamble: Preamble,
}

impl Tables {
    /// Obtiene las tablas estándar, construidas una vez por proceso.
    pub fn standard() -> &'static Tables {
        &STANDARD
    }

    fn build() -> Self {
        Tables {
            surface: Surface {
                keywords: KEYWORDS,
                signals: SIGNALS,
                builtins: BUILTINS,
            },
            types: TypeMap(TYPES),
            operators: OperatorMap::from_pairs(OPERATORS),
            modules: MODULES,
            preamble: Preamble {
                includes: INCLUDES,
                usings: USINGS,
                builtins: BUILTIN_BODIES,
                record: RECORD,
            },
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn types(&self) -> &TypeMap {
        &self.types
    }

    pub fn operators(&self) -> &OperatorMap {
        &self.operators
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    /// Busca un módulo importable por nombre.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.name == name)
    }
}

/// Superficie soportada del dialecto.
pub struct Surface {
    keywords: &'static [&'static str],
    signals: &'static [Signal],
    builtins: &'static [(Kind, &'static str)],
}

impl Surface {
    /// Determina si el par (tipo, valor) es parte de la superficie.
    pub fn supports(&self, token: &Token) -> bool {
        match (token.kind(), token.as_signal(), token.lexeme()) {
            (_, Some(signal), _) => self.signals.contains(&signal),
            (Kind::Keyword, _, Some(keyword)) => self.keywords.contains(&keyword),
            _ => false,
        }
    }

    /// Determina si el token nombra a un builtin.
    pub fn is_builtin(&self, token: &Token) -> bool {
        self.builtins
            .iter()
            .any(|&(kind, name)| token.is(kind, name))
    }
}

/// Tipos primitivos del dialecto.
pub struct TypeMap(&'static [(&'static str, &'static str)]);

impl TypeMap {
    /// Traduce una anotación a su escritura en el objetivo.
    pub fn target(&self, dialect: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|&&(from, _)| from == dialect)
            .map(|&(_, to)| to)
    }

    /// Pares (dialecto, objetivo) en orden de declaración.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().copied()
    }
}

/// Operadores en ambas direcciones.
///
/// Ambas búsquedas se derivan de una misma lista canónica de pares.
pub struct OperatorMap {
    to_target: HashMap<&'static str, &'static str>,
    to_dialect: HashMap<&'static str, &'static str>,
}

impl OperatorMap {
    fn from_pairs(pairs: &'static [(&'static str, &'static str)]) -> Self {
        OperatorMap {
            to_target: pairs.iter().copied().collect(),
            to_dialect: pairs.iter().map(|&(from, to)| (to, from)).collect(),
        }
    }

    pub fn target(&self, dialect: &str) -> Option<&'static str> {
        self.to_target.get(dialect).copied()
    }

    /// Pares (objetivo, dialecto) de los operadores que en el dialecto
    /// se escriben como palabras.
    pub fn words(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.to_dialect
            .iter()
            .map(|(&target, &dialect)| (target, dialect))
            .filter(|&(_, dialect)| dialect.chars().all(|c| c.is_ascii_alphabetic()))
    }
}

/// Un módulo externo importable.
pub struct Module {
    name: &'static str,
    header: &'static str,
    class: &'static str,
}

impl Module {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Texto que se antepone a la unidad al importar el módulo.
    pub fn prelude(&self) -> String {
        format!(
            "#include \"{}\"\n{} {};\n",
            self.header, self.class, self.name
        )
    }
}

/// Código fijo al inicio de toda unidad de compilación.
pub struct Preamble {
    includes: &'static [&'static str],
    usings: &'static [&'static str],
    builtins: &'static [&'static str],
    record: &'static str,
}

impl Preamble {
    pub fn render(&self) -> String {
        let mut code = String::new();

        // Escribir a un String no falla
        for include in self.includes {
            let _ = writeln!(code, "#include {}", include);
        }

        for using in self.usings {
            let _ = writeln!(code, "using {};", using);
        }

        for builtin in self.builtins {
            let _ = writeln!(code, "{}", builtin);
        }

        let _ = writeln!(code, "{}", self.record);
        code
    }
}
