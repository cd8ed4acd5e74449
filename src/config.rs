//! Configuración del transpilador.
//!
//! Todos los campos tienen un valor por omisión, por lo cual un archivo
//! vacío o ausente es una configuración válida. Las opciones de línea de
//! comandos tienen precedencia sobre este archivo.
//!
//! ```toml
//! [compiler]
//! command = "g++"
//! std = "c++20"
//! flags = ["-w"]
//! include_dir = "/usr/share/pycom"
//!
//! [lexer]
//! command = ["pycom-lex", "--dump"]
//!
//! [codegen]
//! blocks = "indentation"
//!
//! [diagnostics]
//! mode = "translate"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::codegen::BlockStyle;

/// Archivo que se busca en el directorio de trabajo si no se indica otro.
pub const DEFAULT_FILE: &str = "pycom.toml";

/// Error al cargar la configuración.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Configuración completa.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub compiler: CompilerConfig,
    pub lexer: LexerConfig,
    pub codegen: CodegenConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Compilador nativo que recibe la unidad generada.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub command: String,

    /// Estándar del lenguaje objetivo, sin el prefijo `-std=`.
    pub std: String,

    /// Opciones adicionales, antes de la optimización.
    pub flags: Vec<String>,

    /// Directorio que contiene `headers/`.
    pub include_dir: Option<PathBuf>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            command: String::from("g++"),
            std: String::from("c++20"),
            flags: vec![String::from("-w")],
            include_dir: None,
        }
    }
}

/// Lexer externo.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LexerConfig {
    /// Programa y argumentos. La ruta del programa fuente se agrega al
    /// final y el volcado de tokens se lee de su salida estándar.
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CodegenConfig {
    pub blocks: BlockStyle,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub mode: DiagnosticsMode,
}

/// Presentación de los diagnósticos del compilador nativo.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsMode {
    /// Traducidos a la terminología del dialecto.
    #[default]
    Translate,

    /// Tal como los emite el compilador nativo.
    Raw,

    /// Solo se reporta el fallo.
    Silent,
}

impl Config {
    /// Carga la configuración.
    ///
    /// Con `path`, el archivo debe existir. Sin `path`, se usa
    /// [`DEFAULT_FILE`] si existe y los valores por omisión si no.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_FILE).is_file() => Path::new(DEFAULT_FILE),
            None => {
                debug!("no configuration file, using defaults");
                return Ok(Config::default());
            }
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(text: &str) -> Result<Config, ConfigError> {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", text).unwrap();
        Config::load(Some(file.path()))
    }

    #[test]
    fn defaults() {
        let config = load("").unwrap();
        assert_eq!(config.compiler.command, "g++");
        assert_eq!(config.compiler.std, "c++20");
        assert_eq!(config.compiler.flags, ["-w"]);
        assert!(config.compiler.include_dir.is_none());
        assert!(config.lexer.command.is_none());
        assert_eq!(config.codegen.blocks, BlockStyle::Indentation);
        assert_eq!(config.diagnostics.mode, DiagnosticsMode::Translate);
    }

    #[test]
    fn partial_sections() {
        let config = load(
            r#"
[compiler]
std = "c++2b"

[lexer]
command = ["pycom-lex", "--dump"]

[codegen]
blocks = "lookbehind"

[diagnostics]
mode = "raw"
"#,
        )
        .unwrap();

        assert_eq!(config.compiler.command, "g++");
        assert_eq!(config.compiler.std, "c++2b");
        assert_eq!(
            config.lexer.command.as_deref(),
            Some(&["pycom-lex".to_owned(), "--dump".to_owned()][..])
        );
        assert_eq!(config.codegen.blocks, BlockStyle::Lookbehind);
        assert_eq!(config.diagnostics.mode, DiagnosticsMode::Raw);
    }

    #[test]
    fn bad_value() {
        let error = load("[codegen]\nblocks = \"braces\"\n").unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}
