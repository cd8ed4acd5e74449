//! Transpilador de un dialecto con sintaxis de Python a C++.
//!
//! # Front end
//! El análisis léxico ocurre fuera de este crate. El lexer externo
//! entrega un volcado textual de tokens que [`dump`] convierte en una
//! secuencia de [`token::Token`], con errores ubicados en [`source`] y
//! reportados por medio de [`error`]. La secuencia se reduce en
//! [`filter`] a la superficie que el transpilador conoce, según las
//! tablas fijas de [`tables`].
//!
//! # Back end
//! No hay árbol sintáctico ni representación intermedia: [`codegen`]
//! recorre la secuencia filtrada una sola vez, reconstruye las llaves de
//! bloque y emite una unidad de compilación C++ completa, precedida por
//! un preámbulo de builtins. La unidad se entrega por tubería a un
//! compilador nativo en [`build`], y sus diagnósticos se reescriben con
//! la terminología del dialecto en [`translate`]. Las rutas, comandos y
//! estrategias ajustables viven en [`config`].

pub mod build;
pub mod codegen;
pub mod config;
pub mod dump;
pub mod error;
pub mod filter;
pub mod source;
pub mod tables;
pub mod token;
pub mod translate;
