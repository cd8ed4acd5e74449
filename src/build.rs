//! Construcción de ejecutables.
//!
//! La unidad de compilación emitida por [`crate::codegen`] se entrega
//! por la entrada estándar a un compilador nativo de C++, que produce el
//! ejecutable final. Cualquier salida del compilador por su salida de
//! error se considera un fallo, aun si el estado de salida es exitoso.

use std::{
    io::{self, BufWriter, Read},
    path::Path,
    process::{Child, ChildStdin, Command, ExitStatus, Stdio},
};

use bitflags::bitflags;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CompilerConfig;

bitflags! {
    /// Opciones a aplicar durante la compilación nativa.
    pub struct BuildOptions: u32 {
        /// Optimizar con `-O3` en lugar de `-O2`.
        const FAST_MATH = 0x01;
    }
}

/// Un error de compilación nativa.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BuildError {
    /// Ocurrió un evento de error de E/S durante la invocación
    /// del compilador.
    #[error("I/O error")]
    Io(#[from] io::Error),

    /// El compilador emitió diagnósticos. Se conserva su salida de
    /// error completa.
    #[error("Native compiler reported errors")]
    Diagnostics(String),

    /// El compilador terminó con error sin emitir diagnósticos.
    #[error("Native compiler exited with status code {0:?}")]
    Failed(ExitStatus),
}

/// Construye la invocación del compilador nativo.
///
/// La forma es `<command> -std=<std> -O2|-O3 <flags> -I <include_dir>
/// -xc++ -o <output> -`.
pub fn command(
    config: &CompilerConfig,
    output: &Path,
    include_dir: &Path,
    opts: BuildOptions,
) -> Command {
    let optimization = if opts.contains(BuildOptions::FAST_MATH) {
        "-O3"
    } else {
        "-O2"
    };

    let mut command = Command::new(&config.command);
    command
        .arg(format!("-std={}", config.std))
        .arg(optimization)
        .args(&config.flags)
        // Las cabeceras de soporte se incluyen como "headers/..."
        .arg("-I")
        .arg(include_dir)
        .arg("-xc++")
        .arg("-o")
        .arg(output)
        .arg("-");

    command
}

/// Instancia del compilador nativo para un ejecutable definido.
pub struct NativeCompiler {
    child: Child,
    stdin: BufWriter<ChildStdin>,
}

impl NativeCompiler {
    /// Inicia una instancia del compilador.
    ///
    /// El compilador tratará de emitir un ejecutable y escribirlo a
    /// la ruta indicada por `output`.
    pub fn spawn<O>(
        config: &CompilerConfig,
        output: &O,
        include_dir: &Path,
        opts: BuildOptions,
    ) -> Result<Self, BuildError>
    where
        O: AsRef<Path>,
    {
        let mut command = command(config, output.as_ref(), include_dir, opts);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        debug!(?command, "spawning native compiler");

        let mut child = command.spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "compiler stdin is closed"))?;

        Ok(NativeCompiler {
            child,
            stdin: BufWriter::new(stdin),
        })
    }

    /// Obtiene la entrada estándar del proceso, que espera la unidad de
    /// compilación completa.
    pub fn stdin(&mut self) -> &mut BufWriter<ChildStdin> {
        &mut self.stdin
    }

    /// Indica el fin de la unidad y espera al compilador.
    pub fn finish(mut self) -> Result<(), BuildError> {
        // Cerrar la entrada es lo que permite al compilador terminar
        let stdin = self.stdin.into_inner().map_err(|error| error.into_error())?;
        drop(stdin);

        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            pipe.read_to_string(&mut stderr)?;
        }

        let status = self.child.wait()?;
        info!(%status, "native compiler finished");

        if !stderr.trim().is_empty() {
            Err(BuildError::Diagnostics(stderr))
        } else if !status.success() {
            Err(BuildError::Failed(status))
        } else {
            Ok(())
        }
    }
}
