//! Punto de entrada ("driver").
//!
//! Este módulo orquesta las diferentes fases del proceso de
//! transpilación, invoca al compilador nativo y expone una CLI.

use anyhow::{anyhow, bail, Context};
use clap::{crate_version, Arg, ArgMatches, Command};
use pycom::{
    build::{BuildError, BuildOptions, NativeCompiler},
    codegen::{self, BlockStyle, Diagnostic, Options, Reporter},
    config::{Config, DiagnosticsMode},
    dump,
    error::Diagnostics,
    filter,
    source::Source,
    tables::Tables,
    token::Token,
    translate::translate,
};

use std::{
    env::{self, consts::EXE_SUFFIX},
    fs::{self, File},
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    process::{self, Stdio},
    time::Instant,
};

use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parsing de CLI
    let args = Command::new("pycom")
        .version(crate_version!())
        .about("Transpiles a Python-like dialect to C++ and builds it")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .required(true)
                .help("Token dump, or dialect source when a lexer is configured"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .takes_value(true)
                .value_name("FILE")
                .help("Executable name (defaults to the source name)"),
        )
        .arg(
            Arg::new("print")
                .short('p')
                .long("print")
                .help("Print generated code and exit"),
        )
        .arg(
            Arg::new("tokens")
                .short('t')
                .long("tokens")
                .help("Print filtered tokens and exit"),
        )
        .arg(
            Arg::new("raw-tokens")
                .short('T')
                .long("raw-tokens")
                .help("Print tokens before filtering and exit"),
        )
        .arg(
            Arg::new("check")
                .short('c')
                .long("check")
                .conflicts_with_all(&["run", "run-and-delete", "output"])
                .help("Only check that the program compiles"),
        )
        .arg(
            Arg::new("run")
                .short('r')
                .long("run")
                .help("Run the executable after building it"),
        )
        .arg(
            Arg::new("run-and-delete")
                .short('R')
                .long("run-and-delete")
                .conflicts_with("run")
                .help("Run the executable, then delete it"),
        )
        .arg(
            Arg::new("fast-math")
                .short('f')
                .long("fast-math")
                .help("Optimize with -O3 instead of -O2"),
        )
        .arg(
            Arg::new("fail-print")
                .short('F')
                .long("fail-print")
                .help("Print generated code if the native build fails"),
        )
        .arg(
            Arg::new("gpp-errors")
                .short('g')
                .long("gpp-errors")
                .help("Show native compiler errors untranslated"),
        )
        .arg(
            Arg::new("blocks")
                .short('b')
                .long("blocks")
                .takes_value(true)
                .value_name("STYLE")
                .possible_values(["indentation", "lookbehind"])
                .help("Block reconstruction strategy"),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .help("Report progress and timing"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Debug logging"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .value_name("FILE")
                .help("Configuration file (defaults to ./pycom.toml, if present)"),
        )
        .get_matches();

    init_logging(&args);

    let config = Config::load(args.value_of("config").map(Path::new))
        .context("Failed to load configuration")?;

    let source = Path::new(args.value_of("source").expect("clap requires a source"));
    let start = Instant::now();

    let tokens = read_tokens(&config, source)?;
    if args.is_present("raw-tokens") {
        return emit(&dump::write(&tokens));
    }

    let tables = Tables::standard();
    let tokens = filter::filter(tokens, tables);
    if args.is_present("tokens") {
        return emit(&dump::write(&tokens));
    }

    let blocks = match args.value_of("blocks") {
        Some(style) => style
            .parse::<BlockStyle>()
            .map_err(|()| anyhow!("Unknown block style: {}", style))?,
        None => config.codegen.blocks,
    };

    let generated = codegen::generate(tokens, tables, &Options { blocks }, &mut StderrReporter)
        .context("Code generation failed")?;

    info!(elapsed = ?start.elapsed(), "transpiled {}", source.display());

    if args.is_present("print") {
        return emit(&format!("{}\n", generated.code));
    }

    let mut options = BuildOptions::empty();
    if args.is_present("fast-math") {
        options |= BuildOptions::FAST_MATH;
    }

    // Con --check el ejecutable muere junto al directorio temporal
    let check = args.is_present("check");
    let scratch = if check {
        Some(tempfile::tempdir().context("Failed to create a temporary directory")?)
    } else {
        None
    };

    let output = match (&scratch, args.value_of("output")) {
        (Some(dir), _) => dir.path().join(default_output(source)),
        (None, Some(path)) => PathBuf::from(path),
        (None, None) => default_output(source),
    };

    let include_dir = include_dir(&config);
    let mut compiler = NativeCompiler::spawn(&config.compiler, &output, &include_dir, options)
        .with_context(|| format!("Failed to start {}", config.compiler.command))?;

    compiler
        .stdin()
        .write_all(generated.code.as_bytes())
        .context("Failed to send code to the native compiler")?;

    let build_start = Instant::now();
    match compiler.finish() {
        Ok(()) => (),

        Err(BuildError::Diagnostics(stderr)) => {
            report_build_failure(&args, &config, &generated.code, &stderr)?;
            bail!("Failed to build {}", output.display());
        }

        Err(error) => {
            if args.is_present("fail-print") {
                emit(&format!("{}\n", generated.code))?;
            }

            return Err(error).with_context(|| format!("Failed to build {}", output.display()));
        }
    }

    info!(elapsed = ?build_start.elapsed(), "built {}", output.display());

    if check {
        return emit(&format!(
            "No errors in the compilation of '{}'; successful check\n",
            source.display()
        ));
    }

    let run_and_delete = args.is_present("run-and-delete");
    if args.is_present("run") || run_and_delete {
        // Sin un componente de directorio se buscaría en PATH
        let program = if output.is_relative() {
            Path::new(".").join(&output)
        } else {
            output.clone()
        };

        let status = process::Command::new(&program)
            .status()
            .with_context(|| format!("Failed to run {}", program.display()))?;

        if run_and_delete {
            fs::remove_file(&output)
                .with_context(|| format!("Failed to delete {}", output.display()))?;
        }

        if !status.success() {
            bail!("{} exited with {}", program.display(), status);
        }
    }

    Ok(())
}

/// Diagnósticos no fatales de generación.
struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        eprintln!("error: {}", diagnostic);
    }
}

fn init_logging(args: &ArgMatches) {
    let level = if args.is_present("verbose") {
        "debug"
    } else if args.is_present("info") {
        "info"
    } else {
        "warn"
    };

    // RUST_LOG tiene precedencia sobre las opciones
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Obtiene la secuencia de tokens, ya sea del lexer externo o de un
/// volcado existente.
fn read_tokens(config: &Config, path: &Path) -> anyhow::Result<Vec<Token>> {
    let name = path.display().to_string();

    let source = match &config.lexer.command {
        Some(command) => {
            let (program, rest) = command.split_first().context("Lexer command is empty")?;
            let output = process::Command::new(program)
                .args(rest)
                .arg(path)
                .stderr(Stdio::inherit())
                .output()
                .with_context(|| format!("Failed to run lexer: {}", program))?;

            if !output.status.success() {
                bail!("Lexer failed on {} with {}", name, output.status);
            }

            let text = String::from_utf8(output.stdout).context("Lexer output is not UTF-8")?;
            Source::from_text(&text, name)
        }

        None => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open for reading: {}", name))?;

            Source::read(BufReader::new(file), name.clone())
                .with_context(|| format!("Failed to read: {}", name))?
        }
    };

    match dump::parse(&source) {
        Ok(tokens) => Ok(tokens),
        Err(errors) => {
            eprint!("{}", Diagnostics::from(errors).kind("Token error"));
            bail!("Invalid token dump: {}", source.name());
        }
    }
}

fn report_build_failure(
    args: &ArgMatches,
    config: &Config,
    code: &str,
    stderr: &str,
) -> anyhow::Result<()> {
    if args.is_present("fail-print") {
        emit(&format!("{}\n", code))?;
    }

    let mode = if args.is_present("gpp-errors") {
        DiagnosticsMode::Raw
    } else {
        config.diagnostics.mode
    };

    match mode {
        DiagnosticsMode::Translate => eprintln!("pycom: compilation error:\n{}", translate(stderr)),
        DiagnosticsMode::Raw => eprint!("{}", stderr),
        DiagnosticsMode::Silent => (),
    }

    Ok(())
}

/// Escribe a la salida estándar. Que el lector cierre la tubería antes
/// de tiempo no es un error.
fn emit(text: &str) -> anyhow::Result<()> {
    write_output(io::stdout().lock(), text)
}

fn write_output<W: Write>(mut out: W, text: &str) -> anyhow::Result<()> {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result.context("Failed to write to standard output"),
    }
}

/// Nombre del ejecutable: el nombre del programa sin extensión.
fn default_output(source: &Path) -> PathBuf {
    let mut name = source
        .file_stem()
        .unwrap_or_else(|| source.as_os_str())
        .to_owned();

    name.push(EXE_SUFFIX);
    PathBuf::from(name)
}

/// Directorio que contiene `headers/`.
///
/// En orden: la configuración, el directorio del ejecutable si contiene
/// `headers/`, y por último el directorio del paquete.
fn include_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.compiler.include_dir {
        return dir.clone();
    }

    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .filter(|dir| dir.join("headers").is_dir())
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")))
}
