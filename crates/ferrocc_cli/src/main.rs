//! `ferrocc` — the thin CLI shell over `ferrocc_driver`, spec.md §6.1.
//!
//! Generalizes the teacher's `llts_cli::main` (`examples/bherbruck-llts/
//! crates/llts_cli/src/main.rs`, a `clap`-derived struct mapping a handful
//! of TypeScript-compiler flags onto `llts_driver::compile_file`) to the
//! fuller flag surface spec.md §6.1 lists for a C compiler driver: output
//! path, six optimization levels, `-S`/`-c`/`--emit-llvm` output-kind
//! selection, a `--backend` switch (only `llvm` implemented, others
//! rejected per spec.md §6.1's contract), `--target`, the preprocessor
//! passthroughs `-I`/`-D` (accepted, not acted on — preprocessing is out
//! of scope, spec.md §1), and the `--debug-*` family mapped onto
//! `tracing`/`RUST_LOG`-style target filters instead of a bespoke debug
//! print system.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ferrocc_driver::{CompileOptions, OutputKind};

/// Optimization level as spelled on the command line — spec.md §6.1 lists
/// `-O0`..`-O3` plus `-Os`/`-Oz`, both of which collapse to `O2` (no
/// separate size-optimization pipeline is implemented, matching the
/// spec's literal mapping instruction).
#[derive(Debug, Clone, Copy)]
enum OptFlag {
    O0,
    O1,
    O2,
    O3,
}

impl std::str::FromStr for OptFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(OptFlag::O0),
            "1" => Ok(OptFlag::O1),
            "2" => Ok(OptFlag::O2),
            "3" => Ok(OptFlag::O3),
            "s" | "S" | "z" | "Z" => Ok(OptFlag::O2),
            other => Err(format!("invalid optimization level `-O{other}`")),
        }
    }
}

impl From<OptFlag> for u8 {
    fn from(flag: OptFlag) -> u8 {
        match flag {
            OptFlag::O0 => 0,
            OptFlag::O1 => 1,
            OptFlag::O2 => 2,
            OptFlag::O3 => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ferrocc", about = "A C front-end and LLVM lowering pipeline")]
struct Cli {
    /// Input C source file (already preprocessed, or plain enough that
    /// ferrocc's `# N "file"` line-marker skipping tolerates it).
    input: PathBuf,

    /// Output path (default `a.out`).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Optimization level: 0, 1, 2, 3, s, or z (s/z both map to O2).
    #[arg(short = 'O', default_value = "0")]
    opt_level: OptFlag,

    /// Emit debug info. Accepted for CLI compatibility; a no-op at the
    /// core level (DWARF emission is an explicit Non-goal).
    #[arg(short = 'g')]
    debug_info: bool,

    /// Emit target assembly instead of an object file.
    #[arg(short = 'S')]
    emit_assembly: bool,

    /// Compile only: emit an object file, do not link.
    #[arg(short = 'c')]
    compile_only: bool,

    /// Emit textual LLVM IR instead of compiling to a native object.
    #[arg(long = "emit-llvm")]
    emit_llvm: bool,

    /// Emit LLVM bitcode instead of compiling to a native object.
    #[arg(long = "emit-bitcode")]
    emit_bitcode: bool,

    /// Produce a shared object instead of an executable.
    #[arg(long = "shared")]
    shared: bool,

    /// Code generation backend. Only `llvm` is implemented; any other
    /// value is rejected with a diagnostic rather than silently ignored.
    #[arg(long = "backend", default_value = "llvm")]
    backend: String,

    /// LLVM target triple. Defaults to the host triple.
    #[arg(long = "target")]
    target: Option<String>,

    /// Additional include search paths. Forwarded to the (external)
    /// preprocessor; accepted here only so existing build invocations
    /// that pass them don't fail to parse.
    #[arg(short = 'I', action = clap::ArgAction::Append)]
    include_paths: Vec<String>,

    /// Preprocessor macro definitions (`NAME` or `NAME=VALUE`). Same
    /// passthrough-only treatment as `-I`.
    #[arg(short = 'D', action = clap::ArgAction::Append)]
    defines: Vec<String>,

    /// Strict C99: reject GNU/Clang extensions instead of accepting them.
    #[arg(long = "strict-c99")]
    strict_c99: bool,

    /// Enable `ferrocc_lexer=debug` tracing.
    #[arg(long = "debug-lexer")]
    debug_lexer: bool,
    /// Enable `ferrocc_parser=debug` tracing.
    #[arg(long = "debug-parser")]
    debug_parser: bool,
    /// Enable `ferrocc_ast=debug` tracing.
    #[arg(long = "debug-ast")]
    debug_ast: bool,
    /// Enable `ferrocc_codegen=debug` tracing.
    #[arg(long = "debug-codegen")]
    debug_codegen: bool,
    /// Enable `ferrocc_lexer=trace` (dumps every token).
    #[arg(long = "debug-tokens")]
    debug_tokens: bool,
    /// Enable `ferrocc_driver=info` pipeline-stage timing/counts.
    #[arg(long = "debug-stats")]
    debug_stats: bool,
    #[arg(long = "verbose")]
    verbose: bool,
    /// Shorthand for every `--debug-*` flag above, all at `trace`.
    #[arg(long = "debug-all")]
    debug_all: bool,
    /// Redirect `--debug-*` output to a file instead of stderr.
    #[arg(long = "debug-file")]
    debug_file: Option<PathBuf>,
}

impl Cli {
    /// Builds the `RUST_LOG`-style filter spec.md §6.1's `--debug-*`
    /// family maps onto (SPEC_FULL.md §7 "Logging").
    fn tracing_filter(&self) -> String {
        if self.debug_all {
            return "ferrocc=trace".to_string();
        }
        let mut targets = Vec::new();
        if self.debug_tokens {
            targets.push("ferrocc_lexer=trace");
        } else if self.debug_lexer {
            targets.push("ferrocc_lexer=debug");
        }
        if self.debug_parser {
            targets.push("ferrocc_parser=debug");
        }
        if self.debug_ast {
            targets.push("ferrocc_ast=debug");
        }
        if self.debug_codegen {
            targets.push("ferrocc_codegen=debug");
        }
        if self.debug_stats {
            targets.push("ferrocc_driver=info");
        }
        if self.verbose && targets.is_empty() {
            targets.push("ferrocc=info");
        }
        if targets.is_empty() {
            "ferrocc=warn".to_string()
        } else {
            targets.join(",")
        }
    }

    fn output_path(&self) -> PathBuf {
        if let Some(out) = &self.output {
            return out.clone();
        }
        if self.emit_assembly {
            return self.input.with_extension("s");
        }
        if self.emit_llvm {
            return self.input.with_extension("ll");
        }
        if self.emit_bitcode {
            return self.input.with_extension("bc");
        }
        if self.compile_only {
            return self.input.with_extension("o");
        }
        PathBuf::from("a.out")
    }

    fn output_kind(&self) -> OutputKind {
        if self.emit_llvm {
            OutputKind::LlvmIr
        } else if self.emit_bitcode {
            OutputKind::Bitcode
        } else if self.emit_assembly {
            OutputKind::Assembly
        } else if self.compile_only {
            OutputKind::Object
        } else if self.shared {
            OutputKind::SharedObject
        } else {
            OutputKind::Executable
        }
    }
}

fn init_tracing(filter: &str) {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("ferrocc=warn")))
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.tracing_filter());

    if cli.backend != "llvm" {
        eprintln!(
            "error: backend `{}` is not implemented; only `llvm` is",
            cli.backend
        );
        return ExitCode::FAILURE;
    }

    if !cli.input.exists() {
        eprintln!("error: file not found: {}", cli.input.display());
        return ExitCode::FAILURE;
    }

    let options = CompileOptions {
        output: cli.output_path(),
        kind: cli.output_kind(),
        opt_level: cli.opt_level.into(),
        debug_info: cli.debug_info,
        target_triple: cli.target.clone(),
        gnu_extensions: !cli.strict_c99,
    };

    match ferrocc_driver::run(&cli.input, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
