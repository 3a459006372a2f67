use clap::{Parser, Subcommand, ValueEnum};
use hdr_types::AccessLevel;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cmds;

#[derive(Parser)]
#[command(name = "hdr-gen")]
#[command(about = "Prints a module's exported declarations as an Objective-C or C++ header", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Print the header of one module */
    Codegen {
        /* Input YAML module descriptions */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Module to print */
        #[arg(short = 'm', long = "module", value_name = "NAME")]
        module: String,

        /* Header dialect */
        #[arg(short = 'l', long = "language", value_enum)]
        language: Language,

        /* Minimum access level to print (Objective-C only) */
        #[arg(short = 'a', long = "access", value_enum)]
        access: Option<Access>,

        /* Only print declarations marked as exposed (C++ only) */
        #[arg(long = "requires-exposed")]
        requires_exposed: bool,

        /* Output file, stdout if omitted */
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Show the emission order, imports and delayed members of a module */
    Analyze {
        /* Input YAML module descriptions */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Module to analyze */
        #[arg(short = 'm', long = "module", value_name = "NAME")]
        module: String,

        /* Header dialect */
        #[arg(short = 'l', long = "language", value_enum, default_value = "objc")]
        language: Language,

        /* Print the report as JSON */
        #[arg(long = "json")]
        json: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum Language {
    /* Objective-C header */
    #[value(name = "objc")]
    ObjC,
    /* C++ header */
    #[value(name = "cxx")]
    Cxx,
}

impl From<Language> for hdr_gen::Language {
    fn from(lang: Language) -> Self {
        match lang {
            Language::ObjC => hdr_gen::Language::ObjC,
            Language::Cxx => hdr_gen::Language::Cxx,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Access {
    Public,
    Internal,
}

impl From<Access> for AccessLevel {
    fn from(access: Access) -> Self {
        match access {
            Access::Public => AccessLevel::Public,
            Access::Internal => AccessLevel::Internal,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Codegen {
            files,
            module,
            language,
            access,
            requires_exposed,
            output,
            verbose,
        } => {
            init_tracing(verbose);
            cmds::codegen::run(
                files,
                module,
                language.into(),
                access.map(Into::into),
                requires_exposed,
                output,
            )?;
        }

        Commands::Analyze {
            files,
            module,
            language,
            json,
        } => {
            init_tracing(false);
            cmds::analyze::run(files, module, language.into(), json)?;
        }
    }

    Ok(())
}
