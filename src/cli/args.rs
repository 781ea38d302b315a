//! CLI argument definitions using Clap
//!
//! Top-level flags are derived; backend subcommands are assembled at runtime
//! from each backend's option declarations.

use clap::{Arg, ArgAction, ArgMatches, Args, Command, FromArgMatches};

use crate::application::ports::{NotificationBackend, OptionRegistrar, OptionSpec};
use crate::domain::notification::NotificationRecord;
use crate::infrastructure::Backend;

/// Flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// Clap-backed option registrar for one backend subcommand
#[derive(Debug, Default)]
pub struct ClapRegistrar {
    specs: Vec<OptionSpec>,
}

impl OptionRegistrar for ClapRegistrar {
    fn register(&mut self, option: OptionSpec) {
        self.specs.push(option);
    }
}

impl ClapRegistrar {
    /// Collect the options a backend declares
    pub fn for_backend<B: NotificationBackend>(backend: &B) -> Self {
        let mut registrar = Self::default();
        backend.declare_options(&mut registrar);
        registrar
    }

    /// Add one clap argument per declared option
    pub fn apply_to(&self, command: Command) -> Command {
        self.specs
            .iter()
            .fold(command, |command, spec| command.arg(to_arg(spec)))
    }

    /// Write every matched value into the record
    pub fn populate(&self, matches: &ArgMatches, record: &mut NotificationRecord) {
        for spec in &self.specs {
            if let Some(value) = matches.get_one::<String>(spec.long) {
                record.assign(spec.field, value.as_str());
            }
        }
    }
}

fn to_arg(spec: &OptionSpec) -> Arg {
    let mut arg = Arg::new(spec.long)
        .long(spec.long)
        .short(spec.short)
        .help(spec.help)
        .required(spec.required)
        .action(ArgAction::Set);

    if let Some(env) = spec.env {
        arg = arg.env(env);
    }
    if spec.sensitive {
        arg = arg.hide_env_values(true);
    }

    arg
}

/// A parsed command line: which backend to run and the record it sends
#[derive(Debug)]
pub struct Invocation {
    pub global: GlobalArgs,
    pub backend: Backend,
    pub record: NotificationRecord,
}

/// Build the full command with one subcommand per backend
pub fn build_cli(backends: &[Backend]) -> Command {
    let command = Command::new("notify-cli")
        .version(concat!("version ", env!("CARGO_PKG_VERSION")))
        .about("Send a notification through a desktop or Telegram backend")
        .subcommand_required(true);

    let command = GlobalArgs::augment_args(command);

    backends.iter().fold(command, |command, backend| {
        let subcommand = Command::new(backend.name()).about(backend.description());
        command.subcommand(ClapRegistrar::for_backend(backend).apply_to(subcommand))
    })
}

/// Parse arguments, select the backend and populate its record
pub fn parse_invocation<I, T>(backends: Vec<Backend>, args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut command = build_cli(&backends);
    let matches = command.try_get_matches_from_mut(args)?;
    let global = GlobalArgs::from_arg_matches(&matches)?;

    let Some((name, sub_matches)) = matches.subcommand() else {
        return Err(command.error(
            clap::error::ErrorKind::MissingSubcommand,
            "a backend subcommand is required",
        ));
    };

    let Some(backend) = Backend::find(backends, name) else {
        return Err(command.error(
            clap::error::ErrorKind::InvalidSubcommand,
            format!("unknown backend '{}'", name),
        ));
    };

    let mut record = NotificationRecord::new();
    ClapRegistrar::for_backend(&backend).populate(sub_matches, &mut record);

    Ok(Invocation {
        global,
        backend,
        record,
    })
}
