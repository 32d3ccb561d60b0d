//! Command-line front end for capturing and replaying file metadata.
//!
//! `capture` prints one JSON node per path, `apply` replays a node onto a
//! target and `ea-dump` decodes a raw Windows EA buffer for inspection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand};
use logging::VerbosityConfig;
use metadata::{MetadataOptions, Node, NodeType, RestoreContext, ea};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Capture and replay OS-specific file metadata.
#[derive(Parser, Debug)]
#[command(name = "attrkeep")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Skip extended attributes.
    #[arg(long, global = true)]
    no_xattrs: bool,

    /// Skip generic (platform-tagged) attributes.
    #[arg(long, global = true)]
    no_generic: bool,

    /// Skip access and modification times.
    #[arg(long, global = true)]
    no_times: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the metadata of each path as a JSON node.
    Capture {
        /// Entries to inspect. Symlinks are not followed.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Pretty-print instead of one node per line.
        #[arg(long)]
        pretty: bool,
    },

    /// Restore a captured node onto a target path.
    Apply {
        /// File holding one JSON node.
        node: PathBuf,
        /// Entry that receives the metadata.
        target: PathBuf,
        /// Create the target (file or directory) when it does not exist.
        #[arg(long)]
        create: bool,
    },

    /// Decode a hex-encoded Windows EA buffer.
    EaDump {
        /// File containing the buffer as hex digits.
        hex_file: PathBuf,
    },
}

impl Cli {
    const fn options(&self) -> MetadataOptions {
        MetadataOptions::new()
            .extended_attributes(!self.no_xattrs)
            .generic_attributes(!self.no_generic)
            .times(!self.no_times)
    }
}

/// Parses `args`, runs the selected command and maps the outcome to an exit
/// code. Help and version output go to `stdout`; diagnostics to `stderr`.
pub fn run_with<I, T, O, E>(args: I, stdout: &mut O, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    O: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let rendered = error.render().to_string();
            let written = if error.use_stderr() {
                stderr.write_all(rendered.as_bytes())
            } else {
                stdout.write_all(rendered.as_bytes())
            };
            if written.is_err() {
                return ExitCode::FAILURE;
            }
            return ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(1));
        }
    };

    // A subscriber may already be installed when embedded; keep that one.
    let _ = logging::init_tracing(&VerbosityConfig::from_verbose_level(cli.verbose));

    match execute(&cli, stdout, stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "attrkeep: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute<O: Write, E: Write>(cli: &Cli, stdout: &mut O, stderr: &mut E) -> Result<()> {
    let ctx = RestoreContext::for_platform().with_options(cli.options());
    match &cli.command {
        Command::Capture { paths, pretty } => capture(&ctx, paths, *pretty, stdout),
        Command::Apply {
            node,
            target,
            create,
        } => apply(&ctx, node, target, *create, stderr),
        Command::EaDump { hex_file } => ea_dump(hex_file, stdout),
    }
}

fn capture<O: Write>(
    ctx: &RestoreContext,
    paths: &[PathBuf],
    pretty: bool,
    stdout: &mut O,
) -> Result<()> {
    tracing::debug!(backend = ctx.backend().name(), count = paths.len(), "capturing");
    for path in paths {
        let node = Node::capture(path, ctx.backend(), ctx.options())?;
        let text = if pretty {
            serde_json::to_string_pretty(&node)?
        } else {
            serde_json::to_string(&node)?
        };
        writeln!(stdout, "{text}")?;
    }
    Ok(())
}

fn apply<E: Write>(
    ctx: &RestoreContext,
    node_file: &Path,
    target: &Path,
    create: bool,
    stderr: &mut E,
) -> Result<()> {
    let text = fs::read_to_string(node_file)
        .with_context(|| format!("failed to read node '{}'", node_file.display()))?;
    let node: Node = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse node '{}'", node_file.display()))?;

    match fs::symlink_metadata(target) {
        Ok(_) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound && create => {
            create_target(target, node.node_type)?;
        }
        Err(error) => {
            return Err(error).with_context(|| format!("failed to inspect '{}'", target.display()));
        }
    }

    let result = node.restore_metadata(target, ctx);

    let unknown = ctx.unknown_types().types();
    if !unknown.is_empty() {
        writeln!(stderr, "skipped unknown attribute types: {}", unknown.join(", "))?;
    }

    result.map_err(|error| {
        for failure in error.failures() {
            let _ = writeln!(stderr, "  {failure}");
        }
        anyhow!(error)
    })
}

fn create_target(target: &Path, node_type: NodeType) -> Result<()> {
    match node_type {
        NodeType::File => {
            fs::File::create(target)
                .with_context(|| format!("failed to create file '{}'", target.display()))?;
        }
        NodeType::Dir => fs::create_dir_all(target)
            .with_context(|| format!("failed to create directory '{}'", target.display()))?,
        other => bail!("cannot create a {other} entry at '{}'", target.display()),
    }
    Ok(())
}

fn ea_dump<O: Write>(hex_file: &Path, stdout: &mut O) -> Result<()> {
    let text = fs::read_to_string(hex_file)
        .with_context(|| format!("failed to read '{}'", hex_file.display()))?;
    let digits: String = text.split_whitespace().collect();
    let buf = hex::decode(&digits).context("buffer is not valid hex")?;
    let entries = ea::decode(&buf).context("failed to decode EA buffer")?;
    for entry in entries {
        writeln!(
            stdout,
            "{} ({:#04x}) = {}",
            entry.name,
            entry.flags,
            entry.value.escape_ascii()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> (ExitCode, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run_with(
            std::iter::once("attrkeep").chain(args.iter().copied()),
            &mut stdout,
            &mut stderr,
        );
        (
            code,
            String::from_utf8(stdout).expect("utf8 stdout"),
            String::from_utf8(stderr).expect("utf8 stderr"),
        )
    }

    #[test]
    fn help_goes_to_stdout() {
        let (code, stdout, stderr) = run(&["--help"]);
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
        assert!(stdout.contains("Usage:"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn global_flags_disable_facets() {
        let cli = Cli::try_parse_from(["attrkeep", "capture", "x", "--no-xattrs", "--no-times"])
            .expect("parse");
        let options = cli.options();
        assert!(!options.extended_attributes_enabled());
        assert!(options.generic_attributes_enabled());
        assert!(!options.times_enabled());
    }

    #[test]
    fn ea_dump_prints_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("buf.hex");
        let buf = ea::encode(&[ea::EaEntry::new("AB", b"xyz".to_vec())]).expect("encode");
        fs::write(&file, hex::encode(buf)).expect("write");

        let mut out = Vec::new();
        ea_dump(&file, &mut out).expect("dump");
        assert_eq!(String::from_utf8(out).expect("utf8"), "AB (0x00) = xyz\n");
    }

    #[test]
    fn create_target_refuses_special_types() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = create_target(&dir.path().join("fifo"), NodeType::Fifo).expect_err("fifo");
        assert!(err.to_string().contains("fifo"));
    }
}
