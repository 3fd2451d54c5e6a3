// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use kubecerts::{issue_ca, issue_leaf, parse_cert_file, verify_signed_by, Error, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kubecerts")]
#[command(about = "Self-signed CA and Kubernetes service certificates")]
#[command(version)]
#[command(after_help = "\
EXAMPLES:
    kubecerts ca --outdir ssl                         # Generate the CA
    kubecerts issue apiserver --cn kube-apiserver \\
        --ip 10.3.0.1 --ip 172.17.4.101 --outdir ssl  # Issue a signed cert
    kubecerts inspect ssl/apiserver.pem               # Show cert details
    kubecerts verify ssl/apiserver.pem --ca ssl/ca.pem")]
struct Cli {
    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the CA key and certificate (reuses existing artifacts)
    Ca {
        /// Output directory for the CA artifacts
        #[arg(short, long, default_value = "ssl")]
        outdir: PathBuf,
    },

    /// Issue a CA-signed certificate for a service identity
    Issue {
        /// Base filename for the generated key/certificate pair
        basename: String,

        /// Common name of the certificate subject
        #[arg(long)]
        cn: String,

        /// IP address to include as a subject alternative name (repeatable)
        #[arg(long = "ip")]
        ip_addrs: Vec<String>,

        /// Output directory for the artifacts
        #[arg(short, long, default_value = "ssl")]
        outdir: PathBuf,
    },

    /// Show details of a generated certificate
    Inspect {
        /// Certificate file (PEM)
        pem: PathBuf,
    },

    /// Verify that a certificate is signed by a CA
    Verify {
        /// Certificate file (PEM)
        pem: PathBuf,

        /// CA certificate file (PEM)
        #[arg(long)]
        ca: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Reset SIGPIPE to default behavior (exit) instead of panic
    // This prevents "broken pipe" panics when output is piped to tools like grep/head
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // The issuers write their progress lines to an explicit sink, so quiet
    // mode is just a different sink.
    let mut progress: Box<dyn Write> = if cli.quiet {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout())
    };

    match cli.command {
        Commands::Ca { outdir } => cmd_ca(&outdir, progress.as_mut()),
        Commands::Issue {
            basename,
            cn,
            ip_addrs,
            outdir,
        } => cmd_issue(&outdir, &basename, &cn, &ip_addrs, progress.as_mut()),
        Commands::Inspect { pem } => cmd_inspect(&pem),
        Commands::Verify { pem, ca } => cmd_verify(&pem, &ca),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}

fn cmd_ca(outdir: &Path, progress: &mut dyn Write) -> Result<()> {
    kubecerts::fs::ensure_dir(outdir)?;
    let ca = issue_ca(outdir, progress)?;

    println!("CA certificate: {}", ca.pem.display());
    println!("CA key:         {}", ca.key.display());
    Ok(())
}

fn cmd_issue(
    outdir: &Path,
    basename: &str,
    cn: &str,
    ip_addrs: &[String],
    progress: &mut dyn Write,
) -> Result<()> {
    kubecerts::fs::ensure_dir(outdir)?;

    // Resolve (and if necessary bootstrap) the CA before issuing.
    let ca = issue_ca(outdir, progress)?;
    let leaf = issue_leaf(outdir, basename, cn, ip_addrs, &ca, progress)?;

    println!("Certificate: {}", leaf.pem.display());
    println!("Private key: {}", leaf.key.display());
    println!("CA:          {}", leaf.ca.display());
    Ok(())
}

fn cmd_inspect(pem: &Path) -> Result<()> {
    let info = parse_cert_file(pem)?;

    println!("Certificate: {}", pem.display());
    println!("===========");
    println!();

    if let Some(cn) = &info.common_name {
        println!("Subject CN: {}", cn);
    }
    if let Some(cn) = &info.issuer_common_name {
        println!("Issuer CN:  {}", cn);
    }

    let serial: Vec<String> = info.serial.iter().map(|b| format!("{:02x}", b)).collect();
    println!("Serial:     {}", serial.join(":"));
    println!("CA:         {}", if info.is_ca { "true" } else { "false" });

    if !info.subject_alt_names.is_empty() {
        println!("SANs:");
        for san in &info.subject_alt_names {
            println!("    - {}", san);
        }
    }

    println!();

    let days = info.days_remaining();
    if days < 0 {
        println!("Status:     EXPIRED ({} days ago)", -days);
    } else {
        println!("Status:     Valid ({} days remaining)", days);
    }
    println!("Expires:    {}", info.expiry_string());

    Ok(())
}

fn cmd_verify(pem: &Path, ca: &Path) -> Result<()> {
    let cert_pem = std::fs::read_to_string(pem).map_err(|e| Error::ReadFile {
        path: pem.to_path_buf(),
        source: e,
    })?;
    let ca_pem = std::fs::read_to_string(ca).map_err(|e| Error::ReadFile {
        path: ca.to_path_buf(),
        source: e,
    })?;

    verify_signed_by(&cert_pem, &ca_pem)?;

    println!("OK: {} is signed by {}", pem.display(), ca.display());
    Ok(())
}

fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "kubecerts", &mut io::stdout());
    Ok(())
}
