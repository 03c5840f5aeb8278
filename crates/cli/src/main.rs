//
// Copyright (c) 2025 PIXELSEAL CONTRIBUTORS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: pixelseal — Tamper-evident encrypted image containers.
//

//! `pxl` — pack, unpack, verify, and inspect `.pxl` containers.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pixelseal_core::{
    generate_keypair, pack_bytes, read_pxl, split_pxl, verify_pxl, Keypair, Manifest,
};
use tracing_subscriber::EnvFilter;

mod keyfile;
mod metadata;
mod report;

use report::{InspectReport, VerifyReport};

/// Exit code for a `.pxl` file that fails verification.
const EXIT_VERIFY_FAILED: i32 = 10;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pixelseal .pxl container tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a signing keypair as raw 32-byte files
    Keygen(KeygenCmd),
    /// Pack an image into a .pxl container
    Pack(PackCmd),
    /// Decrypt a .pxl container back to the image payload
    Unpack(UnpackCmd),
    /// Fully verify a .pxl container against a public key
    Verify(VerifyCmd),
    /// Show manifest facts of a .pxl container without verifying
    Inspect(InspectCmd),
}

#[derive(Args, Debug)]
struct KeygenCmd {
    #[arg(long = "out", value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct PackCmd {
    #[arg(long = "in", value_name = "PATH", help = "Input image file")]
    input: PathBuf,
    #[arg(long = "out", value_name = "PATH", help = "Output .pxl file")]
    output: PathBuf,
    #[arg(
        long = "key",
        value_name = "PATH",
        help = "Signing key file (32-byte seed); generated beside the output when omitted"
    )]
    key: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct UnpackCmd {
    #[arg(long = "in", value_name = "PATH", help = "Input .pxl file")]
    input: PathBuf,
    #[arg(long = "out", value_name = "PATH", help = "Output image file")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct VerifyCmd {
    #[arg(value_name = "FILE", help = "Path to .pxl file")]
    file: PathBuf,
    #[arg(
        long = "public-key",
        value_name = "PATH",
        help = "Public key file (32 bytes)"
    )]
    public_key: PathBuf,
    #[arg(long, help = "Output the report as JSON")]
    json: bool,
}

#[derive(Args, Debug)]
struct InspectCmd {
    #[arg(value_name = "FILE", help = "Path to .pxl file")]
    file: PathBuf,
    #[arg(long, help = "Output the report as JSON")]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Keygen(args) => handle_keygen(args),
        Commands::Pack(args) => handle_pack(args),
        Commands::Unpack(args) => handle_unpack(args),
        Commands::Verify(args) => handle_verify(args),
        Commands::Inspect(args) => handle_inspect(args),
    }
}

fn handle_keygen(args: KeygenCmd) -> Result<()> {
    let keypair = generate_keypair();
    let (signing_path, public_path) = keyfile::save_keypair(&args.out_dir, &keypair)?;

    println!("Signing key: {}", signing_path.display());
    println!("Public key:  {}", public_path.display());
    Ok(())
}

fn handle_pack(args: PackCmd) -> Result<()> {
    let (keypair, generated_paths) = load_or_generate_keypair(args.key.as_deref(), &args.output)?;

    let image_bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read input file '{}'", args.input.display()))?;
    let metadata = metadata::file_metadata(&args.input)?;

    let packed = pack_bytes(&image_bytes, metadata, keypair.seed())?;
    fs::write(&args.output, &packed)
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;

    println!("Packed: {} ({} bytes)", args.output.display(), packed.len());
    if let Some((signing_path, public_path)) = generated_paths {
        println!("Generated signing key: {}", signing_path.display());
        println!("Generated public key:  {}", public_path.display());
    }
    Ok(())
}

fn handle_unpack(args: UnpackCmd) -> Result<()> {
    let (image_bytes, manifest) = read_pxl(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;

    fs::write(&args.output, &image_bytes)
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;

    println!(
        "Unpacked: {} ({} bytes, {} chunk(s))",
        args.output.display(),
        manifest.total_size,
        manifest.num_chunks
    );
    Ok(())
}

fn handle_verify(args: VerifyCmd) -> Result<()> {
    let public_key = keyfile::load_key32(&args.public_key)?;

    let started = Instant::now();
    let verified = verify_pxl(&args.file, &public_key);

    let report = VerifyReport {
        file: args.file.display().to_string(),
        verified,
        verify_time_ms: started.elapsed().as_millis() as u64,
    };
    report.print(args.json)?;

    if !verified {
        process::exit(EXIT_VERIFY_FAILED);
    }
    Ok(())
}

fn handle_inspect(args: InspectCmd) -> Result<()> {
    let data = fs::read(&args.file)
        .with_context(|| format!("failed to read '{}'", args.file.display()))?;
    let (_, trailer) = split_pxl(&data)?;
    let manifest = Manifest::from_slice(&trailer.manifest_bytes)?;

    let report = InspectReport::from_manifest(args.file.display().to_string(), &manifest);
    report.print(args.json)
}

/// Load the signing key from `--key`, or generate a fresh keypair beside the
/// output file and report the written paths.
fn load_or_generate_keypair(
    key_path: Option<&Path>,
    output: &Path,
) -> Result<(Keypair, Option<(PathBuf, PathBuf)>)> {
    match key_path {
        Some(path) => {
            let seed = keyfile::load_key32(path)?;
            let keypair = Keypair::from_seed(&seed)?;
            Ok((keypair, None))
        }
        None => {
            let keypair = generate_keypair();
            let key_dir = output.parent().filter(|p| !p.as_os_str().is_empty());
            let paths = keyfile::save_keypair(key_dir.unwrap_or(Path::new(".")), &keypair)?;
            Ok((keypair, Some(paths)))
        }
    }
}
