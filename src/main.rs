use cbf_metadata::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(stats) if stats.has_failures() => process::exit(1),
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("cbf-meta - PILATUS CBF Header Metadata Extractor");
    println!("================================================");
    println!();
    println!("Read experiment metadata from the text header of crystallography");
    println!("detector images in CBF format and print it as a tree or JSON.");
    println!();
    println!("USAGE:");
    println!("    cbf-meta <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    extract     Extract metadata from one CBF file");
    println!("    scan        Extract metadata from every matching file below a directory");
    println!("    validate    Check whether files are CBF images");
    println!("    schema      Print the importer form schema");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose       Increase logging verbosity");
    println!("    -q, --quiet         Only log errors and hide progress bars");
    println!("        --config PATH   Load settings from a TOML file");
    println!("        --locale LOCALE Language for validation messages");
    println!("    -h, --help          Show help information");
    println!("    -V, --version       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Print the header fields of one image:");
    println!("    cbf-meta extract image_00001.cbf");
    println!();
    println!("    # Emit JSON including parsing statistics:");
    println!("    cbf-meta extract image_00001.cbf --format json --stats");
    println!();
    println!("    # Scan a beamtime directory:");
    println!("    cbf-meta scan /data/beamtime --pattern '*_0001.cbf'");
    println!();
    println!("For detailed help on any command, use:");
    println!("    cbf-meta <COMMAND> --help");
}
