// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Package name list taking zero or more values
fn names_arg(id: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .value_name("NAME")
        .num_args(0..)
        .help(help)
}

fn build_cli() -> Command {
    Command::new("debcollect")
        .version(env!("CARGO_PKG_VERSION"))
        .author("debcollect Contributors")
        .about("Collect Debian packages with their dependencies, install them later")
        .arg(names_arg("collect", 'c', "Collect packages and their dependencies"))
        .arg(names_arg("install", 'i', "Install previously collected packages"))
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Configuration file (default: debcollect.toml next to the executable)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output root (default: pkgs next to the executable)"),
        )
        .arg(
            Arg::new("distribution")
                .long("distribution")
                .value_name("LABEL")
                .help("Distribution label to use instead of /etc/os-release"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("Kill repack/install invocations running longer than SECS"),
        )
        .arg(
            Arg::new("no_force")
                .long("no-force")
                .action(ArgAction::SetTrue)
                .help("Do not pass --force-depends/--force-overwrite to dpkg"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // OUT_DIR keeps the generated page out of the source tree
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    if let Err(e) = fs::write(man_dir.join("debcollect.1"), buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
