use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let format_arg = |default: &'static str| {
        clap::arg!(-f --format <FORMAT> "Output format")
            .value_name("FORMAT")
            .default_value(default)
            .value_parser(["text", "json", "none"])
    };

    let mut cmd = clap::Command::new("heatwatch")
        .version("1.0.0")
        .author("Heatwatch Contributors")
        .about("Monitor heat pump product listings")
        .arg(
            clap::arg!(-c --config <FILE> "JSON config file")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-t --table <FILE> "CSV table to write to or summarize")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(
            clap::Command::new("fetch")
                .about("Fetch the current listings and store them in the table")
                .arg(clap::arg!(--url <URL> "Listing page URL"))
                .arg(clap::arg!(-i --input <FILE> "Saved listing page to read instead of fetching, or '-' for stdin"))
                .arg(clap::arg!(--append "Append to the table instead of overwriting it"))
                .arg(clap::arg!(--"no-store" "Skip writing the table"))
                .arg(clap::arg!(--manufacturer <NAME> "Manufacturer recorded for every listing"))
                .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds"))
                .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
                .arg(format_arg("text")),
        )
        .subcommand(
            clap::Command::new("summary")
                .about("Summarize the listings stored in the table")
                .arg(clap::arg!(--top <NUM> "Number of most frequent features to report"))
                .arg(format_arg("text")),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "heatwatch", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "heatwatch", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "heatwatch", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "heatwatch", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
