use clap::{Arg, Command};
use fault_splitter::{split_faults_by_region, SplitConfig};
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("Fault Splitter")
        .version("1.0")
        .about("Splits fault trace data into one GeoJSON file per intersecting region")
        .arg(
            Arg::new("faults")
                .short('f')
                .long("faults")
                .num_args(1)
                .required(true)
                .help("GeoJSON file containing fault line features"),
        )
        .arg(
            Arg::new("regions")
                .short('r')
                .long("regions")
                .num_args(1)
                .required(true)
                .help("GeoJSON file containing region boundary polygons"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .num_args(1)
                .default_value("output/faults_by_region")
                .help("Directory receiving one GeoJSON file per region"),
        )
        .arg(
            Arg::new("region-field")
                .long("region-field")
                .num_args(1)
                .default_value("NAME_EN")
                .help("Region attribute field holding the region name"),
        )
        .get_matches();

    let faults_path = PathBuf::from(matches.get_one::<String>("faults").unwrap());
    let regions_path = PathBuf::from(matches.get_one::<String>("regions").unwrap());
    let output_dir = PathBuf::from(matches.get_one::<String>("output").unwrap());
    let region_name_field = matches.get_one::<String>("region-field").unwrap().clone();

    // Validate that input files exist
    for path in [&faults_path, &regions_path] {
        if !path.exists() {
            eprintln!("Error: File not found: {}", path.display());
            std::process::exit(1);
        }
    }

    let config = SplitConfig {
        faults_path,
        regions_path,
        output_dir,
        region_name_field,
    };

    match split_faults_by_region(&config) {
        Ok(summary) => {
            println!("\n=== Processing Complete ===");
            println!("Faults loaded: {}", summary.faults_loaded);
            println!("Regions loaded: {}", summary.regions_loaded);
            println!("Fault/region pairs: {}", summary.pairs_joined);
            println!("Region files written: {}", summary.groups_written);
            if summary.invalid_name_records > 0 {
                println!(
                    "Records discarded over invalid region names: {}",
                    summary.invalid_name_records
                );
            }
            if summary.failed_writes > 0 {
                println!("Regions that failed to write: {}", summary.failed_writes);
            }
            println!(
                "Output files can be found in: {}",
                config.output_dir.display()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
