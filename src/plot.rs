use super::VERSION;
use crate::chart::PlotConfig;
use clap::{App, Arg};
use std::path::PathBuf;

/// Takes the CLI arguments that control the plotting of the genre trends.
pub fn parse_cli() -> (PathBuf, PathBuf, PlotConfig) {
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name for the csv file with the monthly genre counts")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .required(true)
        .default_value("monthly_genre_trends.csv");
    let arg_out = Arg::with_name("output_file")
        .help("name of the output file, svg or png")
        .short("o")
        .long("outfile")
        .takes_value(true);
    let arg_width = Arg::with_name("width")
        .help("plot area width in pixels")
        .long("width")
        .takes_value(true)
        .default_value("1000");
    let arg_height = Arg::with_name("height")
        .help("plot area height in pixels")
        .long("height")
        .takes_value(true)
        .default_value("800");
    let cli_args = App::new("genre_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the monthly genre trend lines")
        .arg(arg_csvin)
        .arg(arg_out)
        .arg(arg_width)
        .arg(arg_height)
        .get_matches();
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let out = match cli_args.value_of("output_file") {
        Some(p) => PathBuf::from(p),
        None => {
            let mut out = csvin.clone();
            out.set_extension("svg");
            out
        }
    };
    let mut config = PlotConfig::default();
    config.width = cli_args
        .value_of("width")
        .unwrap_or_default()
        .parse::<u32>()
        .unwrap();
    config.height = cli_args
        .value_of("height")
        .unwrap_or_default()
        .parse::<u32>()
        .unwrap();
    return (csvin, out, config);
}
