use genre_lgp::chart;
use genre_lgp::plot::parse_cli;
use genre_lgp::GenreTrends;

fn main() {
    let (csvin, out, config) = parse_cli();
    println!(
        "read data from {} and plot to {}",
        csvin.to_str().unwrap(),
        out.to_str().unwrap()
    );
    let trends = match GenreTrends::from_csv(csvin) {
        Ok(trends) => trends,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = chart::render(&trends, &config, &out) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
